//! Tracked metals and per-weight price conversions

/// Grams in one troy ounce, the unit the price provider quotes in.
pub const TROY_OUNCE_GRAMS: f64 = 31.1035;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackedMetal {
    pub name: &'static str,
    pub symbol: &'static str,
}

impl TrackedMetal {
    pub const fn new(name: &'static str, symbol: &'static str) -> Self {
        Self { name, symbol }
    }

    /// Matches either the display name or the instrument symbol, ignoring case.
    pub fn matches(&self, query: &str) -> bool {
        self.name.eq_ignore_ascii_case(query) || self.symbol.eq_ignore_ascii_case(query)
    }

    /// Whether the metal is commonly bought by weight in grams. Palladium is
    /// only quoted per ounce.
    pub fn quoted_by_gram(&self) -> bool {
        self.symbol != "XPD"
    }
}

/// Metals shown on the board, in display and fetch order.
pub const TRACKED_METALS: [TrackedMetal; 4] = [
    TrackedMetal::new("Gold", "XAU"),
    TrackedMetal::new("Silver", "XAG"),
    TrackedMetal::new("Platinum", "XPT"),
    TrackedMetal::new("Palladium", "XPD"),
];

pub fn find_metal(query: &str) -> Option<TrackedMetal> {
    TRACKED_METALS.iter().copied().find(|m| m.matches(query))
}

/// Price of one gram given a price per troy ounce.
pub fn price_per_gram(price_per_ounce: f64) -> f64 {
    price_per_ounce / TROY_OUNCE_GRAMS
}

/// Price of ten grams given a price per troy ounce.
pub fn price_per_ten_grams(price_per_ounce: f64) -> f64 {
    price_per_ounce / TROY_OUNCE_GRAMS * 10.0
}
