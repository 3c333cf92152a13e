//! Currencies prices can be shown in

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
}

pub const DEFAULT_CURRENCY: &str = "INR";

pub static CURRENCIES: [Currency; 20] = [
    Currency { code: "INR", name: "Indian Rupee", symbol: "₹" },
    Currency { code: "USD", name: "US Dollar", symbol: "$" },
    Currency { code: "EUR", name: "Euro", symbol: "€" },
    Currency { code: "GBP", name: "British Pound", symbol: "£" },
    Currency { code: "JPY", name: "Japanese Yen", symbol: "¥" },
    Currency { code: "CAD", name: "Canadian Dollar", symbol: "C$" },
    Currency { code: "AUD", name: "Australian Dollar", symbol: "A$" },
    Currency { code: "CHF", name: "Swiss Franc", symbol: "Fr" },
    Currency { code: "CNY", name: "Chinese Yuan", symbol: "¥" },
    Currency { code: "SEK", name: "Swedish Krona", symbol: "kr" },
    Currency { code: "NZD", name: "New Zealand Dollar", symbol: "NZ$" },
    Currency { code: "MXN", name: "Mexican Peso", symbol: "$" },
    Currency { code: "SGD", name: "Singapore Dollar", symbol: "S$" },
    Currency { code: "HKD", name: "Hong Kong Dollar", symbol: "HK$" },
    Currency { code: "NOK", name: "Norwegian Krone", symbol: "kr" },
    Currency { code: "KRW", name: "South Korean Won", symbol: "₩" },
    Currency { code: "TRY", name: "Turkish Lira", symbol: "₺" },
    Currency { code: "RUB", name: "Russian Ruble", symbol: "₽" },
    Currency { code: "BRL", name: "Brazilian Real", symbol: "R$" },
    Currency { code: "ZAR", name: "South African Rand", symbol: "R" },
];

/// Looks up a currency by its code, ignoring case.
pub fn find(code: &str) -> Option<&'static Currency> {
    CURRENCIES
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(code.trim()))
}

/// Currencies whose name or code contains `text`, ignoring case, in catalog
/// order. Empty text matches everything.
pub fn search(text: &str) -> Vec<&'static Currency> {
    let needle = text.trim().to_lowercase();
    CURRENCIES
        .iter()
        .filter(|c| {
            c.name.to_lowercase().contains(&needle) || c.code.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Display symbol for `code`, or the code itself when it is not in the catalog.
pub fn symbol_for(code: &str) -> &str {
    find(code).map_or(code, |c| c.symbol)
}
