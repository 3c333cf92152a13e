use super::ui;
use crate::core::currency;
use crate::core::metal::find_metal;
use crate::core::{FetchState, MetalBoard, MetalDetail, TrackedMetal};
use anyhow::{Result, anyhow};
use chrono::Utc;

impl MetalDetail {
    pub fn display(&self) -> String {
        let symbol = currency::symbol_for(&self.currency);
        let money = |value: Option<f64>, decimals: usize| {
            value.map_or("--".to_string(), |v| ui::format_money(symbol, v, decimals))
        };

        let rows = [
            ("Current Price (Per Troy Ounce)", money(Some(self.price), 2)),
            ("Price for 10 Grams", money(Some(self.price_per_ten_grams()), 0)),
            ("Price for 1 Gram", money(Some(self.price_per_gram()), 0)),
            ("Previous Close", money(self.previous_close, 2)),
            ("Previous Open", money(self.previous_open, 2)),
            ("Fetched At", ui::format_timestamp(self.fetched_at)),
            ("Today", ui::format_timestamp(Utc::now())),
        ];

        let mut output = format!(
            "{} ({})\n",
            ui::style_text(self.metal.name, ui::StyleType::Title),
            self.metal.symbol
        );
        for (label, value) in rows {
            output.push_str(&format!(
                "\n{}\n  {}",
                ui::style_text(label, ui::StyleType::Label),
                ui::style_text(&value, ui::StyleType::Value)
            ));
        }
        output
    }
}

/// Message shown when a metal has no price to show details for.
pub fn display_unavailable(metal: &TrackedMetal, state: &FetchState) -> String {
    let reason = state
        .error_message()
        .unwrap_or_else(|| "price not loaded yet".to_string());
    format!(
        "{}: {}",
        ui::style_text(metal.name, ui::StyleType::Title),
        ui::style_text(&reason, ui::StyleType::Error)
    )
}

/// Runs one fetch cycle, then prints the details of the metal matching `query`.
pub async fn run(board: &MetalBoard, query: &str) -> Result<()> {
    let metal = find_metal(query).ok_or_else(|| anyhow!("Unknown metal: {}", query))?;
    let index = board
        .metals()
        .iter()
        .position(|m| *m == metal)
        .ok_or_else(|| anyhow!("{} is not tracked", metal.name))?;

    super::prices::fetch_with_progress(board).await;

    match board.select_entity(index) {
        Some(detail) => println!("{}", detail.display()),
        None => {
            let snapshot = board.snapshot();
            if let Some((metal, state)) = snapshot.get(index) {
                println!("{}", display_unavailable(metal, state));
            }
        }
    }
    Ok(())
}
