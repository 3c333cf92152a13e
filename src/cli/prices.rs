use super::ui;
use crate::core::metal::price_per_ten_grams;
use crate::core::{BoardSnapshot, FetchState, MetalBoard, Phase, currency};
use anyhow::Result;
use comfy_table::Cell;

impl BoardSnapshot {
    pub fn display_as_table(&self) -> String {
        let symbol = currency::symbol_for(&self.currency);

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("#"),
            ui::header_cell("Metal"),
            ui::header_cell("Symbol"),
            ui::header_cell(&format!("Price / oz ({})", self.currency)),
            ui::header_cell(&format!("10 Grams ({})", self.currency)),
            ui::header_cell("Fetched At"),
        ]);

        for (index, (metal, state)) in self.iter().enumerate() {
            let ten_grams = state
                .price()
                .filter(|_| metal.quoted_by_gram())
                .map(price_per_ten_grams);
            let (price, fetched_at) = match state {
                FetchState::Loading => (ui::loading_cell(), Cell::new("")),
                FetchState::Failed(e) => (ui::error_cell(&e.to_string()), Cell::new("")),
                FetchState::Ready(_) => (
                    ui::format_optional_cell(state.price(), |p| ui::format_money(symbol, p, 2)),
                    Cell::new(state.fetched_at().map(ui::format_timestamp).unwrap_or_default()),
                ),
            };
            table.add_row(vec![
                Cell::new(index + 1),
                Cell::new(metal.name),
                Cell::new(metal.symbol),
                price,
                ui::format_optional_cell(ten_grams, |p| ui::format_money(symbol, p, 0)),
                fetched_at,
            ]);
        }

        let mut output = format!(
            "{}\n\n",
            ui::style_text("Spot prices", ui::StyleType::Title)
        );
        output.push_str(&table.to_string());
        output
    }
}

/// Starts a fetch cycle and advances a progress bar as each metal settles,
/// following the board's change notifications.
pub(crate) async fn fetch_with_progress(board: &MetalBoard) {
    let pb = ui::new_progress_bar(board.metals().len() as u64, "Fetching prices...");
    let mut changes = board.subscribe();
    let handle = board.start_cycle();
    let generation = handle.generation();
    let settled = handle.settled();
    tokio::pin!(settled);

    loop {
        tokio::select! {
            _ = &mut settled => break,
            Ok(()) = changes.changed() => {
                let snapshot = board.snapshot();
                if snapshot.generation == generation {
                    let done = snapshot
                        .iter()
                        .filter(|(_, state)| state.phase() != Phase::Loading)
                        .count();
                    pb.set_position(done as u64);
                }
            }
        }
    }
    pb.finish_and_clear();
}

/// Runs one fetch cycle, then prints every metal's state.
pub async fn run(board: &MetalBoard) -> Result<()> {
    fetch_with_progress(board).await;
    println!("{}", board.snapshot().display_as_table());
    Ok(())
}
