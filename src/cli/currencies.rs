use super::ui;
use crate::core::currency::{self, Currency};
use comfy_table::Cell;

pub fn display_currencies(currencies: &[&Currency], selected: &str) -> String {
    if currencies.is_empty() {
        return ui::style_text("No matching currencies.", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(""),
        ui::header_cell("Code"),
        ui::header_cell("Currency"),
        ui::header_cell("Symbol"),
    ]);

    for c in currencies {
        let marker = if c.code.eq_ignore_ascii_case(selected) {
            "*"
        } else {
            ""
        };
        table.add_row(vec![
            Cell::new(marker),
            Cell::new(c.code),
            Cell::new(c.name),
            Cell::new(c.symbol),
        ]);
    }
    table.to_string()
}

/// Prints the currencies matching `search`, marking the selected one.
pub fn run(search: Option<&str>, selected: &str) {
    let matches = currency::search(search.unwrap_or_default());
    println!("{}", display_currencies(&matches, selected));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_selected_currency() {
        let output = display_currencies(&currency::search("pound"), "GBP");
        assert!(output.contains("British Pound"));
        assert!(output.contains("*"));
        assert!(!output.contains("Euro"));
    }

    #[test]
    fn test_no_matches() {
        let output = display_currencies(&currency::search("doubloon"), "INR");
        assert!(output.contains("No matching currencies."));
    }
}
