//! Tail view of the primary symbol's table

use crate::indicators::BandedTable;
use crate::model::Field;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;

const BAND_HEADERS: [&str; 3] = ["MiddleBB", "UpperBB", "LowerBB"];

/// Headers and formatted cells ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    /// Last `rows` rows of `table` in chronological order
    pub fn tail(table: &BandedTable, rows: usize) -> Self {
        let mut headers = vec!["Date".to_string()];
        headers.extend(Field::ALL.iter().map(|f| f.label().to_string()));
        if table.bands.is_some() {
            headers.extend(BAND_HEADERS.iter().map(|h| (*h).to_string()));
        }

        let bars = &table.prices.bars;
        let start = bars.len().saturating_sub(rows);

        let rows = bars
            .iter()
            .enumerate()
            .skip(start)
            .map(|(i, bar)| {
                let mut row = vec![bar.date.to_string()];
                row.extend(Field::ALL.iter().map(|f| format_price(Some(bar.field(*f)))));
                if let Some(bands) = &table.bands {
                    row.push(format_price(bands.middle[i]));
                    row.push(format_price(bands.upper[i]));
                    row.push(format_price(bands.lower[i]));
                }
                row
            })
            .collect();

        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as a terminal table
    pub fn render(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(self.headers.clone());
        for row in &self.rows {
            table.add_row(row.clone());
        }
        table.to_string()
    }
}

fn format_price(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "NaN".to_string(),
    }
}
