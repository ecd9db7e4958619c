//! Normalizes raw fetch results into the tables the dashboard draws from
//!
//! Both [`RawFrame`] layouts are resolved here into per-symbol column sets. Rows
//! with a missing value are dropped before anything downstream sees them.

use crate::api::{FieldColumns, RawFrame};
use crate::error::{DashboardError, Result};
use crate::model::{AdjustedCloseTable, Bar, Field, PriceTable, Symbol};
use chrono::NaiveDate;

/// Output of one reshape pass
#[derive(Debug, Clone, PartialEq)]
pub struct Reshaped {
    /// OHLC + adjusted close for the primary symbol
    pub prices: PriceTable,
    /// Adjusted close for every requested symbol that has data
    pub adjusted: AdjustedCloseTable,
}

/// Reshape a fetch result for `symbols` (primary first, then comparisons)
pub fn reshape(raw: RawFrame, symbols: &[Symbol]) -> Result<Reshaped> {
    let primary = symbols
        .first()
        .ok_or_else(|| DashboardError::InvalidSelection("no symbols requested".to_string()))?;

    let (dates, per_symbol) = normalize(raw, primary, symbols.len())?;

    let adjusted = adjusted_close_table(&dates, &per_symbol, symbols);
    let prices = price_table(&dates, &per_symbol, primary);

    tracing::debug!(
        "Reshaped {} raw rows into {} price rows and {} adjusted rows",
        dates.len(),
        prices.len(),
        adjusted.len()
    );

    Ok(Reshaped { prices, adjusted })
}

/// Resolve the frame layout into `(dates, [(symbol, columns)])` and validate it
fn normalize(
    raw: RawFrame,
    primary: &Symbol,
    requested: usize,
) -> Result<(Vec<NaiveDate>, Vec<(Symbol, FieldColumns)>)> {
    let (dates, per_symbol) = match raw {
        RawFrame::Single { dates, columns } => {
            if requested > 1 {
                return Err(DashboardError::ShapeMismatch(format!(
                    "single-symbol frame returned for {requested} requested symbols"
                )));
            }
            (dates, vec![(primary.clone(), columns)])
        }
        RawFrame::Multi { dates, columns } => (dates, columns),
    };

    for (symbol, columns) in &per_symbol {
        for field in Field::ALL {
            let values = columns.get(&field).ok_or_else(|| {
                DashboardError::ShapeMismatch(format!("{symbol} is missing the {field} column"))
            })?;
            if values.len() != dates.len() {
                return Err(DashboardError::ShapeMismatch(format!(
                    "{symbol} {field} has {} values for {} dates",
                    values.len(),
                    dates.len()
                )));
            }
        }
    }

    Ok((dates, per_symbol))
}

fn columns_of<'a>(
    per_symbol: &'a [(Symbol, FieldColumns)],
    symbol: &Symbol,
) -> Option<&'a FieldColumns> {
    per_symbol
        .iter()
        .find(|(s, _)| s == symbol)
        .map(|(_, columns)| columns)
}

fn adjusted_close_table(
    dates: &[NaiveDate],
    per_symbol: &[(Symbol, FieldColumns)],
    symbols: &[Symbol],
) -> AdjustedCloseTable {
    let present: Vec<(&Symbol, &[Option<f64>])> = symbols
        .iter()
        .filter_map(|symbol| {
            let values = columns_of(per_symbol, symbol)?.get(&Field::AdjClose)?;
            if values.iter().all(Option::is_none) {
                tracing::debug!("No adjusted close data for {}", symbol);
                return None;
            }
            Some((symbol, values.as_slice()))
        })
        .collect();

    if present.is_empty() {
        return AdjustedCloseTable::default();
    }

    let keep: Vec<usize> = (0..dates.len())
        .filter(|&i| present.iter().all(|(_, values)| values[i].is_some()))
        .collect();

    AdjustedCloseTable {
        dates: keep.iter().map(|&i| dates[i]).collect(),
        columns: present
            .into_iter()
            .map(|(symbol, values)| {
                let column = keep.iter().filter_map(|&i| values[i]).collect();
                (symbol.clone(), column)
            })
            .collect(),
    }
}

fn price_table(
    dates: &[NaiveDate],
    per_symbol: &[(Symbol, FieldColumns)],
    primary: &Symbol,
) -> PriceTable {
    let Some(columns) = columns_of(per_symbol, primary) else {
        tracing::debug!("No price data for {}", primary);
        return PriceTable::empty(primary.clone());
    };

    // normalize() guarantees every field is present with one value per date
    let value = |field: Field, i: usize| columns.get(&field).and_then(|v| v[i]);

    let bars = dates
        .iter()
        .enumerate()
        .filter_map(|(i, &date)| {
            Some(Bar {
                date,
                open: value(Field::Open, i)?,
                high: value(Field::High, i)?,
                low: value(Field::Low, i)?,
                close: value(Field::Close, i)?,
                adj_close: value(Field::AdjClose, i)?,
            })
        })
        .collect();

    PriceTable::new(primary.clone(), bars)
}
