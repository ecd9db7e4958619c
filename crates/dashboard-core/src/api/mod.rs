//! Market data retrieval
//!
//! The fetch boundary hands back a [`RawFrame`], whose shape depends on how many
//! symbols were requested. The reshaper resolves it once; nothing past the
//! reshaper sees the raw shape.

pub mod yahoo;

use crate::error::Result;
use crate::model::{DateRange, Field, Symbol};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use yahoo::YahooFetcher;

/// Values per field, aligned with the frame's date index; `None` marks a gap
pub type FieldColumns = BTreeMap<Field, Vec<Option<f64>>>;

/// How prices are adjusted for dividends and splits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Adjustment {
    /// Unadjusted OHLC plus a separate adjusted close
    #[default]
    Raw,
    /// OHLC scaled by the adjustment factor; adjusted close equals close
    Auto,
}

/// Parameters of one fetch call
#[derive(Debug, Clone, PartialEq)]
pub struct FetchQuery {
    pub symbols: Vec<Symbol>,
    pub range: DateRange,
    pub adjustment: Adjustment,
}

/// Date-indexed fetch result
#[derive(Debug, Clone, PartialEq)]
pub enum RawFrame {
    /// Field-only layout, returned when exactly one symbol was requested
    Single {
        dates: Vec<NaiveDate>,
        columns: FieldColumns,
    },
    /// Two-level (symbol, field) layout, returned for several symbols
    Multi {
        dates: Vec<NaiveDate>,
        columns: Vec<(Symbol, FieldColumns)>,
    },
}

impl RawFrame {
    /// Frame with no rows, shaped the way a fetch for `symbols` would be
    pub fn empty_for(symbols: &[Symbol]) -> Self {
        let empty_columns = || -> FieldColumns {
            Field::ALL.iter().map(|f| (*f, Vec::new())).collect()
        };

        if symbols.len() == 1 {
            RawFrame::Single {
                dates: Vec::new(),
                columns: empty_columns(),
            }
        } else {
            RawFrame::Multi {
                dates: Vec::new(),
                columns: symbols.iter().map(|s| (s.clone(), empty_columns())).collect(),
            }
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        match self {
            RawFrame::Single { dates, .. } | RawFrame::Multi { dates, .. } => dates,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dates().is_empty()
    }
}

/// Source of daily bars
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataFetcher: Send + Sync {
    /// Fetch daily bars for every symbol in the query
    async fn fetch(&self, query: &FetchQuery) -> Result<RawFrame>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_frame_shape_follows_symbol_count() {
        let single = RawFrame::empty_for(&[Symbol::new("AAPL")]);
        assert!(matches!(single, RawFrame::Single { .. }));
        assert!(single.is_empty());

        let multi = RawFrame::empty_for(&[Symbol::new("AAPL"), Symbol::new("MSFT")]);
        match multi {
            RawFrame::Multi { columns, .. } => {
                assert_eq!(columns.len(), 2);
                assert_eq!(columns[1].0, Symbol::new("MSFT"));
                assert_eq!(columns[1].1.len(), 5);
            }
            RawFrame::Single { .. } => panic!("Expected Multi frame"),
        }
    }
}
