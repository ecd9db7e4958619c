//! Core data types shared by the render pipeline

use crate::error::{DashboardError, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ticker symbol, always stored uppercase
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a symbol, normalizing case and surrounding whitespace
    pub fn new(symbol: impl AsRef<str>) -> Self {
        Self(symbol.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Inclusive calendar date range
///
/// An inverted range (`start > end`) is representable and simply selects no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Range ending at `end` and starting `days` earlier
    pub fn trailing(end: NaiveDate, days: u64) -> Result<Self> {
        let start = end.checked_sub_days(Days::new(days)).ok_or_else(|| {
            DashboardError::InvalidDate(format!("{days} days before {end} is out of range"))
        })?;
        Ok(Self { start, end })
    }

    /// Whether the range selects no dates at all
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

/// Price fields delivered per symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    Open,
    High,
    Low,
    Close,
    AdjClose,
}

impl Field {
    /// All fields in column order
    pub const ALL: [Field; 5] = [
        Field::Open,
        Field::High,
        Field::Low,
        Field::Close,
        Field::AdjClose,
    ];

    /// Column label
    pub fn label(self) -> &'static str {
        match self {
            Field::Open => "Open",
            Field::High => "High",
            Field::Low => "Low",
            Field::Close => "Close",
            Field::AdjClose => "Adj Close",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One trading day for one symbol, all fields present
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
}

impl Bar {
    pub fn field(&self, field: Field) -> f64 {
        match field {
            Field::Open => self.open,
            Field::High => self.high,
            Field::Low => self.low,
            Field::Close => self.close,
            Field::AdjClose => self.adj_close,
        }
    }
}

/// Date-ordered bars for the primary symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    pub symbol: Symbol,
    pub bars: Vec<Bar>,
}

impl PriceTable {
    pub fn new(symbol: Symbol, bars: Vec<Bar>) -> Self {
        Self { symbol, bars }
    }

    pub fn empty(symbol: Symbol) -> Self {
        Self {
            symbol,
            bars: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn column(&self, field: Field) -> Vec<f64> {
        self.bars.iter().map(|b| b.field(field)).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.column(Field::Close)
    }
}

/// Adjusted close per symbol, aligned on a shared date index
///
/// Columns follow request order and every row is fully populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdjustedCloseTable {
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<(Symbol, Vec<f64>)>,
}

impl AdjustedCloseTable {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.columns.iter().map(|(symbol, _)| symbol)
    }

    pub fn column(&self, symbol: &Symbol) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, values)| values.as_slice())
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.column(symbol).is_some()
    }
}
