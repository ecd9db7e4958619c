//! Ticker universe and the immutable per-render request

use crate::chart::ChartOptions;
use crate::config::{DEFAULT_LOOKBACK_DAYS, DashboardConfig};
use crate::error::{DashboardError, Result};
use crate::model::{DateRange, Symbol};
use chrono::Utc;
use serde::Serialize;

/// Fixed set of symbols the user can choose from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerUniverse {
    symbols: Vec<Symbol>,
}

impl TickerUniverse {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<Symbol> = Vec::new();
        for symbol in symbols.into_iter().map(Symbol::new) {
            if !unique.contains(&symbol) {
                unique.push(symbol);
            }
        }
        Self { symbols: unique }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(&config.universe)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.symbols.contains(symbol)
    }

    /// First symbol in display order
    pub fn default_primary(&self) -> Option<&Symbol> {
        self.symbols.first()
    }

    /// Symbols offered for comparison against `primary`
    pub fn comparison_options(&self, primary: &Symbol) -> Vec<&Symbol> {
        self.symbols.iter().filter(|s| *s != primary).collect()
    }

    fn ensure(&self, symbol: &Symbol) -> Result<()> {
        if self.contains(symbol) {
            Ok(())
        } else {
            Err(DashboardError::InvalidSymbol(format!(
                "{symbol} is not one of {}",
                self.symbols
                    .iter()
                    .map(Symbol::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            )))
        }
    }
}

impl Default for TickerUniverse {
    fn default() -> Self {
        Self::from_config(&DashboardConfig::default())
    }
}

/// Snapshot of every control for one render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardRequest {
    primary: Symbol,
    comparisons: Vec<Symbol>,
    range: DateRange,
    show_candlesticks: bool,
    show_bollinger: bool,
}

impl DashboardRequest {
    /// Start building a request for `primary`
    pub fn builder(primary: impl Into<Symbol>) -> DashboardRequestBuilder {
        DashboardRequestBuilder::new(primary.into())
    }

    pub fn primary(&self) -> &Symbol {
        &self.primary
    }

    pub fn comparisons(&self) -> &[Symbol] {
        &self.comparisons
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn show_candlesticks(&self) -> bool {
        self.show_candlesticks
    }

    pub fn show_bollinger(&self) -> bool {
        self.show_bollinger
    }

    /// Primary followed by comparisons, in selection order
    pub fn symbols(&self) -> Vec<Symbol> {
        std::iter::once(self.primary.clone())
            .chain(self.comparisons.iter().cloned())
            .collect()
    }

    pub fn chart_options(&self, height: u32) -> ChartOptions {
        ChartOptions {
            show_candlesticks: self.show_candlesticks,
            show_bollinger: self.show_bollinger,
            height,
        }
    }
}

/// Builder for DashboardRequest
#[derive(Debug, Clone)]
pub struct DashboardRequestBuilder {
    primary: Symbol,
    comparisons: Vec<Symbol>,
    range: Option<DateRange>,
    show_candlesticks: bool,
    show_bollinger: bool,
}

impl DashboardRequestBuilder {
    fn new(primary: Symbol) -> Self {
        Self {
            primary,
            comparisons: Vec::new(),
            range: None,
            show_candlesticks: true,
            show_bollinger: true,
        }
    }

    /// Set the comparison symbols, in selection order
    pub fn compare<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        self.comparisons = symbols.into_iter().map(Into::into).collect();
        self
    }

    /// Set the date range (defaults to the trailing year)
    pub fn range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn candlesticks(mut self, on: bool) -> Self {
        self.show_candlesticks = on;
        self
    }

    pub fn bollinger(mut self, on: bool) -> Self {
        self.show_bollinger = on;
        self
    }

    /// Validate against `universe` and build the request
    pub fn build(self, universe: &TickerUniverse) -> Result<DashboardRequest> {
        universe.ensure(&self.primary)?;

        let mut comparisons: Vec<Symbol> = Vec::with_capacity(self.comparisons.len());
        for symbol in self.comparisons {
            universe.ensure(&symbol)?;
            if symbol == self.primary {
                return Err(DashboardError::InvalidSelection(format!(
                    "{symbol} is the primary symbol and cannot also be a comparison"
                )));
            }
            if !comparisons.contains(&symbol) {
                comparisons.push(symbol);
            }
        }

        let range = match self.range {
            Some(range) => range,
            None => DateRange::trailing(Utc::now().date_naive(), DEFAULT_LOOKBACK_DAYS)?,
        };

        Ok(DashboardRequest {
            primary: self.primary,
            comparisons,
            range,
            show_candlesticks: self.show_candlesticks,
            show_bollinger: self.show_bollinger,
        })
    }
}
