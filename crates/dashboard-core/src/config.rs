//! Configuration for the dashboard

use crate::api::Adjustment;
use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tickers offered by the control panel, in display order
pub const DEFAULT_UNIVERSE: [&str; 10] = [
    "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "META", "NFLX", "NVDA", "JPM", "BAC",
];

/// Trailing window used when no date range is given
pub const DEFAULT_LOOKBACK_DAYS: u64 = 365;

/// Longest default lookback accepted from a config file (about a century)
pub const MAX_LOOKBACK_DAYS: u64 = 36_500;

/// Configuration for dashboard rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Symbols the user can pick from
    pub universe: Vec<String>,

    /// Rolling window for Bollinger Bands
    pub band_window: usize,

    /// Standard deviation multiplier for the upper/lower band
    pub band_multiplier: f64,

    /// Number of trailing rows shown in the table view
    pub table_rows: usize,

    /// Chart height in pixels
    pub chart_height: u32,

    /// Default distance between start and end date
    pub lookback_days: u64,

    /// Price adjustment mode requested from the provider
    pub adjustment: Adjustment,

    /// Propagate per-symbol provider failures instead of treating them as missing data
    pub strict_fetch: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            universe: DEFAULT_UNIVERSE.iter().map(|s| (*s).to_string()).collect(),
            band_window: 20,
            band_multiplier: 2.0,
            table_rows: 20,
            chart_height: 700,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            adjustment: Adjustment::Raw,
            strict_fetch: false,
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration builder
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Load a configuration from a JSON file; missing keys take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.universe.is_empty() {
            return Err(DashboardError::Config(
                "universe must contain at least one symbol".to_string(),
            ));
        }

        if self.band_window < 2 {
            return Err(DashboardError::Config(
                "band_window must be at least 2".to_string(),
            ));
        }

        if !self.band_multiplier.is_finite() || self.band_multiplier < 0.0 {
            return Err(DashboardError::Config(
                "band_multiplier must be a finite, non-negative number".to_string(),
            ));
        }

        if self.table_rows == 0 {
            return Err(DashboardError::Config(
                "table_rows must be greater than 0".to_string(),
            ));
        }

        if self.lookback_days > MAX_LOOKBACK_DAYS {
            return Err(DashboardError::Config(format!(
                "lookback_days must be at most {MAX_LOOKBACK_DAYS}, got {}",
                self.lookback_days
            )));
        }

        Ok(())
    }
}

/// Builder for DashboardConfig
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    universe: Option<Vec<String>>,
    band_window: Option<usize>,
    band_multiplier: Option<f64>,
    table_rows: Option<usize>,
    chart_height: Option<u32>,
    lookback_days: Option<u64>,
    adjustment: Option<Adjustment>,
    strict_fetch: Option<bool>,
}

impl DashboardConfigBuilder {
    /// Replace the ticker universe
    pub fn universe<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.universe = Some(symbols.into_iter().map(Into::into).collect());
        self
    }

    /// Set the Bollinger window
    pub fn band_window(mut self, window: usize) -> Self {
        self.band_window = Some(window);
        self
    }

    /// Set the Bollinger multiplier
    pub fn band_multiplier(mut self, multiplier: f64) -> Self {
        self.band_multiplier = Some(multiplier);
        self
    }

    /// Set the number of rows in the table view
    pub fn table_rows(mut self, rows: usize) -> Self {
        self.table_rows = Some(rows);
        self
    }

    /// Set the chart height
    pub fn chart_height(mut self, height: u32) -> Self {
        self.chart_height = Some(height);
        self
    }

    /// Set the default lookback
    pub fn lookback_days(mut self, days: u64) -> Self {
        self.lookback_days = Some(days);
        self
    }

    /// Set the adjustment mode
    pub fn adjustment(mut self, adjustment: Adjustment) -> Self {
        self.adjustment = Some(adjustment);
        self
    }

    /// Propagate per-symbol fetch failures
    pub fn strict_fetch(mut self, strict: bool) -> Self {
        self.strict_fetch = Some(strict);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<DashboardConfig> {
        let defaults = DashboardConfig::default();

        let config = DashboardConfig {
            universe: self.universe.unwrap_or(defaults.universe),
            band_window: self.band_window.unwrap_or(defaults.band_window),
            band_multiplier: self.band_multiplier.unwrap_or(defaults.band_multiplier),
            table_rows: self.table_rows.unwrap_or(defaults.table_rows),
            chart_height: self.chart_height.unwrap_or(defaults.chart_height),
            lookback_days: self.lookback_days.unwrap_or(defaults.lookback_days),
            adjustment: self.adjustment.unwrap_or(defaults.adjustment),
            strict_fetch: self.strict_fetch.unwrap_or(defaults.strict_fetch),
        };

        config.validate()?;
        Ok(config)
    }
}
