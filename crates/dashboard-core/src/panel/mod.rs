//! Interactive control panel
//!
//! Holds the current value of every control and hands out an immutable
//! [`DashboardRequest`] snapshot for each render.

pub mod commands;

pub use commands::PanelCommand;

use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::model::{DateRange, Symbol};
use crate::universe::{DashboardRequest, TickerUniverse};
use chrono::{NaiveDate, Utc};

/// What the caller should do after a command was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    Render,
    ShowHelp,
    ShowTickers,
    Exit,
}

/// Current state of the dashboard controls
#[derive(Debug, Clone)]
pub struct ControlPanel {
    universe: TickerUniverse,
    primary: Symbol,
    comparisons: Vec<Symbol>,
    range: DateRange,
    show_candlesticks: bool,
    show_bollinger: bool,
}

impl ControlPanel {
    /// Panel with default controls: first ticker, no comparisons, trailing lookback ending today
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        Self::with_end_date(config, Utc::now().date_naive())
    }

    /// Same as [`ControlPanel::new`] with an explicit end date
    pub fn with_end_date(config: &DashboardConfig, end: NaiveDate) -> Result<Self> {
        let universe = TickerUniverse::from_config(config);
        let primary = universe
            .default_primary()
            .cloned()
            .ok_or_else(|| DashboardError::Config("ticker universe is empty".to_string()))?;

        Ok(Self {
            universe,
            primary,
            comparisons: Vec::new(),
            range: DateRange::trailing(end, config.lookback_days)?,
            show_candlesticks: true,
            show_bollinger: true,
        })
    }

    pub fn universe(&self) -> &TickerUniverse {
        &self.universe
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

    /// Select the primary symbol; it is dropped from the comparisons if present
    pub fn set_primary(&mut self, symbol: Symbol) -> Result<()> {
        if !self.universe.contains(&symbol) {
            return Err(DashboardError::InvalidSymbol(symbol.to_string()));
        }
        if self.comparisons.contains(&symbol) {
            tracing::debug!("Removing {} from comparisons, now primary", symbol);
            self.comparisons.retain(|s| s != &symbol);
        }
        self.primary = symbol;
        Ok(())
    }

    /// Replace the comparison symbols
    pub fn set_comparisons(&mut self, symbols: Vec<Symbol>) -> Result<()> {
        // Validate before mutating so a bad command leaves the panel unchanged
        let request = DashboardRequest::builder(self.primary.clone())
            .compare(symbols)
            .build(&self.universe)?;
        self.comparisons = request.comparisons().to_vec();
        Ok(())
    }

    pub fn set_start(&mut self, date: NaiveDate) {
        self.range.start = date;
    }

    pub fn set_end(&mut self, date: NaiveDate) {
        self.range.end = date;
    }

    pub fn set_candlesticks(&mut self, on: bool) {
        self.show_candlesticks = on;
    }

    pub fn set_bollinger(&mut self, on: bool) {
        self.show_bollinger = on;
    }

    /// Apply a parsed command
    pub fn apply(&mut self, command: PanelCommand) -> Result<PanelAction> {
        match command {
            PanelCommand::Stock { symbol } => self.set_primary(symbol)?,
            PanelCommand::Compare { symbols } => self.set_comparisons(symbols)?,
            PanelCommand::Start { date } => self.set_start(date),
            PanelCommand::End { date } => self.set_end(date),
            PanelCommand::Candles { on } => self.set_candlesticks(on),
            PanelCommand::Bands { on } => self.set_bollinger(on),
            PanelCommand::Show => {}
            PanelCommand::Tickers => return Ok(PanelAction::ShowTickers),
            PanelCommand::Help => return Ok(PanelAction::ShowHelp),
            PanelCommand::Exit => return Ok(PanelAction::Exit),
        }
        Ok(PanelAction::Render)
    }

    /// Snapshot the controls for one render
    pub fn request(&self) -> Result<DashboardRequest> {
        DashboardRequest::builder(self.primary.clone())
            .compare(self.comparisons.iter().cloned())
            .range(self.range)
            .candlesticks(self.show_candlesticks)
            .bollinger(self.show_bollinger)
            .build(&self.universe)
    }

    /// One-line summary of the controls
    pub fn describe(&self) -> String {
        let on_off = |on: bool| if on { "on" } else { "off" };
        let comparisons = if self.comparisons.is_empty() {
            "-".to_string()
        } else {
            self.comparisons
                .iter()
                .map(Symbol::as_str)
                .collect::<Vec<_>>()
                .join(",")
        };
        format!(
            "{} vs [{}] | {} | candles {} | bbands {}",
            self.primary,
            comparisons,
            self.range,
            on_off(self.show_candlesticks),
            on_off(self.show_bollinger)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn panel() -> ControlPanel {
        ControlPanel::with_end_date(&DashboardConfig::default(), date(2025, 6, 30)).unwrap()
    }

    fn syms(symbols: &[&str]) -> Vec<Symbol> {
        symbols.iter().map(Symbol::new).collect()
    }

    #[test]
    fn test_defaults() {
        let panel = panel();
        let request = panel.request().unwrap();

        assert_eq!(request.primary().as_str(), "AAPL");
        assert!(request.comparisons().is_empty());
        assert_eq!(request.range(), DateRange::new(date(2024, 6, 30), date(2025, 6, 30)));
        assert!(request.show_candlesticks());
        assert!(request.show_bollinger());
    }

    #[test]
    fn test_set_primary_removes_it_from_comparisons() {
        let mut panel = panel();
        panel.set_comparisons(syms(&["MSFT", "NVDA"])).unwrap();
        panel.set_primary(Symbol::new("MSFT")).unwrap();

        assert_eq!(panel.primary().as_str(), "MSFT");
        assert_eq!(panel.comparisons(), syms(&["NVDA"]).as_slice());
        assert!(panel.request().is_ok());
    }

    #[test]
    fn test_invalid_commands_leave_state_unchanged() {
        let mut panel = panel();
        panel.set_comparisons(syms(&["JPM"])).unwrap();

        assert!(panel.set_comparisons(syms(&["JPM", "IBM"])).is_err());
        assert!(panel.set_comparisons(syms(&["AAPL"])).is_err());
        assert!(panel.set_primary(Symbol::new("IBM")).is_err());

        assert_eq!(panel.primary().as_str(), "AAPL");
        assert_eq!(panel.comparisons(), syms(&["JPM"]).as_slice());
    }

    #[test]
    fn test_apply_commands() {
        let mut panel = panel();

        let action = panel.apply(PanelCommand::parse("/compare bac jpm").unwrap()).unwrap();
        assert_eq!(action, PanelAction::Render);

        panel.apply(PanelCommand::parse("/start 2025-01-01").unwrap()).unwrap();
        panel.apply(PanelCommand::parse("/candles off").unwrap()).unwrap();
        panel.apply(PanelCommand::parse("/bbands off").unwrap()).unwrap();

        let request = panel.request().unwrap();
        assert_eq!(request.comparisons(), syms(&["BAC", "JPM"]).as_slice());
        assert_eq!(request.range().start, date(2025, 1, 1));
        assert!(!request.show_candlesticks());
        assert!(!request.show_bollinger());

        assert_eq!(panel.apply(PanelCommand::Help).unwrap(), PanelAction::ShowHelp);
        assert_eq!(panel.apply(PanelCommand::Tickers).unwrap(), PanelAction::ShowTickers);
        assert_eq!(panel.apply(PanelCommand::Exit).unwrap(), PanelAction::Exit);
    }

    #[test]
    fn test_unbounded_lookback_is_an_error_not_a_panic() {
        let config = DashboardConfig {
            lookback_days: 200_000_000,
            ..DashboardConfig::default()
        };
        let err = ControlPanel::with_end_date(&config, date(2025, 6, 30)).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidDate(_)));
    }

    #[test]
    fn test_inverted_range_is_allowed() {
        let mut panel = panel();
        panel.set_start(date(2026, 1, 1));
        let request = panel.request().unwrap();
        assert!(request.range().is_inverted());
    }

    #[test]
    fn test_describe() {
        let mut panel = panel();
        panel.set_comparisons(syms(&["TSLA"])).unwrap();
        panel.set_bollinger(false);

        let summary = panel.describe();
        assert!(summary.starts_with("AAPL vs [TSLA]"));
        assert!(summary.ends_with("candles on | bbands off"));
    }
}
