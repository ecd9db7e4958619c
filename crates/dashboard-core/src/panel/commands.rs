//! Command parsing for the control panel
//!
//! Each command maps onto one dashboard control.

use crate::error::{DashboardError, Result};
use crate::model::Symbol;
use chrono::NaiveDate;

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelCommand {
    /// Select the primary symbol
    Stock { symbol: Symbol },
    /// Replace the comparison symbols; empty clears them
    Compare { symbols: Vec<Symbol> },
    /// Set the start date
    Start { date: NaiveDate },
    /// Set the end date
    End { date: NaiveDate },
    /// Toggle candlesticks
    Candles { on: bool },
    /// Toggle Bollinger Bands
    Bands { on: bool },
    /// Render again with the current controls
    Show,
    /// List the ticker universe
    Tickers,
    /// Show help
    Help,
    /// Exit the panel
    Exit,
}

impl PanelCommand {
    /// Parse a command from user input
    ///
    /// A bare word without a leading `/` selects that symbol as primary.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            return Err(DashboardError::Command("Empty input".to_string()));
        }

        let Some(command) = input.strip_prefix('/') else {
            let mut words = input.split_whitespace();
            return match (words.next(), words.next()) {
                (Some(symbol), None) => Ok(PanelCommand::Stock {
                    symbol: Symbol::new(symbol),
                }),
                _ => Err(DashboardError::Command(format!(
                    "Unknown input '{input}', type /help for commands"
                ))),
            };
        };

        let parts: Vec<&str> = command.split_whitespace().collect();
        let Some((cmd, args)) = parts.split_first() else {
            return Err(DashboardError::Command("Empty command".to_string()));
        };

        match cmd.to_lowercase().as_str() {
            "stock" | "s" => {
                let symbol = args.first().ok_or_else(|| {
                    DashboardError::Command("Missing symbol for stock command".to_string())
                })?;
                Ok(PanelCommand::Stock {
                    symbol: Symbol::new(symbol),
                })
            }
            "compare" | "cmp" | "c" => Ok(PanelCommand::Compare {
                symbols: args.iter().map(Symbol::new).collect(),
            }),
            "start" => Ok(PanelCommand::Start {
                date: parse_date(args.first(), "start")?,
            }),
            "end" => Ok(PanelCommand::End {
                date: parse_date(args.first(), "end")?,
            }),
            "candles" | "candlesticks" => Ok(PanelCommand::Candles {
                on: parse_toggle(args.first(), "candles")?,
            }),
            "bbands" | "bb" | "bollinger" => Ok(PanelCommand::Bands {
                on: parse_toggle(args.first(), "bbands")?,
            }),
            "show" | "render" | "r" => Ok(PanelCommand::Show),
            "tickers" | "t" => Ok(PanelCommand::Tickers),
            "help" | "h" | "?" => Ok(PanelCommand::Help),
            "exit" | "quit" | "q" => Ok(PanelCommand::Exit),
            other => Err(DashboardError::Command(format!("Unknown command: /{other}"))),
        }
    }

    /// Help text for the panel
    pub fn help_text() -> &'static str {
        "Controls:\n\
        /stock <SYMBOL>        - Select the primary stock (or type the symbol)\n\
        /compare [SYMBOL ...]  - Compare with other stocks (no symbols clears)\n\
        /start <YYYY-MM-DD>    - Set the start date\n\
        /end <YYYY-MM-DD>      - Set the end date\n\
        /candles on|off        - Show candlesticks\n\
        /bbands on|off         - Show Bollinger Bands\n\
        /show                  - Render again\n\
        /tickers               - List available tickers\n\
        /help                  - Show this help\n\
        /exit                  - Exit"
    }
}

fn parse_date(arg: Option<&&str>, name: &str) -> Result<NaiveDate> {
    let raw =
        arg.ok_or_else(|| DashboardError::Command(format!("Missing date for {name} command")))?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| DashboardError::InvalidDate(format!("{raw}: {e}")))
}

fn parse_toggle(arg: Option<&&str>, name: &str) -> Result<bool> {
    match arg.map(|s| s.to_lowercase()).as_deref() {
        Some("on" | "true" | "yes" | "1") => Ok(true),
        Some("off" | "false" | "no" | "0") => Ok(false),
        Some(other) => Err(DashboardError::Command(format!(
            "Expected on/off for {name}, got '{other}'"
        ))),
        None => Err(DashboardError::Command(format!("Missing on/off for {name} command"))),
    }
}
