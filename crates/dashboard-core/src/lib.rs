//! Stock dashboard pipeline
//!
//! This crate turns a set of dashboard controls into a chart and a table:
//!
//! - Data fetching from Yahoo Finance behind the [`MarketDataFetcher`] trait
//! - Reshaping of single- and multi-symbol results into uniform tables
//! - Bollinger Bands over the primary symbol's close
//! - A Plotly-compatible figure with a fixed trace order
//! - A tail view of the primary symbol's table
//!
//! # Architecture
//!
//! Each render is a pure pass over an immutable [`DashboardRequest`]:
//! fetch → reshape → indicators → chart → table. The [`ControlPanel`] owns the
//! mutable control state and produces a fresh request for every render.
//!
//! # Example
//!
//! ```rust,ignore
//! use dashboard_core::{Dashboard, DashboardConfig, DashboardRequest, TickerUniverse};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(DashboardConfig::default());
//!     let dashboard = Dashboard::yahoo(config.clone());
//!
//!     let request = DashboardRequest::builder("AAPL")
//!         .compare(["MSFT", "NVDA"])
//!         .build(&TickerUniverse::from_config(&config))?;
//!
//!     let rendered = dashboard.render(&request).await?;
//!     println!("{}", rendered.figure.describe());
//!     println!("{}", rendered.view.render());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod chart;
pub mod config;
pub mod error;
pub mod export;
pub mod indicators;
pub mod model;
pub mod panel;
pub mod pipeline;
pub mod reshape;
pub mod table;
pub mod universe;

// Re-export main types for convenience
pub use api::{Adjustment, FetchQuery, MarketDataFetcher, RawFrame, YahooFetcher};
pub use chart::{ChartOptions, Figure, Trace, TraceKind};
pub use config::DashboardConfig;
pub use error::{DashboardError, Result};
pub use indicators::{BandedTable, BollingerBands};
pub use model::{AdjustedCloseTable, Bar, DateRange, Field, PriceTable, Symbol};
pub use panel::{ControlPanel, PanelAction, PanelCommand};
pub use pipeline::{Dashboard, Rendered};
pub use table::TableView;
pub use universe::{DashboardRequest, TickerUniverse};
