//! Chart composition
//!
//! Builds a Plotly-compatible figure document. Trace order is fixed: the
//! primary price trace, then the Upper/Lower/Middle bands, then comparison lines
//! in selection order.

use crate::indicators::BandedTable;
use crate::model::{AdjustedCloseTable, Field, Symbol};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write;

const BAND_COLOR: &str = "gray";
const MIDDLE_BAND_COLOR: &str = "blue";
const BAND_OPACITY: f64 = 0.7;
const GRID_COLOR: &str = "#EBF0F8";

/// Display toggles that affect the chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    pub show_candlesticks: bool,
    pub show_bollinger: bool,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            show_candlesticks: true,
            show_bollinger: true,
            height: 700,
        }
    }
}

/// Complete figure: traces plus layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

/// One drawable series
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Candlestick(Candlestick),
    Scatter(Scatter),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceKind {
    Candlestick,
    Line,
}

impl Trace {
    pub fn name(&self) -> &str {
        match self {
            Trace::Candlestick(c) => &c.name,
            Trace::Scatter(s) => &s.name,
        }
    }

    pub fn kind(&self) -> TraceKind {
        match self {
            Trace::Candlestick(_) => TraceKind::Candlestick,
            Trace::Scatter(_) => TraceKind::Line,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Trace::Candlestick(c) => c.x.len(),
            Trace::Scatter(s) => s.x.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candlestick {
    pub name: String,
    pub x: Vec<NaiveDate>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scatter {
    pub name: String,
    pub mode: String,
    pub x: Vec<NaiveDate>,
    /// `null` entries render as gaps
    pub y: Vec<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl Scatter {
    fn line(name: impl Into<String>, x: Vec<NaiveDate>, y: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            mode: "lines".to_string(),
            x,
            y,
            line: None,
            opacity: None,
        }
    }

    fn band(name: &str, x: Vec<NaiveDate>, y: Vec<Option<f64>>, color: &str) -> Self {
        Self {
            line: Some(LineStyle {
                color: color.to_string(),
                width: 1.0,
            }),
            opacity: Some(BAND_OPACITY),
            ..Self::line(name, x, y)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub template: Template,
    pub height: u32,
}

/// Inline plotly.js template; plotly.js does not resolve named templates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    pub layout: TemplateLayout,
}

impl Template {
    /// White background with light grid lines
    pub fn white() -> Self {
        let grid = GridStyle {
            gridcolor: GRID_COLOR.to_string(),
            zerolinecolor: GRID_COLOR.to_string(),
        };
        Self {
            layout: TemplateLayout {
                paper_bgcolor: "white".to_string(),
                plot_bgcolor: "white".to_string(),
                xaxis: grid.clone(),
                yaxis: grid,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateLayout {
    pub paper_bgcolor: String,
    pub plot_bgcolor: String,
    pub xaxis: GridStyle,
    pub yaxis: GridStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridStyle {
    pub gridcolor: String,
    pub zerolinecolor: String,
}

impl Layout {
    fn for_symbol(symbol: &Symbol, height: u32) -> Self {
        Self {
            title: Title::new(format!("{symbol} Stock Price")),
            xaxis: Axis {
                title: Title::new("Date"),
                rangeslider: Some(RangeSlider { visible: false }),
            },
            yaxis: Axis {
                title: Title::new("Price (USD)"),
                rangeslider: None,
            },
            template: Template::white(),
            height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rangeslider: Option<RangeSlider>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeSlider {
    pub visible: bool,
}

/// Compose the dashboard figure
pub fn compose(
    table: &BandedTable,
    adjusted: &AdjustedCloseTable,
    comparisons: &[Symbol],
    options: &ChartOptions,
) -> Figure {
    let prices = &table.prices;
    let mut data = Vec::new();

    if !prices.is_empty() {
        let x = prices.dates();

        // A reshaped PriceTable always carries the four OHLC fields
        if options.show_candlesticks {
            data.push(Trace::Candlestick(Candlestick {
                name: prices.symbol.to_string(),
                x: x.clone(),
                open: prices.column(Field::Open),
                high: prices.column(Field::High),
                low: prices.column(Field::Low),
                close: prices.column(Field::Close),
            }));
        } else {
            let close = prices.closes().into_iter().map(Some).collect();
            data.push(Trace::Scatter(Scatter::line(
                prices.symbol.to_string(),
                x.clone(),
                close,
            )));
        }

        if let Some(bands) = table.bands.as_ref().filter(|_| options.show_bollinger) {
            data.push(Trace::Scatter(Scatter::band(
                "Upper BB",
                x.clone(),
                bands.upper.clone(),
                BAND_COLOR,
            )));
            data.push(Trace::Scatter(Scatter::band(
                "Lower BB",
                x.clone(),
                bands.lower.clone(),
                BAND_COLOR,
            )));
            data.push(Trace::Scatter(Scatter::band(
                "Middle BB",
                x,
                bands.middle.clone(),
                MIDDLE_BAND_COLOR,
            )));
        }
    }

    for symbol in comparisons {
        match adjusted.column(symbol) {
            Some(values) => data.push(Trace::Scatter(Scatter::line(
                symbol.to_string(),
                adjusted.dates.clone(),
                values.iter().copied().map(Some).collect(),
            ))),
            None => tracing::debug!("Skipping comparison {} with no data", symbol),
        }
    }

    Figure {
        data,
        layout: Layout::for_symbol(&prices.symbol, options.height),
    }
}

impl Figure {
    pub fn trace_names(&self) -> Vec<&str> {
        self.data.iter().map(Trace::name).collect()
    }

    /// One line per trace, for terminal output
    pub fn describe(&self) -> String {
        let mut out = format!("{}\n", self.layout.title.text);
        if self.data.is_empty() {
            out.push_str("  (no data)\n");
        }
        for (i, trace) in self.data.iter().enumerate() {
            let kind = match trace.kind() {
                TraceKind::Candlestick => "candlestick",
                TraceKind::Line => "line",
            };
            let _ = writeln!(
                out,
                "  {}. {:<11} {:<10} {} points",
                i + 1,
                kind,
                trace.name(),
                trace.len()
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bar, PriceTable};

    fn sym(s: &str) -> Symbol {
        Symbol::new(s)
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    fn prices(n: u32) -> PriceTable {
        let bars = (1..=n)
            .map(|d| Bar {
                date: date(d),
                open: d as f64,
                high: d as f64 + 1.0,
                low: d as f64 - 1.0,
                close: d as f64 + 0.5,
                adj_close: d as f64,
            })
            .collect();
        PriceTable::new(sym("AAPL"), bars)
    }

    fn adjusted(n: u32, symbols: &[&str]) -> AdjustedCloseTable {
        AdjustedCloseTable {
            dates: (1..=n).map(date).collect(),
            columns: symbols
                .iter()
                .map(|s| (sym(s), (1..=n).map(f64::from).collect()))
                .collect(),
        }
    }

    #[test]
    fn test_trace_order() {
        let table = BandedTable::with_bollinger(prices(25), 20, 2.0).unwrap();
        let figure = compose(
            &table,
            &adjusted(25, &["AAPL", "NVDA", "MSFT"]),
            &[sym("MSFT"), sym("TSLA"), sym("NVDA")],
            &ChartOptions::default(),
        );

        assert_eq!(
            figure.trace_names(),
            vec!["AAPL", "Upper BB", "Lower BB", "Middle BB", "MSFT", "NVDA"]
        );
        assert_eq!(figure.data[0].kind(), TraceKind::Candlestick);
        assert!(figure.data[1..].iter().all(|t| t.kind() == TraceKind::Line));
    }

    #[test]
    fn test_candle_toggle_only_changes_primary() {
        let table = BandedTable::with_bollinger(prices(25), 20, 2.0).unwrap();
        let adjusted = adjusted(25, &["AAPL", "MSFT"]);
        let comparisons = [sym("MSFT")];

        let candles = compose(&table, &adjusted, &comparisons, &ChartOptions::default());
        let lines = compose(
            &table,
            &adjusted,
            &comparisons,
            &ChartOptions {
                show_candlesticks: false,
                ..ChartOptions::default()
            },
        );

        assert_eq!(candles.data[0].kind(), TraceKind::Candlestick);
        match &lines.data[0] {
            Trace::Scatter(s) => {
                assert_eq!(s.name, "AAPL");
                assert_eq!(s.y[0], Some(1.5));
            }
            Trace::Candlestick(_) => panic!("Expected line trace"),
        }
        assert_eq!(candles.data[1..], lines.data[1..]);
    }

    #[test]
    fn test_bands_follow_toggle_and_availability() {
        let plain = BandedTable::plain(prices(25));
        let figure = compose(&plain, &AdjustedCloseTable::default(), &[], &ChartOptions::default());
        assert_eq!(figure.trace_names(), vec!["AAPL"]);

        let banded = BandedTable::with_bollinger(prices(25), 20, 2.0).unwrap();
        let figure = compose(
            &banded,
            &AdjustedCloseTable::default(),
            &[],
            &ChartOptions {
                show_bollinger: false,
                ..ChartOptions::default()
            },
        );
        assert_eq!(figure.trace_names(), vec!["AAPL"]);
    }

    #[test]
    fn test_band_styles() {
        let table = BandedTable::with_bollinger(prices(25), 20, 2.0).unwrap();
        let figure = compose(&table, &AdjustedCloseTable::default(), &[], &ChartOptions::default());

        let style = |i: usize| match &figure.data[i] {
            Trace::Scatter(s) => s.line.clone().map(|l| l.color),
            Trace::Candlestick(_) => None,
        };
        assert_eq!(style(1).as_deref(), Some("gray"));
        assert_eq!(style(2).as_deref(), Some("gray"));
        assert_eq!(style(3).as_deref(), Some("blue"));
    }

    #[test]
    fn test_empty_input_has_layout_only() {
        let table = BandedTable::with_bollinger(PriceTable::empty(sym("AAPL")), 20, 2.0).unwrap();
        let figure = compose(
            &table,
            &AdjustedCloseTable::default(),
            &[sym("MSFT")],
            &ChartOptions::default(),
        );

        assert!(figure.data.is_empty());
        assert_eq!(figure.layout.title.text, "AAPL Stock Price");
        assert_eq!(figure.layout.height, 700);
        assert!(figure.describe().contains("(no data)"));
    }

    #[test]
    fn test_serialized_layout() {
        let figure = compose(
            &BandedTable::plain(prices(2)),
            &AdjustedCloseTable::default(),
            &[],
            &ChartOptions::default(),
        );
        let json = serde_json::to_value(&figure).unwrap();

        assert_eq!(json["data"][0]["type"], "candlestick");
        assert_eq!(json["data"][0]["x"][0], "2024-07-01");
        assert_eq!(json["layout"]["xaxis"]["title"]["text"], "Date");
        assert_eq!(json["layout"]["yaxis"]["title"]["text"], "Price (USD)");
        assert_eq!(json["layout"]["xaxis"]["rangeslider"]["visible"], false);

        let template = &json["layout"]["template"]["layout"];
        assert_eq!(template["paper_bgcolor"], "white");
        assert_eq!(template["plot_bgcolor"], "white");
        assert_eq!(template["xaxis"]["gridcolor"], GRID_COLOR);
    }
}
