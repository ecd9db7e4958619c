//! Figure export to JSON and standalone HTML

use crate::chart::Figure;
use crate::error::Result;
use minijinja::{Environment, context};
use std::path::Path;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{ title }}</title>
<script src="{{ plotly_src }}"></script>
</head>
<body>
<h1>Stock Dashboard</h1>
<div id="chart" style="width:100%;height:{{ height }}px;"></div>
<script>
const figure = {{ figure | safe }};
Plotly.newPlot("chart", figure.data, figure.layout, {responsive: true});
</script>
</body>
</html>
"#;

/// Serialize the figure as Plotly JSON
pub fn figure_json(figure: &Figure) -> Result<String> {
    Ok(serde_json::to_string(figure)?)
}

/// Render a self-contained page that draws the figure with plotly.js
pub fn render_html(figure: &Figure) -> Result<String> {
    // `</` would end the inline script early
    let figure_json = figure_json(figure)?.replace("</", "<\\/");

    let env = Environment::new();
    let page = env.render_str(
        PAGE_TEMPLATE,
        context! {
            title => &figure.layout.title.text,
            plotly_src => PLOTLY_CDN,
            height => figure.layout.height,
            figure => figure_json,
        },
    )?;
    Ok(page)
}

/// Write the HTML page to `path`, replacing any previous render
pub fn write_html(figure: &Figure, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, render_html(figure)?)?;
    tracing::info!("Wrote chart to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartOptions, compose};
    use crate::indicators::BandedTable;
    use crate::model::{AdjustedCloseTable, Bar, PriceTable, Symbol};
    use chrono::NaiveDate;

    fn figure() -> Figure {
        let bars = vec![Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            adj_close: 1.5,
        }];
        compose(
            &BandedTable::plain(PriceTable::new(Symbol::new("MSFT"), bars)),
            &AdjustedCloseTable::default(),
            &[],
            &ChartOptions::default(),
        )
    }

    #[test]
    fn test_json_carries_trace_types() {
        let json: serde_json::Value =
            serde_json::from_str(&figure_json(&figure()).unwrap()).unwrap();
        assert_eq!(json["data"][0]["type"], "candlestick");
        assert_eq!(json["data"][0]["name"], "MSFT");
        assert_eq!(json["layout"]["height"], 700);
    }

    #[test]
    fn test_html_embeds_figure() {
        let html = render_html(&figure()).unwrap();
        assert!(html.contains("<title>MSFT Stock Price</title>"));
        assert!(html.contains(r#""type":"candlestick""#));
        assert!(html.contains("height:700px"));
        assert!(html.contains(PLOTLY_CDN));
    }

    #[test]
    fn test_write_html() {
        let path =
            std::env::temp_dir().join(format!("dashboard-chart-{}.html", std::process::id()));
        write_html(&figure(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Plotly.newPlot"));
        std::fs::remove_file(&path).unwrap();
    }
}
