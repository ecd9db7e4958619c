//! Render pipeline: fetch, reshape, indicator, chart, table
//!
//! Every render starts from scratch with a fresh fetch; nothing is carried over
//! between calls.

use crate::api::{FetchQuery, MarketDataFetcher, YahooFetcher};
use crate::chart::{Figure, compose};
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::indicators::BandedTable;
use crate::model::AdjustedCloseTable;
use crate::reshape::{Reshaped, reshape};
use crate::table::TableView;
use crate::universe::DashboardRequest;
use std::sync::Arc;

/// Everything produced by one render pass
#[derive(Debug, Clone)]
pub struct Rendered {
    pub request: DashboardRequest,
    pub table: BandedTable,
    pub adjusted: AdjustedCloseTable,
    pub figure: Figure,
    pub view: TableView,
}

/// Dashboard bound to a data source and configuration
pub struct Dashboard {
    fetcher: Arc<dyn MarketDataFetcher>,
    config: Arc<DashboardConfig>,
}

impl Dashboard {
    pub fn new(fetcher: Arc<dyn MarketDataFetcher>, config: Arc<DashboardConfig>) -> Self {
        Self { fetcher, config }
    }

    /// Dashboard backed by Yahoo Finance
    pub fn yahoo(config: Arc<DashboardConfig>) -> Self {
        let fetcher = YahooFetcher::new().strict(config.strict_fetch);
        Self::new(Arc::new(fetcher), config)
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Run one full render for `request`
    pub async fn render(&self, request: &DashboardRequest) -> Result<Rendered> {
        let symbols = request.symbols();
        let query = FetchQuery {
            symbols: symbols.clone(),
            range: request.range(),
            adjustment: self.config.adjustment,
        };

        tracing::info!(
            "Rendering {} with {} comparison(s) over {}",
            request.primary(),
            request.comparisons().len(),
            request.range()
        );

        let raw = self.fetcher.fetch(&query).await?;
        let Reshaped { prices, adjusted } = reshape(raw, &symbols)?;

        let table = if request.show_bollinger() {
            BandedTable::with_bollinger(
                prices,
                self.config.band_window,
                self.config.band_multiplier,
            )?
        } else {
            BandedTable::plain(prices)
        };

        let figure = compose(
            &table,
            &adjusted,
            request.comparisons(),
            &request.chart_options(self.config.chart_height),
        );
        let view = TableView::tail(&table, self.config.table_rows);

        tracing::debug!(
            "Render produced {} traces and {} table rows",
            figure.data.len(),
            view.len()
        );

        Ok(Rendered {
            request: request.clone(),
            table,
            adjusted,
            figure,
            view,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FieldColumns, MockMarketDataFetcher, RawFrame};
    use crate::chart::TraceKind;
    use crate::error::DashboardError;
    use crate::model::{DateRange, Field, Symbol};
    use crate::universe::TickerUniverse;
    use chrono::{Duration, NaiveDate};

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn dates(n: usize) -> Vec<NaiveDate> {
        (0..n).map(|i| start() + Duration::days(i as i64)).collect()
    }

    fn columns(n: usize, base: f64) -> FieldColumns {
        Field::ALL
            .iter()
            .map(|f| (*f, (0..n).map(|i| Some(base + i as f64)).collect()))
            .collect()
    }

    fn request(primary: &str, compare: &[&str]) -> DashboardRequest {
        DashboardRequest::builder(primary)
            .compare(compare.iter().copied())
            .range(DateRange::new(start(), start() + Duration::days(60)))
            .build(&TickerUniverse::default())
            .unwrap()
    }

    fn dashboard(fetcher: MockMarketDataFetcher) -> Dashboard {
        Dashboard::new(Arc::new(fetcher), Arc::new(DashboardConfig::default()))
    }

    #[tokio::test]
    async fn test_single_symbol_render() {
        let mut fetcher = MockMarketDataFetcher::new();
        fetcher
            .expect_fetch()
            .withf(|q: &FetchQuery| q.symbols == vec![Symbol::new("AAPL")])
            .times(1)
            .returning(|_| {
                Ok(RawFrame::Single {
                    dates: dates(30),
                    columns: columns(30, 100.0),
                })
            });

        let rendered = dashboard(fetcher).render(&request("AAPL", &[])).await.unwrap();

        assert_eq!(rendered.table.prices.len(), 30);
        assert_eq!(rendered.table.bands.as_ref().unwrap().defined_len(), 11);
        assert_eq!(
            rendered.figure.trace_names(),
            vec!["AAPL", "Upper BB", "Lower BB", "Middle BB"]
        );
        assert_eq!(rendered.view.len(), 20);
        assert_eq!(rendered.view.headers.len(), 9);
    }

    #[tokio::test]
    async fn test_multi_symbol_render_skips_missing_comparison() {
        let mut fetcher = MockMarketDataFetcher::new();
        fetcher.expect_fetch().times(1).returning(|q: &FetchQuery| {
            assert_eq!(q.symbols.len(), 3);
            Ok(RawFrame::Multi {
                dates: dates(25),
                columns: vec![
                    (Symbol::new("AAPL"), columns(25, 100.0)),
                    (Symbol::new("MSFT"), columns(25, 300.0)),
                    (
                        Symbol::new("NVDA"),
                        Field::ALL.iter().map(|f| (*f, vec![None; 25])).collect(),
                    ),
                ],
            })
        });

        let rendered = dashboard(fetcher)
            .render(&request("AAPL", &["NVDA", "MSFT"]))
            .await
            .unwrap();

        assert_eq!(
            rendered.figure.trace_names(),
            vec!["AAPL", "Upper BB", "Lower BB", "Middle BB", "MSFT"]
        );
        assert_eq!(rendered.adjusted.columns.len(), 2);
        assert_eq!(rendered.adjusted.len(), 25);
    }

    #[tokio::test]
    async fn test_toggles_off() {
        let mut fetcher = MockMarketDataFetcher::new();
        fetcher.expect_fetch().returning(|_| {
            Ok(RawFrame::Single {
                dates: dates(25),
                columns: columns(25, 10.0),
            })
        });

        let request = DashboardRequest::builder("AAPL")
            .candlesticks(false)
            .bollinger(false)
            .build(&TickerUniverse::default())
            .unwrap();
        let rendered = dashboard(fetcher).render(&request).await.unwrap();

        assert!(rendered.table.bands.is_none());
        assert_eq!(rendered.figure.data.len(), 1);
        assert_eq!(rendered.figure.data[0].kind(), TraceKind::Line);
        assert_eq!(rendered.view.headers.len(), 6);
    }

    #[tokio::test]
    async fn test_empty_fetch_renders_empty() {
        let mut fetcher = MockMarketDataFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|q: &FetchQuery| Ok(RawFrame::empty_for(&q.symbols)));

        let rendered = dashboard(fetcher)
            .render(&request("AAPL", &["MSFT"]))
            .await
            .unwrap();

        assert!(rendered.table.prices.is_empty());
        assert!(rendered.adjusted.is_empty());
        assert!(rendered.figure.data.is_empty());
        assert_eq!(rendered.figure.layout.title.text, "AAPL Stock Price");
        assert!(rendered.view.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_fault_propagates() {
        let mut fetcher = MockMarketDataFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_| Err(DashboardError::Provider("unreachable".to_string())));

        let err = dashboard(fetcher)
            .render(&request("AAPL", &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::Provider(_)));
    }

    #[tokio::test]
    async fn test_shape_fault_propagates() {
        let mut fetcher = MockMarketDataFetcher::new();
        fetcher.expect_fetch().returning(|_| {
            Ok(RawFrame::Single {
                dates: dates(3),
                columns: columns(3, 1.0),
            })
        });

        let err = dashboard(fetcher)
            .render(&request("AAPL", &["MSFT"]))
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::ShapeMismatch(_)));
    }

    #[tokio::test]
    async fn test_each_render_fetches_again() {
        let mut fetcher = MockMarketDataFetcher::new();
        fetcher.expect_fetch().times(2).returning(|_| {
            Ok(RawFrame::Single {
                dates: dates(5),
                columns: columns(5, 1.0),
            })
        });

        let dashboard = dashboard(fetcher);
        let request = request("AAPL", &[]);
        let first = dashboard.render(&request).await.unwrap();
        let second = dashboard.render(&request).await.unwrap();
        assert_eq!(first.figure, second.figure);
    }
}
