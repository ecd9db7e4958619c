//! Yahoo Finance fetcher

use super::{Adjustment, FetchQuery, FieldColumns, MarketDataFetcher, RawFrame};
use crate::error::{DashboardError, Result};
use crate::model::{DateRange, Field, Symbol};
use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, NaiveTime};
use std::collections::{BTreeMap, BTreeSet};
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

/// Daily quote as delivered by Yahoo, before alignment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyQuote {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
}

impl DailyQuote {
    fn field(&self, field: Field) -> f64 {
        match field {
            Field::Open => self.open,
            Field::High => self.high,
            Field::Low => self.low,
            Field::Close => self.close,
            Field::AdjClose => self.adj_close,
        }
    }

    /// Scale OHLC by the dividend/split factor
    fn auto_adjusted(self) -> Self {
        if self.close == 0.0 || !self.close.is_finite() {
            return self;
        }
        let factor = self.adj_close / self.close;
        Self {
            open: self.open * factor,
            high: self.high * factor,
            low: self.low * factor,
            close: self.adj_close,
            ..self
        }
    }
}

/// Fetches daily bars from Yahoo Finance, one symbol at a time
#[derive(Debug, Clone, Default)]
pub struct YahooFetcher {
    strict: bool,
}

impl YahooFetcher {
    /// Create a new Yahoo Finance fetcher
    pub fn new() -> Self {
        Self { strict: false }
    }

    /// Propagate per-symbol failures instead of treating the symbol as empty
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    async fn history(
        &self,
        provider: &yahoo::YahooConnector,
        symbol: &Symbol,
        (start, end): (OffsetDateTime, OffsetDateTime),
    ) -> Result<Vec<DailyQuote>> {
        let response = provider
            .get_quote_history(symbol.as_str(), start, end)
            .await
            .map_err(|e| DashboardError::Provider(format!("{symbol}: {e}")))?;

        let quotes = response
            .quotes()
            .map_err(|e| DashboardError::Provider(format!("{symbol}: {e}")))?;

        Ok(quotes
            .iter()
            .filter_map(|q| {
                let date = DateTime::from_timestamp(q.timestamp as i64, 0)?.date_naive();
                Some(DailyQuote {
                    date,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    adj_close: q.adjclose,
                })
            })
            .collect())
    }
}

#[async_trait]
impl MarketDataFetcher for YahooFetcher {
    async fn fetch(&self, query: &FetchQuery) -> Result<RawFrame> {
        if query.range.is_inverted() {
            tracing::debug!("Inverted range {}, skipping provider call", query.range);
            return Ok(RawFrame::empty_for(&query.symbols));
        }

        let window = provider_window(&query.range)?;
        let provider =
            yahoo::YahooConnector::new().map_err(|e| DashboardError::Provider(e.to_string()))?;

        let mut histories = Vec::with_capacity(query.symbols.len());
        for symbol in &query.symbols {
            match self.history(&provider, symbol, window).await {
                Ok(quotes) => {
                    tracing::debug!("Fetched {} quotes for {}", quotes.len(), symbol);
                    histories.push(quotes);
                }
                Err(e) if !self.strict => {
                    tracing::warn!("No data for {}: {}", symbol, e);
                    histories.push(Vec::new());
                }
                Err(e) => return Err(e),
            }
        }

        Ok(assemble_frame(
            &query.symbols,
            &query.range,
            histories,
            query.adjustment,
        ))
    }
}

/// Convert an inclusive date range to the provider's half-open UTC window
fn provider_window(range: &DateRange) -> Result<(OffsetDateTime, OffsetDateTime)> {
    let start = range.start.and_time(NaiveTime::MIN).and_utc().timestamp();
    let end = range
        .end
        .checked_add_days(Days::new(1))
        .ok_or_else(|| DashboardError::InvalidDate(format!("No day after {}", range.end)))?
        .and_time(NaiveTime::MIN)
        .and_utc()
        .timestamp();

    let start = OffsetDateTime::from_unix_timestamp(start)
        .map_err(|e| DashboardError::InvalidDate(format!("Invalid start timestamp: {e}")))?;
    let end = OffsetDateTime::from_unix_timestamp(end)
        .map_err(|e| DashboardError::InvalidDate(format!("Invalid end timestamp: {e}")))?;

    Ok((start, end))
}

/// Outer-join per-symbol histories on date and lay them out by symbol count
///
/// `histories` is parallel to `symbols`. Non-finite prices become gaps.
pub fn assemble_frame(
    symbols: &[Symbol],
    range: &DateRange,
    histories: Vec<Vec<DailyQuote>>,
    adjustment: Adjustment,
) -> RawFrame {
    let by_date: Vec<BTreeMap<NaiveDate, DailyQuote>> = histories
        .into_iter()
        .map(|quotes| {
            quotes
                .into_iter()
                .filter(|q| range.contains(q.date))
                .map(|q| match adjustment {
                    Adjustment::Raw => (q.date, q),
                    Adjustment::Auto => (q.date, q.auto_adjusted()),
                })
                .collect()
        })
        .collect();

    let dates: Vec<NaiveDate> = by_date
        .iter()
        .flat_map(|m| m.keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let columns_for = |quotes: &BTreeMap<NaiveDate, DailyQuote>| -> FieldColumns {
        Field::ALL
            .iter()
            .map(|field| {
                let values = dates
                    .iter()
                    .map(|d| {
                        quotes
                            .get(d)
                            .map(|q| q.field(*field))
                            .filter(|v| v.is_finite())
                    })
                    .collect();
                (*field, values)
            })
            .collect()
    };

    if symbols.len() == 1 {
        let columns = by_date.first().map(columns_for).unwrap_or_else(|| {
            Field::ALL.iter().map(|f| (*f, vec![None; dates.len()])).collect()
        });
        RawFrame::Single { dates, columns }
    } else {
        let columns = symbols
            .iter()
            .zip(by_date.iter())
            .map(|(symbol, quotes)| (symbol.clone(), columns_for(quotes)))
            .collect();
        RawFrame::Multi { dates, columns }
    }
}
