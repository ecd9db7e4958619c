//! Bollinger Bands over the primary symbol's close
//!
//! The middle band is a simple moving average; the envelope uses the sample
//! standard deviation (N-1 denominator) of the same trailing window. Positions
//! before the first full window are `None`.

use crate::error::{DashboardError, Result};
use crate::model::PriceTable;
use serde::Serialize;
use ta::{Next, indicators::SimpleMovingAverage};

/// Trailing mean over `window` samples, `None` until the window is full
pub fn rolling_mean(values: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    let mut sma =
        SimpleMovingAverage::new(window).map_err(|e| DashboardError::Indicator(e.to_string()))?;

    Ok(values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let mean = sma.next(v);
            (i + 1 >= window).then_some(mean)
        })
        .collect())
}

/// Trailing sample standard deviation, `None` until the window is full
pub fn rolling_sample_std(values: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    if window < 2 {
        return Err(DashboardError::Indicator(format!(
            "sample standard deviation needs a window of at least 2, got {window}"
        )));
    }

    Ok((0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            let mean = slice.iter().sum::<f64>() / window as f64;
            let ss: f64 = slice.iter().map(|v| (v - mean).powi(2)).sum();
            Some((ss / (window - 1) as f64).sqrt())
        })
        .collect())
}

/// Middle, upper and lower band aligned with the input series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BollingerBands {
    pub window: usize,
    pub multiplier: f64,
    pub middle: Vec<Option<f64>>,
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

impl BollingerBands {
    /// Compute bands over `closes`
    ///
    /// A series shorter than `window` yields bands that are `None` everywhere.
    pub fn compute(closes: &[f64], window: usize, multiplier: f64) -> Result<Self> {
        let middle = rolling_mean(closes, window)?;
        let std = rolling_sample_std(closes, window)?;

        let offset = |sign: f64| -> Vec<Option<f64>> {
            middle
                .iter()
                .zip(&std)
                .map(|(m, s)| Some((*m)? + sign * multiplier * (*s)?))
                .collect()
        };
        let upper = offset(1.0);
        let lower = offset(-1.0);

        Ok(Self {
            window,
            multiplier,
            middle,
            upper,
            lower,
        })
    }

    pub fn len(&self) -> usize {
        self.middle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middle.is_empty()
    }

    /// Number of positions with a full window
    pub fn defined_len(&self) -> usize {
        self.middle.iter().filter(|v| v.is_some()).count()
    }
}

/// Primary price table with optional band columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandedTable {
    pub prices: PriceTable,
    pub bands: Option<BollingerBands>,
}

impl BandedTable {
    /// Table without band columns
    pub fn plain(prices: PriceTable) -> Self {
        Self {
            prices,
            bands: None,
        }
    }

    /// Table with Bollinger Bands computed over its close column
    pub fn with_bollinger(prices: PriceTable, window: usize, multiplier: f64) -> Result<Self> {
        let bands = BollingerBands::compute(&prices.closes(), window, multiplier)?;
        tracing::debug!(
            "Computed Bollinger Bands for {}: {} of {} rows defined",
            prices.symbol,
            bands.defined_len(),
            bands.len()
        );
        Ok(Self {
            prices,
            bands: Some(bands),
        })
    }
}
