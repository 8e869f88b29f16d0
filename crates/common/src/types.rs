use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// One daily OHLCV observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Bars ordered strictly ascending by timestamp.
///
/// The ordering is checked on construction, so every indicator can treat
/// the last element as the most recent bar.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Wrap bars that are already in order. Rejects out-of-order or
    /// duplicate timestamps.
    pub fn new(bars: Vec<Bar>) -> Result<Self> {
        if let Some(pos) = bars
            .windows(2)
            .position(|w| w[1].timestamp <= w[0].timestamp)
        {
            return Err(Error::MalformedSeries(format!(
                "bar {} at {} does not follow {}",
                pos + 1,
                bars[pos + 1].timestamp,
                bars[pos].timestamp
            )));
        }
        Ok(Self { bars })
    }

    /// Sort bars and drop duplicate timestamps, keeping the last one seen.
    pub fn from_unordered(mut bars: Vec<Bar>) -> Self {
        bars.reverse();
        // stable sort keeps the originally-later duplicate first
        bars.sort_by_key(|b| b.timestamp);
        bars.dedup_by_key(|b| b.timestamp);
        Self { bars }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// The trailing `n` bars (all of them if fewer are available).
    pub fn tail(&self, n: usize) -> PriceSeries {
        let start = self.bars.len().saturating_sub(n);
        Self {
            bars: self.bars[start..].to_vec(),
        }
    }
}

/// Exchange the symbols are listed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Market {
    India,
    #[serde(rename = "US")]
    Us,
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Market::India => write!(f, "India"),
            Market::Us => write!(f, "US"),
        }
    }
}

impl std::str::FromStr for Market {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "India" => Ok(Market::India),
            "US" => Ok(Market::Us),
            other => Err(Error::InvalidMarket(other.to_string())),
        }
    }
}

/// Successful evaluation of one symbol.
///
/// `fields` holds the strategy-declared values, already coerced so that every
/// number is finite (non-finite values are `null`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanSuccess {
    pub symbol: String,
    pub buy_signal: bool,
    pub sell_signal: bool,
    pub last_price: Option<f64>,
    pub volume: Option<f64>,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanFailure {
    pub symbol: String,
    pub error: String,
}

/// One entry of a scan response: either the signal fields or an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScanRecord {
    Success(ScanSuccess),
    Failure(ScanFailure),
}

impl ScanRecord {
    pub fn failure(symbol: impl Into<String>, error: impl Into<String>) -> Self {
        ScanRecord::Failure(ScanFailure {
            symbol: symbol.into(),
            error: error.into(),
        })
    }

    pub fn symbol(&self) -> &str {
        match self {
            ScanRecord::Success(s) => &s.symbol,
            ScanRecord::Failure(f) => &f.symbol,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ScanRecord::Success(_) => None,
            ScanRecord::Failure(f) => Some(&f.error),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ScanRecord::Failure(_))
    }
}
