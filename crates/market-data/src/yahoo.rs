use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use common::{Bar, Error, Market, MarketDataProvider, PriceSeries, Result};

const USER_AGENT: &str = concat!("signal-scanner/", env!("CARGO_PKG_VERSION"));

/// Daily-bar client for the Yahoo Finance chart API.
pub struct YahooClient {
    base_url: Url,
    http: Client,
}

impl YahooClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("invalid market data URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!("market data URL '{base_url}' cannot be a base")));
        }
        let http = Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self { base_url, http })
    }

    fn chart_url(&self, ticker: &str, range: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["v8", "finance", "chart", ticker]);
        }
        url.query_pairs_mut()
            .append_pair("range", range)
            .append_pair("interval", "1d");
        url
    }

    /// One chart request. An unknown ticker is an empty series, not an error.
    async fn fetch(&self, symbol: &str, ticker: &str, range: &str) -> Result<PriceSeries> {
        let url = self.chart_url(ticker, range);
        debug!(%symbol, %ticker, %range, "Fetching daily bars");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| market_error(symbol, e))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(PriceSeries::default());
        }
        let body = resp.text().await.map_err(|e| market_error(symbol, e))?;
        if !status.is_success() {
            return Err(market_error(symbol, format!("HTTP {status}: {body}")));
        }

        let chart: ChartResponse =
            serde_json::from_str(&body).map_err(|e| market_error(symbol, e))?;
        if let Some(err) = chart.chart.error {
            return Err(market_error(symbol, format!("{}: {}", err.code, err.description)));
        }

        let bars = chart
            .chart
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(parse_bars)
            .unwrap_or_default();
        Ok(PriceSeries::from_unordered(bars))
    }
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    async fn get_series(
        &self,
        symbol: &str,
        market: Market,
        bars_back: usize,
    ) -> Result<Option<PriceSeries>> {
        let ticker = ticker_for(symbol, market);
        let mut series = self.fetch(symbol, &ticker, range_for_bars(bars_back)).await?;
        if series.is_empty() {
            return Ok(None);
        }

        if series.len() < bars_back {
            debug!(%symbol, have = series.len(), want = bars_back, "Short history, retrying with max range");
            let full = self.fetch(symbol, &ticker, "max").await?;
            if full.len() > series.len() {
                series = full;
            }
        }

        Ok(Some(series.tail(bars_back)))
    }
}

/// Exchange-qualified ticker: NSE listings carry the `.NS` suffix.
pub fn ticker_for(symbol: &str, market: Market) -> String {
    match market {
        Market::India => format!("{symbol}.NS"),
        Market::Us => symbol.to_string(),
    }
}

/// Smallest chart range expected to hold `bars_back` trading days
/// (about 21 per month, 252 per year).
pub fn range_for_bars(bars_back: usize) -> &'static str {
    match bars_back {
        0..=5 => "5d",
        6..=20 => "1mo",
        21..=60 => "3mo",
        61..=120 => "6mo",
        121..=252 => "1y",
        253..=504 => "2y",
        505..=1260 => "5y",
        _ => "10y",
    }
}

fn market_error(symbol: &str, e: impl std::fmt::Display) -> Error {
    Error::MarketData {
        symbol: symbol.to_string(),
        message: e.to_string(),
    }
}

/// Rows without a close are dropped; missing open/high/low fall back to the
/// close and a missing volume to zero.
fn parse_bars(result: ChartResult) -> Vec<Bar> {
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let close = at(&quote.close, i)?;
            let timestamp = DateTime::from_timestamp(ts, 0)?;
            Some(Bar {
                timestamp,
                open: at(&quote.open, i).unwrap_or(close),
                high: at(&quote.high, i).unwrap_or(close),
                low: at(&quote.low, i).unwrap_or(close),
                close,
                volume: at(&quote.volume, i).unwrap_or(0.0),
            })
        })
        .collect()
}

fn at(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}

// ─── Response types ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Deserialize, Default)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}
