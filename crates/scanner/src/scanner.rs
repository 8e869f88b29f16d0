use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::{stream, FutureExt, StreamExt};
use tracing::{debug, warn};

use common::{Error, Market, MarketDataProvider, Result, ScanRecord, ScanSuccess};
use strategy::Strategy;

use crate::normalize::{finite, included_fields};

/// Lookback requested from the provider when the strategy has no `bars_back`.
pub const DEFAULT_BARS_BACK: usize = 200;

/// Runs one strategy against provider data, one symbol at a time.
///
/// `scan` never fails: every error, and any panic inside the provider or the
/// strategy, is turned into a failure record for that symbol alone.
#[derive(Clone)]
pub struct Scanner {
    provider: Arc<dyn MarketDataProvider>,
    strategy: Arc<dyn Strategy>,
}

impl Scanner {
    pub fn new(provider: Arc<dyn MarketDataProvider>, strategy: Arc<dyn Strategy>) -> Self {
        Self { provider, strategy }
    }

    /// Depth requested from the data provider.
    pub fn bars_back(&self) -> usize {
        self.strategy.bars_back().unwrap_or(DEFAULT_BARS_BACK)
    }

    pub async fn scan(&self, symbol: &str, market: Market) -> ScanRecord {
        let outcome = AssertUnwindSafe(self.try_scan(symbol, market))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(Error::Computation(panic_message(panic.as_ref()))));

        match outcome {
            Ok(success) => {
                debug!(
                    symbol,
                    strategy = self.strategy.name(),
                    buy = success.buy_signal,
                    sell = success.sell_signal,
                    "Scanned symbol"
                );
                ScanRecord::Success(success)
            }
            Err(e) => {
                warn!(symbol, strategy = self.strategy.name(), error = %e, "Scan failed");
                ScanRecord::failure(symbol, e.to_string())
            }
        }
    }

    /// Scan every symbol, at most `concurrency` at a time. Records come back
    /// in the order of `symbols`, one per symbol.
    pub async fn scan_batch(
        &self,
        symbols: &[String],
        market: Market,
        concurrency: usize,
    ) -> Vec<ScanRecord> {
        stream::iter(symbols.iter().cloned())
            .map(|symbol| async move { self.scan(&symbol, market).await })
            .buffered(concurrency.max(1))
            .collect()
            .await
    }

    async fn try_scan(&self, symbol: &str, market: Market) -> Result<ScanSuccess> {
        let series = self
            .provider
            .get_series(symbol, market, self.bars_back())
            .await?
            .filter(|s| !s.is_empty())
            .ok_or(Error::NoData)?;
        let last = series.last().cloned().ok_or(Error::NoData)?;

        let result = self.strategy.calculate_signals(&series)?;
        let fields = included_fields(&result, &self.strategy.parameters());

        Ok(ScanSuccess {
            symbol: symbol.to_string(),
            buy_signal: result.buy_signal,
            sell_signal: result.sell_signal,
            last_price: finite(last.close),
            volume: finite(last.volume),
            date: last.timestamp.date_naive(),
            fields,
        })
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "strategy panicked".to_string()
    }
}
