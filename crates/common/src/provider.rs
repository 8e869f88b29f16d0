use async_trait::async_trait;

use crate::{Market, PriceSeries, Result};

/// Source of historical daily bars.
///
/// `YahooClient` in `crates/market-data` implements this against the chart
/// API. The scanner only ever reads through this trait.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch up to `bars_back` trailing daily bars for `symbol`.
    ///
    /// `Ok(None)` means the provider has no data for the symbol. Transport
    /// failures are returned as `Err` and become per-symbol error records.
    async fn get_series(
        &self,
        symbol: &str,
        market: Market,
        bars_back: usize,
    ) -> Result<Option<PriceSeries>>;
}
