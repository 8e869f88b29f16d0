pub mod config;
pub mod indicators;
pub mod knoxville;
pub mod moving_average;
pub mod registry;
pub mod signal;

pub use config::{KnoxvilleConfig, MovingAverageConfig, StrategyConfig, StrategyFileConfig};
pub use knoxville::KnoxvilleStrategy;
pub use moving_average::MovingAverageStrategy;
pub use registry::StrategyRegistry;
pub use signal::{FieldFlags, SignalResult, SignalValue, BUY_SIGNAL, SELL_SIGNAL};

use common::{PriceSeries, Result};

/// All strategy implementations must satisfy this trait.
///
/// Instances are immutable after construction and shared across concurrent
/// scans through the registry.
pub trait Strategy: Send + Sync {
    /// Name callers select this strategy by.
    fn name(&self) -> &str;

    /// Trailing bars the strategy is configured to analyse, if it has such a
    /// setting. The scanner falls back to its default depth otherwise.
    fn bars_back(&self) -> Option<usize> {
        None
    }

    /// Evaluate the most recent bar of `series`.
    ///
    /// Fails only for an empty series. A window too short for an indicator
    /// yields NaN values and no signal rather than an error.
    fn calculate_signals(&self, series: &PriceSeries) -> Result<SignalResult>;

    /// Result fields to surface to callers, with their inclusion flag.
    /// Every key is present in the output of `calculate_signals`.
    fn parameters(&self) -> FieldFlags;
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{Duration, TimeZone, Utc};
    use common::{Bar, PriceSeries};

    /// Daily bars starting 2024-01-01 with the given closes.
    pub fn series_from_closes(closes: &[f64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                timestamp: start + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_000.0,
            })
            .collect();
        PriceSeries::new(bars).unwrap()
    }
}
