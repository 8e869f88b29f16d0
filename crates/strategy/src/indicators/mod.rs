//! Indicator series over close prices (oldest first).
//!
//! Every indicator returns values aligned with its input, trailing and
//! inclusive of the current bar, with NaN where the window is not yet full.
//! Strategies read the last element to evaluate the most recent bar.

pub mod bollinger;
pub mod roc;
pub mod rsi;
pub mod sma;

pub use bollinger::{BollingerBands, BollingerIndicator};
pub use roc::RocIndicator;
pub use rsi::RsiIndicator;
pub use sma::SmaIndicator;

/// Last value of an aligned series, NaN for an empty one.
pub fn latest(series: &[f64]) -> f64 {
    series.last().copied().unwrap_or(f64::NAN)
}

fn mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}

fn population_std_dev(window: &[f64], mean: f64) -> f64 {
    let variance = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / window.len() as f64;
    variance.sqrt()
}
