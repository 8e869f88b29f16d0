/// RSI (Relative Strength Index) indicator.
///
/// Uses Wilder's smoothed moving average (same as TradingView / standard RSI).
/// The output is aligned with the input: index `i` holds the RSI of the bar
/// at `i`, and the first `period` entries are NaN.
#[derive(Debug, Clone)]
pub struct RsiIndicator {
    pub period: usize,
}

impl RsiIndicator {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self { period }
    }

    /// Compute RSI for every bar of `closes` (oldest first).
    pub fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let mut out = vec![f64::NAN; closes.len()];
        if closes.len() < self.period + 1 {
            return out;
        }

        let period = self.period as f64;
        let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

        // First average gain/loss over the initial `period` changes
        let (mut avg_gain, mut avg_loss) = changes[..self.period]
            .iter()
            .map(|&c| split(c))
            .fold((0.0, 0.0), |(g, l), (cg, cl)| (g + cg, l + cl));
        avg_gain /= period;
        avg_loss /= period;
        out[self.period] = rsi_value(avg_gain, avg_loss);

        // Wilder smoothing over remaining changes
        for (i, &change) in changes.iter().enumerate().skip(self.period) {
            let (gain, loss) = split(change);
            avg_gain = (avg_gain * (period - 1.0) + gain) / period;
            avg_loss = (avg_loss * (period - 1.0) + loss) / period;
            out[i + 1] = rsi_value(avg_gain, avg_loss);
        }

        out
    }
}

/// Split a close-to-close change into (gain, loss). NaN stays NaN on both sides.
fn split(change: f64) -> (f64, f64) {
    if change.is_nan() {
        (f64::NAN, f64::NAN)
    } else if change > 0.0 {
        (change, 0.0)
    } else {
        (0.0, -change)
    }
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        // flat window: no net pressure either way
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_is_nan_when_insufficient_data() {
        let rsi = RsiIndicator::new(14);
        // Need at least period+1 = 15 values
        let values = rsi.compute(&[100.0; 14]);
        assert_eq!(values.len(), 14);
        assert!(values.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn rsi_first_value_lands_on_index_period() {
        let rsi = RsiIndicator::new(14);
        let prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let values = rsi.compute(&prices);
        assert!(values[13].is_nan());
        assert!(values[14].is_finite());
    }

    #[test]
    fn rsi_all_gains_returns_100() {
        let rsi = RsiIndicator::new(3);
        let values = rsi.compute(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let value = *values.last().unwrap();
        assert!((value - 100.0).abs() < 1e-6, "Expected ~100, got {value}");
    }

    #[test]
    fn rsi_all_losses_returns_0() {
        let rsi = RsiIndicator::new(3);
        let values = rsi.compute(&[14.0, 13.0, 12.0, 11.0, 10.0]);
        let value = *values.last().unwrap();
        assert!(value.abs() < 1e-6, "Expected ~0, got {value}");
    }

    #[test]
    fn rsi_flat_prices_returns_50() {
        let rsi = RsiIndicator::new(14);
        let values = rsi.compute(&[250.0; 40]);
        assert!(values[14..].iter().all(|&v| v == 50.0));
    }

    #[test]
    fn rsi_known_value_stays_in_range() {
        let rsi = RsiIndicator::new(14);
        let prices = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.15, 43.61, 44.33, 44.83, 45.10,
            45.15, 44.34, 44.09, 44.50, 43.90,
        ];
        for v in rsi.compute(&prices).into_iter().skip(14) {
            assert!((0.0..=100.0).contains(&v), "RSI out of range: {v}");
        }
    }

    #[test]
    fn rsi_propagates_nan_close() {
        let rsi = RsiIndicator::new(2);
        let values = rsi.compute(&[1.0, 2.0, f64::NAN, 3.0, 4.0]);
        assert!(values.last().unwrap().is_nan());
    }
}
