use super::mean;

/// Simple moving average of the trailing `window` closes, inclusive of the
/// current bar. The first `window - 1` entries are NaN.
#[derive(Debug, Clone)]
pub struct SmaIndicator {
    pub window: usize,
}

impl SmaIndicator {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "SMA window must be >= 1");
        Self { window }
    }

    pub fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let mut out = vec![f64::NAN; closes.len()];
        for i in (self.window - 1)..closes.len() {
            out[i] = mean(&closes[i + 1 - self.window..=i]);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_aligns_with_input() {
        let values = SmaIndicator::new(3).compute(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(values[0].is_nan() && values[1].is_nan());
        assert_eq!(&values[2..], &[2.0, 3.0, 4.0]);
    }

    #[test]
    fn sma_shorter_series_is_all_nan() {
        let values = SmaIndicator::new(200).compute(&[10.0; 50]);
        assert_eq!(values.len(), 50);
        assert!(values.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn sma_window_one_is_identity() {
        let closes = [3.0, 1.0, 4.0];
        assert_eq!(SmaIndicator::new(1).compute(&closes), closes.to_vec());
    }
}
