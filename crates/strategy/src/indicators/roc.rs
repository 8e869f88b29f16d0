/// Rate of Change momentum:
///   ROC = (close - close[i - period]) / close[i - period] * 100
///
/// NaN for the first `period` entries and wherever the reference close is zero.
#[derive(Debug, Clone)]
pub struct RocIndicator {
    pub period: usize,
}

impl RocIndicator {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ROC period must be >= 1");
        Self { period }
    }

    pub fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let mut out = vec![f64::NAN; closes.len()];
        for i in self.period..closes.len() {
            let prev = closes[i - self.period];
            if prev != 0.0 {
                out[i] = (closes[i] - prev) / prev * 100.0;
            }
        }
        out
    }
}
