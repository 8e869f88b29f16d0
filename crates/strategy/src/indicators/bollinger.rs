use super::{mean, population_std_dev};

pub const DEFAULT_NUM_STD: f64 = 2.0;

/// Bollinger Bands: SMA(window) ± `num_std` × rolling population standard
/// deviation of close over the same window.
#[derive(Debug, Clone)]
pub struct BollingerIndicator {
    pub window: usize,
    pub num_std: f64,
}

/// Band series aligned with the input closes. NaN until `window` bars exist.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

impl BollingerIndicator {
    pub fn new(window: usize, num_std: f64) -> Self {
        assert!(window >= 1, "Bollinger window must be >= 1");
        Self { window, num_std }
    }

    pub fn compute(&self, closes: &[f64]) -> BollingerBands {
        let n = closes.len();
        let mut bands = BollingerBands {
            upper: vec![f64::NAN; n],
            middle: vec![f64::NAN; n],
            lower: vec![f64::NAN; n],
        };

        for i in (self.window - 1)..n {
            let window = &closes[i + 1 - self.window..=i];
            let middle = mean(window);
            let std = population_std_dev(window, middle);
            bands.middle[i] = middle;
            bands.upper[i] = middle + self.num_std * std;
            bands.lower[i] = middle - self.num_std * std;
        }
        bands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bollinger_basic() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let bb = BollingerIndicator::new(20, DEFAULT_NUM_STD).compute(&closes);
        let last = closes.len() - 1;
        assert!(bb.upper[last] > bb.middle[last]);
        assert!(bb.lower[last] < bb.middle[last]);
        assert!((bb.middle[last] - 10.5).abs() < 1e-10);
        assert!(bb.upper[last - 1].is_nan());
    }

    #[test]
    fn bollinger_uses_population_std() {
        // values 2,4,4,4,5,5,7,9: mean 5, population std 2
        let closes = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let bb = BollingerIndicator::new(8, 2.0).compute(&closes);
        assert!((bb.upper[7] - 9.0).abs() < 1e-10);
        assert!((bb.lower[7] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn bollinger_insufficient_data() {
        let bb = BollingerIndicator::new(20, DEFAULT_NUM_STD).compute(&[1.0, 2.0, 3.0]);
        assert!(bb.upper.iter().chain(&bb.lower).all(|v| v.is_nan()));
    }

    #[test]
    fn bollinger_flat_bands_collapse() {
        let bb = BollingerIndicator::new(20, DEFAULT_NUM_STD).compute(&[100.0; 20]);
        assert_eq!(bb.upper[19], 100.0);
        assert_eq!(bb.lower[19], 100.0);
    }
}
