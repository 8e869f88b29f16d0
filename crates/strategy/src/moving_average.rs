use common::{Error, PriceSeries, Result};

use crate::config::MovingAverageConfig;
use crate::indicators::{latest, SmaIndicator};
use crate::signal::{FieldFlags, SignalResult};
use crate::Strategy;

/// Moving-average alignment strategy.
///
/// Buys when the averages are stacked longest-above-shortest and price sits
/// below the shortest one; sells on the mirror image.
pub struct MovingAverageStrategy {
    name: String,
    /// Labels and periods ordered by period, longest first.
    ordered: Vec<(String, usize)>,
}

impl MovingAverageStrategy {
    pub fn new(name: impl Into<String>, config: MovingAverageConfig) -> Result<Self> {
        config.validate()?;
        let mut ordered: Vec<(String, usize)> = config.periods.into_iter().collect();
        // BTreeMap order is by label, so equal periods stay label-ordered
        ordered.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(Self {
            name: name.into(),
            ordered,
        })
    }
}

impl Strategy for MovingAverageStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn calculate_signals(&self, series: &PriceSeries) -> Result<SignalResult> {
        let close = series
            .last()
            .map(|b| b.close)
            .ok_or_else(|| Error::InsufficientData("empty price series".into()))?;
        let closes = series.closes();

        let averages: Vec<f64> = self
            .ordered
            .iter()
            .map(|(_, period)| latest(&SmaIndicator::new(*period).compute(&closes)))
            .collect();

        let (buy, sell) = alignment_signals(&averages, close);
        let mut result = SignalResult::new(buy, sell);
        for ((label, _), value) in self.ordered.iter().zip(averages) {
            result.insert(label.clone(), value);
        }
        Ok(result)
    }

    fn parameters(&self) -> FieldFlags {
        self.ordered
            .iter()
            .map(|(label, _)| (label.clone(), true))
            .collect()
    }
}

/// `averages` must be ordered longest period first. Comparisons are strict,
/// so ties and NaN never produce a signal.
fn alignment_signals(averages: &[f64], close: f64) -> (bool, bool) {
    let Some(&shortest) = averages.last() else {
        return (false, false);
    };
    let descending = averages.windows(2).all(|w| w[0] > w[1]);
    let ascending = averages.windows(2).all(|w| w[0] < w[1]);
    (
        descending && shortest > close,
        ascending && shortest < close,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::SignalValue;
    use crate::test_support::series_from_closes;
    use std::collections::BTreeMap;

    fn strategy(periods: &[(&str, usize)]) -> MovingAverageStrategy {
        let periods: BTreeMap<String, usize> =
            periods.iter().map(|(l, p)| (l.to_string(), *p)).collect();
        MovingAverageStrategy::new("moving-average", MovingAverageConfig { periods }).unwrap()
    }

    #[test]
    fn descending_stack_above_price_buys() {
        // MA50 = 95, MA20 = 90, close = 80
        assert_eq!(alignment_signals(&[95.0, 90.0], 80.0), (true, false));
    }

    #[test]
    fn ascending_stack_below_price_sells() {
        assert_eq!(alignment_signals(&[90.0, 95.0], 100.0), (false, true));
    }

    #[test]
    fn misordered_stack_is_neutral() {
        // MA50 = 90 < MA20 = 95 with close below both
        assert_eq!(alignment_signals(&[90.0, 95.0], 80.0), (false, false));
        assert_eq!(alignment_signals(&[100.0, 90.0, 95.0], 80.0), (false, false));
    }

    #[test]
    fn ties_and_nan_are_neutral() {
        assert_eq!(alignment_signals(&[90.0, 90.0], 80.0), (false, false));
        assert_eq!(alignment_signals(&[90.0, 90.0], 100.0), (false, false));
        assert_eq!(alignment_signals(&[f64::NAN, 90.0], 80.0), (false, false));
    }

    #[test]
    fn orders_labels_by_period_not_name() {
        let s = strategy(&[("MA200", 200), ("MA50", 50), ("MA20", 20)]);
        let labels: Vec<&str> = s.ordered.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["MA200", "MA50", "MA20"]);
    }

    #[test]
    fn falling_market_produces_buy_setup() {
        // steadily falling closes: MA50 > MA20 > close
        let closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
        let s = strategy(&[("MA20", 20), ("MA50", 50)]);
        let result = s.calculate_signals(&series_from_closes(&closes)).unwrap();
        assert!(result.buy_signal);
        assert!(!result.sell_signal);

        // MA20 over closes 141..=160 is 150.5; MA50 over 141..=190 is 165.5
        assert_eq!(result.get("MA20"), Some(SignalValue::Float(150.5)));
        assert_eq!(result.get("MA50"), Some(SignalValue::Float(165.5)));
    }

    #[test]
    fn rising_market_produces_sell_setup() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let s = strategy(&[("MA20", 20), ("MA50", 50)]);
        let result = s.calculate_signals(&series_from_closes(&closes)).unwrap();
        assert!(!result.buy_signal);
        assert!(result.sell_signal);
    }

    #[test]
    fn equal_periods_never_signal() {
        let closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
        let s = strategy(&[("A", 20), ("B", 20)]);
        let result = s.calculate_signals(&series_from_closes(&closes)).unwrap();
        assert!(!result.buy_signal && !result.sell_signal);
    }

    #[test]
    fn short_series_degrades_to_nan() {
        let s = MovingAverageStrategy::new("ma", MovingAverageConfig::default()).unwrap();
        let result = s.calculate_signals(&series_from_closes(&[10.0; 30])).unwrap();
        assert!(!result.buy_signal && !result.sell_signal);
        assert!(matches!(result.get("MA200"), Some(SignalValue::Float(v)) if v.is_nan()));
        assert_eq!(result.get("MA20"), Some(SignalValue::Float(10.0)));
    }

    #[test]
    fn empty_series_is_insufficient_data() {
        let s = MovingAverageStrategy::new("ma", MovingAverageConfig::default()).unwrap();
        let err = s.calculate_signals(&PriceSeries::default()).unwrap_err();
        assert!(matches!(err, Error::InsufficientData(_)));
    }

    #[test]
    fn declared_fields_are_the_labels() {
        let s = MovingAverageStrategy::new("ma", MovingAverageConfig::default()).unwrap();
        let params = s.parameters();
        assert_eq!(params.len(), 3);
        assert!(params.values().all(|&included| included));
        assert!(s.bars_back().is_none());
    }
}
