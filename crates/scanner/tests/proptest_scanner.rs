use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use common::{Bar, Market, MarketDataProvider, PriceSeries, Result, ScanRecord};
use scanner::Scanner;
use strategy::StrategyRegistry;

/// Serves the same series for every symbol.
struct FixedProvider(Option<PriceSeries>);

#[async_trait]
impl MarketDataProvider for FixedProvider {
    async fn get_series(&self, _: &str, _: Market, _: usize) -> Result<Option<PriceSeries>> {
        Ok(self.0.clone())
    }
}

fn series(closes: &[f64]) -> PriceSeries {
    let start = Utc.with_ymd_and_hms(2022, 1, 3, 0, 0, 0).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            timestamp: start + Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 100.0,
        })
        .collect();
    PriceSeries::new(bars).unwrap()
}

proptest! {
    /// Any series, including empty ones and ones with NaN closes, produces
    /// exactly one record whose JSON form has no non-finite numbers.
    #[test]
    fn scan_always_returns_a_json_safe_record(
        closes in prop::collection::vec(prop::option::weighted(0.9, 0.01f64..1_000.0), 0..260),
        use_knoxville in any::<bool>(),
    ) {
        let closes: Vec<f64> = closes.into_iter().map(|c| c.unwrap_or(f64::NAN)).collect();
        let registry = StrategyRegistry::with_defaults().unwrap();
        let strategy = registry
            .get(if use_knoxville { "rb-knoxville" } else { "moving-average" })
            .unwrap();
        let provider = Arc::new(FixedProvider(Some(series(&closes))));
        let scanner = Scanner::new(provider, strategy.clone());

        let rt = tokio::runtime::Runtime::new().unwrap();
        let record = rt.block_on(scanner.scan("TEST", Market::Us));

        prop_assert_eq!(record.symbol(), "TEST");
        match &record {
            ScanRecord::Failure(f) => {
                prop_assert!(closes.is_empty());
                prop_assert_eq!(f.error.as_str(), "No data available");
            }
            ScanRecord::Success(s) => {
                prop_assert!(!(use_knoxville && s.buy_signal && s.sell_signal));
                for field in strategy.parameters().keys() {
                    prop_assert!(s.fields.contains_key(field), "missing {}", field);
                }
            }
        }
        let text = serde_json::to_string(&record).unwrap();
        prop_assert!(!text.contains("NaN") && !text.contains("inf"));
    }
}
