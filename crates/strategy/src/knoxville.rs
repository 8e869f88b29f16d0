use common::{Error, PriceSeries, Result};

use crate::config::KnoxvilleConfig;
use crate::indicators::bollinger::DEFAULT_NUM_STD;
use crate::indicators::{latest, BollingerIndicator, RocIndicator, RsiIndicator};
use crate::signal::{FieldFlags, SignalResult};
use crate::Strategy;

pub const RSI: &str = "RSI";
pub const MOMENTUM: &str = "Momentum";
pub const BB_HIGH: &str = "BB_high";
pub const BB_LOW: &str = "BB_low";

const CONFIG_FIELDS: [&str; 5] = [
    "bars_back",
    "rsi_period",
    "momentum_period",
    "rsi_oversold",
    "rsi_overbought",
];

/// RSI + Bollinger + momentum reversal strategy ("rb-knoxville").
///
/// Buys an oversold close below the lower band that has already turned up
/// over the momentum window; sells the overbought mirror image.
pub struct KnoxvilleStrategy {
    name: String,
    config: KnoxvilleConfig,
}

/// Indicator readings on the last bar of the analysis window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnoxvilleReading {
    pub close: f64,
    pub rsi: f64,
    pub momentum: f64,
    pub bb_high: f64,
    pub bb_low: f64,
}

impl KnoxvilleStrategy {
    pub fn new(name: impl Into<String>, config: KnoxvilleConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            name: name.into(),
            config,
        })
    }

    /// Indicators are computed on the trailing `bars_back` bars only, so
    /// their warm-up is relative to the analysis window.
    pub fn reading(&self, series: &PriceSeries) -> Result<KnoxvilleReading> {
        let window = series.tail(self.config.bars_back);
        let close = window
            .last()
            .map(|b| b.close)
            .ok_or_else(|| Error::InsufficientData("empty price series".into()))?;
        let closes = window.closes();

        let rsi = RsiIndicator::new(self.config.rsi_period).compute(&closes);
        let momentum = RocIndicator::new(self.config.momentum_period).compute(&closes);
        let bands =
            BollingerIndicator::new(self.config.momentum_period, DEFAULT_NUM_STD).compute(&closes);

        Ok(KnoxvilleReading {
            close,
            rsi: latest(&rsi),
            momentum: latest(&momentum),
            bb_high: latest(&bands.upper),
            bb_low: latest(&bands.lower),
        })
    }

    /// Returns `(buy, sell)`. The RSI regions are disjoint because
    /// `rsi_oversold < rsi_overbought`, so both can never be true.
    pub fn decide(&self, r: &KnoxvilleReading) -> (bool, bool) {
        let buy = r.rsi < self.config.rsi_oversold && r.close < r.bb_low && r.momentum > 0.0;
        let sell = r.rsi > self.config.rsi_overbought && r.close > r.bb_high && r.momentum < 0.0;
        (buy, sell)
    }
}

impl Strategy for KnoxvilleStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn bars_back(&self) -> Option<usize> {
        Some(self.config.bars_back)
    }

    fn calculate_signals(&self, series: &PriceSeries) -> Result<SignalResult> {
        let reading = self.reading(series)?;
        let (buy, sell) = self.decide(&reading);

        Ok(SignalResult::new(buy, sell)
            .with(RSI, reading.rsi)
            .with(MOMENTUM, reading.momentum)
            .with(BB_HIGH, reading.bb_high)
            .with(BB_LOW, reading.bb_low)
            .with("bars_back", self.config.bars_back)
            .with("rsi_period", self.config.rsi_period)
            .with("momentum_period", self.config.momentum_period)
            .with("rsi_oversold", self.config.rsi_oversold)
            .with("rsi_overbought", self.config.rsi_overbought))
    }

    fn parameters(&self) -> FieldFlags {
        [RSI, MOMENTUM, BB_HIGH, BB_LOW]
            .into_iter()
            .chain(CONFIG_FIELDS)
            .map(|field| (field.to_string(), true))
            .collect()
    }
}
