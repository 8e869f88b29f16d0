use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use common::{Error, Result};

/// Top-level strategy config file (TOML).
///
/// Example `config/strategies.toml`:
/// ```toml
/// [[strategy]]
/// type = "moving-average"
/// name = "moving-average"
///
/// [strategy.params.periods]
/// MA200 = 200
/// MA50 = 50
///
/// [[strategy]]
/// type = "knoxville"
/// name = "rb-knoxville"
///
/// [strategy.params]
/// bars_back = 120
/// rsi_oversold = 25.0
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StrategyFileConfig {
    #[serde(rename = "strategy", default)]
    pub strategies: Vec<StrategyConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StrategyConfig {
    /// Strategy type identifier: "moving-average" or "knoxville".
    #[serde(rename = "type")]
    pub strategy_type: String,
    /// Name callers select the strategy by.
    pub name: String,
    /// Strategy-specific parameters. Missing keys fall back to defaults.
    #[serde(default)]
    pub params: toml::Table,
}

impl StrategyConfig {
    /// Deserialize `params` into a typed strategy configuration.
    pub fn typed_params<T: DeserializeOwned>(&self) -> Result<T> {
        toml::Value::Table(self.params.clone())
            .try_into()
            .map_err(|e| Error::Config(format!("strategy '{}': {e}", self.name)))
    }
}

impl StrategyFileConfig {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read strategy config at '{path}': {e}")))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Labeled moving-average periods, e.g. `MA50 = 50`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MovingAverageConfig {
    pub periods: BTreeMap<String, usize>,
}

impl Default for MovingAverageConfig {
    fn default() -> Self {
        let periods = [("MA200", 200), ("MA50", 50), ("MA20", 20)]
            .into_iter()
            .map(|(label, period)| (label.to_string(), period))
            .collect();
        Self { periods }
    }
}

impl MovingAverageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.periods.is_empty() {
            return Err(Error::Config("moving-average needs at least one period".into()));
        }
        if let Some((label, _)) = self.periods.iter().find(|&(_, &p)| p == 0) {
            return Err(Error::Config(format!("moving-average period '{label}' must be >= 1")));
        }
        Ok(())
    }
}

/// RSI / Bollinger / momentum parameters.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct KnoxvilleConfig {
    /// Trailing bars analysed; also the depth requested from the data provider.
    pub bars_back: usize,
    pub rsi_period: usize,
    /// Window for both the rate-of-change and the Bollinger bands.
    pub momentum_period: usize,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
}

impl Default for KnoxvilleConfig {
    fn default() -> Self {
        Self {
            bars_back: 200,
            rsi_period: 14,
            momentum_period: 20,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
        }
    }
}

impl KnoxvilleConfig {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("bars_back", self.bars_back),
            ("rsi_period", self.rsi_period),
            ("momentum_period", self.momentum_period),
        ] {
            if value == 0 {
                return Err(Error::Config(format!("knoxville {field} must be >= 1")));
            }
        }
        if self.rsi_oversold.partial_cmp(&self.rsi_overbought) != Some(Ordering::Less) {
            return Err(Error::Config(format!(
                "knoxville rsi_oversold ({}) must be below rsi_overbought ({})",
                self.rsi_oversold, self.rsi_overbought
            )));
        }
        Ok(())
    }
}
