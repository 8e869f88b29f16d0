use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use common::{Error, Result};

use crate::config::{KnoxvilleConfig, MovingAverageConfig, StrategyConfig, StrategyFileConfig};
use crate::{KnoxvilleStrategy, MovingAverageStrategy, Strategy};

pub const MOVING_AVERAGE: &str = "moving-average";
pub const KNOXVILLE: &str = "rb-knoxville";

/// Read-only table of the strategies callers can select by name.
///
/// Built once at startup and shared behind an `Arc`; nothing mutates it
/// afterwards.
pub struct StrategyRegistry {
    strategies: BTreeMap<String, Arc<dyn Strategy>>,
}

impl StrategyRegistry {
    /// The built-in strategies with default parameters.
    pub fn with_defaults() -> Result<Self> {
        let mut registry = Self::empty();
        registry.register(Arc::new(MovingAverageStrategy::new(
            MOVING_AVERAGE,
            MovingAverageConfig::default(),
        )?))?;
        registry.register(Arc::new(KnoxvilleStrategy::new(
            KNOXVILLE,
            KnoxvilleConfig::default(),
        )?))?;
        Ok(registry)
    }

    /// Build the registry from a strategy file. Unknown types, invalid
    /// parameters and duplicate names are configuration errors.
    pub fn from_config(file_cfg: &StrategyFileConfig) -> Result<Self> {
        if file_cfg.strategies.is_empty() {
            return Err(Error::Config("strategy file defines no strategies".into()));
        }
        let mut registry = Self::empty();
        for cfg in &file_cfg.strategies {
            registry.register(build_strategy(cfg)?)?;
        }
        Ok(registry)
    }

    fn empty() -> Self {
        Self {
            strategies: BTreeMap::new(),
        }
    }

    fn register(&mut self, strategy: Arc<dyn Strategy>) -> Result<()> {
        let name = strategy.name().to_string();
        if self.strategies.contains_key(&name) {
            return Err(Error::Config(format!("duplicate strategy name '{name}'")));
        }
        info!(name = %name, bars_back = ?strategy.bars_back(), "Registered strategy");
        self.strategies.insert(name, strategy);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Strategy>> {
        self.strategies.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.strategies.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Strategy>> {
        self.strategies.values()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

// ─── Strategy builders ────────────────────────────────────────────────────────

fn build_strategy(cfg: &StrategyConfig) -> Result<Arc<dyn Strategy>> {
    match cfg.strategy_type.as_str() {
        "moving-average" => {
            let params: MovingAverageConfig = cfg.typed_params()?;
            Ok(Arc::new(MovingAverageStrategy::new(cfg.name.clone(), params)?))
        }
        "knoxville" | "rb-knoxville" => {
            let params: KnoxvilleConfig = cfg.typed_params()?;
            Ok(Arc::new(KnoxvilleStrategy::new(cfg.name.clone(), params)?))
        }
        other => Err(Error::Config(format!(
            "unknown strategy type '{other}' for '{}'",
            cfg.name
        ))),
    }
}
