use std::collections::BTreeMap;

pub const BUY_SIGNAL: &str = "buy_signal";
pub const SELL_SIGNAL: &str = "sell_signal";

/// A single value produced by a strategy evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalValue {
    Bool(bool),
    Int(i64),
    /// May be NaN when the indicator window was not full.
    Float(f64),
}

impl From<bool> for SignalValue {
    fn from(v: bool) -> Self {
        SignalValue::Bool(v)
    }
}

impl From<f64> for SignalValue {
    fn from(v: f64) -> Self {
        SignalValue::Float(v)
    }
}

impl From<usize> for SignalValue {
    fn from(v: usize) -> Self {
        SignalValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

/// Which result fields a strategy wants surfaced to callers.
pub type FieldFlags = BTreeMap<String, bool>;

/// Outcome of evaluating a strategy on the most recent bar.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalResult {
    pub buy_signal: bool,
    pub sell_signal: bool,
    values: BTreeMap<String, SignalValue>,
}

impl SignalResult {
    pub fn new(buy_signal: bool, sell_signal: bool) -> Self {
        Self {
            buy_signal,
            sell_signal,
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<SignalValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<SignalValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Look a field up by name, including `buy_signal` and `sell_signal`.
    pub fn get(&self, name: &str) -> Option<SignalValue> {
        match name {
            BUY_SIGNAL => Some(SignalValue::Bool(self.buy_signal)),
            SELL_SIGNAL => Some(SignalValue::Bool(self.sell_signal)),
            _ => self.values.get(name).copied(),
        }
    }

    /// Strategy-specific fields, excluding the two signals.
    pub fn values(&self) -> &BTreeMap<String, SignalValue> {
        &self.values
    }
}
