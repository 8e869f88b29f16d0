//! Coercion of strategy output into JSON-safe values.

use serde_json::{Map, Value};

use strategy::{FieldFlags, SignalResult, SignalValue};

/// Keys the scanner sets itself; a strategy field with one of these names
/// is not copied into the record.
const RESERVED: [&str; 7] = [
    "symbol",
    "buy_signal",
    "sell_signal",
    "last_price",
    "volume",
    "date",
    "error",
];

/// `Some` only for finite numbers.
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// NaN and infinities become `null`.
pub fn to_json(value: SignalValue) -> Value {
    match value {
        SignalValue::Bool(b) => Value::Bool(b),
        SignalValue::Int(i) => Value::from(i),
        SignalValue::Float(f) => finite(f).map(Value::from).unwrap_or(Value::Null),
    }
}

/// Every field flagged for inclusion that the result actually carries.
pub fn included_fields(result: &SignalResult, parameters: &FieldFlags) -> Map<String, Value> {
    parameters
        .iter()
        .filter(|&(name, &include)| include && !RESERVED.contains(&name.as_str()))
        .filter_map(|(name, _)| result.get(name).map(|v| (name.clone(), to_json(v))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_floats_become_null() {
        assert_eq!(to_json(SignalValue::Float(f64::NAN)), Value::Null);
        assert_eq!(to_json(SignalValue::Float(f64::INFINITY)), Value::Null);
        assert_eq!(to_json(SignalValue::Float(1.5)), Value::from(1.5));
        assert_eq!(to_json(SignalValue::Int(14)), Value::from(14));
        assert_eq!(to_json(SignalValue::Bool(true)), Value::Bool(true));
    }

    #[test]
    fn only_included_and_present_fields_are_copied() {
        let result = SignalResult::new(false, false)
            .with("RSI", f64::NAN)
            .with("Momentum", 2.0)
            .with("hidden", 1.0);
        let params: FieldFlags = [
            ("RSI".to_string(), true),
            ("Momentum".to_string(), true),
            ("hidden".to_string(), false),
            ("absent".to_string(), true),
            ("buy_signal".to_string(), true),
        ]
        .into_iter()
        .collect();

        let fields = included_fields(&result, &params);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["RSI"], Value::Null);
        assert_eq!(fields["Momentum"], Value::from(2.0));
    }
}
