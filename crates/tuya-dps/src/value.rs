//! Loose comparison and coercion of data point values
//!
//! Device profiles write `dps_val: 1` where the device reports `"1"` and vice
//! versa, so matching compares numbers numerically and otherwise falls back
//! to the textual form of each side.

use tuya_core::Value;

/// Textual form of a value used for loose matching and messages
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        other => other.to_string(),
    }
}

/// Compare two values the way device profiles expect them to match
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Null, Value::Null) => true,
        (Value::Bool(_), _) | (_, Value::Bool(_)) => false,
        (Value::Null, _) | (_, Value::Null) => false,
        _ => value_text(a) == value_text(b),
    }
}

/// Numeric view of a value; booleans are not numbers
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Numeric view that also accepts numeric strings
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Truthiness of a value
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// A floating point JSON value
pub fn float_value(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// A numeric JSON value; integral results stay integers so they compare
/// equal to what devices report
pub fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        Value::from(value as i64)
    } else {
        float_value(value)
    }
}

/// Format a bound for messages: scaled bounds always show a decimal point,
/// unscaled integral bounds do not
pub fn format_bound(value: f64, scaled: bool) -> String {
    if !scaled && value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:?}", value)
    }
}
