//! Scalar coercion for raw form field values.
//!
//! Every field arrives as text. Coercion is purely syntactic: it looks only
//! at the textual value, never at the field's declared type. The reserved
//! boolean sentinels win over numeric parsing, so `"0"` and `"1"` are
//! booleans, not numbers.

use serde::Serialize;
use serde_json::Value;

/// Values a checked field reports on the wire.
const TRUE_SENTINELS: [&str; 2] = ["on", "1"];
/// Values an unchecked field reports on the wire.
const FALSE_SENTINELS: [&str; 2] = ["off", "0"];

/// A coerced form field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScalarValue {
    /// Checked/unchecked state, decoded from the reserved sentinels.
    Bool(bool),
    /// Integral numeric text.
    Int(i64),
    /// Non-integral numeric text.
    Float(f64),
    /// Anything else, verbatim.
    Text(String),
}

/// Coerce one raw field value.
///
/// Returns `None` for the empty string: empty fields are absent from the
/// serialized form and the typed model's defaults cover them. Integral text
/// coerces to [`ScalarValue::Int`] so JSON output carries `2` rather than
/// `2.0`; numeric text that is not finite stays text, since JSON cannot
/// represent it.
#[must_use]
pub fn coerce(raw: &str) -> Option<ScalarValue> {
    if raw.is_empty() {
        return None;
    }
    if TRUE_SENTINELS.contains(&raw) {
        return Some(ScalarValue::Bool(true));
    }
    if FALSE_SENTINELS.contains(&raw) {
        return Some(ScalarValue::Bool(false));
    }
    if let Ok(int) = raw.parse::<i64>() {
        return Some(ScalarValue::Int(int));
    }
    if let Ok(float) = raw.parse::<f64>()
        && float.is_finite()
    {
        return Some(ScalarValue::Float(float));
    }
    Some(ScalarValue::Text(raw.to_string()))
}

impl From<ScalarValue> for Value {
    fn from(scalar: ScalarValue) -> Self {
        match scalar {
            ScalarValue::Bool(value) => Self::Bool(value),
            ScalarValue::Int(value) => Self::Number(value.into()),
            ScalarValue::Float(value) => {
                // Coercion only produces finite floats, which always map to a
                // JSON number.
                serde_json::Number::from_f64(value).map_or(Self::Null, Self::Number)
            }
            ScalarValue::Text(value) => Self::String(value),
        }
    }
}
