//! Value enum for dynamic field values

use std::borrow::Cow;

use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// A dynamic value held by a [`Record`](super::Record) field.
///
/// Records arrive from forms, local storage or remote endpoints as loosely
/// typed JSON, so values keep whatever shape they came in with. The table
/// engine interprets them through a column's semantic type at comparison time
/// rather than at load time.
///
/// | JSON | Rust Variant |
/// |------|--------------|
/// | null | `Null` |
/// | true/false | `Bool` |
/// | integer | `Int` |
/// | fractional number | `Float` |
/// | string | `String` |
/// | array, object | `Json` |
///
/// # Example
///
/// ```
/// use tatua_lib::model::Value;
///
/// let name = Value::from("Ann");
/// let age = Value::from(30);
/// let empty = Value::Null;
/// assert_eq!(age.as_text(), "30");
/// assert!(empty.is_empty());
/// # let _ = name;
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null/empty value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integral number.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// String value (free text or date-like text).
    String(String),
    /// Nested JSON kept opaque.
    Json(serde_json::Value),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for null and for the empty string.
    ///
    /// Zero and `false` are values, not emptiness.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Returns the display text of this value.
    ///
    /// Whole floats render without a fractional part so `25.0` and `25`
    /// read the same in a table cell.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Value::Null => Cow::Borrowed(""),
            Value::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Value::Int(n) => Cow::Owned(n.to_string()),
            Value::Float(n) => Cow::Owned(format_float(*n)),
            Value::String(s) => Cow::Borrowed(s.as_str()),
            Value::Json(v) => Cow::Owned(v.to_string()),
        }
    }

    /// Returns the string slice if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

fn format_float(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(n) => Value::Int(n),
            Err(_) => Value::Float(v as f64),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::String(v.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            other => Value::Json(other),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}
