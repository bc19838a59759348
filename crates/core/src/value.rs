//! Caller-side value formatting
//!
//! The patch engine splices replacement text verbatim and never decides
//! quoting. [`SetValue`] is where a caller's typed value becomes canonical
//! JSON text: strings are quoted and escaped, structured values are
//! serialized, numbers, booleans and null pass through as literals.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pre-formatted JSON text for a set operation
///
/// # Example
///
/// ```
/// use fieldpatch_core::SetValue;
/// use serde_json::json;
///
/// assert_eq!(SetValue::string("say \"hi\"").as_str(), r#""say \"hi\"""#);
/// assert_eq!(SetValue::from(42).as_str(), "42");
/// assert_eq!(SetValue::from(json!({"a": [1, 2]})).as_str(), r#"{"a":[1,2]}"#);
/// assert_eq!(SetValue::raw("null").as_str(), "null");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetValue(String);

impl SetValue {
    /// Use `text` as-is
    ///
    /// The patch engine rejects text that is not exactly one JSON value.
    pub fn raw(text: impl Into<String>) -> Self {
        SetValue(text.into())
    }

    /// Quote and escape `s` as a JSON string literal
    pub fn string(s: &str) -> Self {
        SetValue(serde_json::Value::String(s.to_owned()).to_string())
    }

    /// Serialize a JSON value compactly
    pub fn json(value: &serde_json::Value) -> Self {
        SetValue(value.to_string())
    }

    /// Serialize any `Serialize` type compactly
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be represented as JSON
    /// (e.g. a map with non-string keys).
    pub fn serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_string(value).map(SetValue)
    }

    /// JSON `null`
    pub fn null() -> Self {
        SetValue("null".to_string())
    }

    /// The formatted text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the formatted text
    pub fn into_string(self) -> String {
        self.0
    }

    /// True if the text is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for SetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SetValue {
    fn from(s: &str) -> Self {
        SetValue::string(s)
    }
}

impl From<String> for SetValue {
    fn from(s: String) -> Self {
        SetValue::string(&s)
    }
}

impl From<i64> for SetValue {
    fn from(v: i64) -> Self {
        SetValue(v.to_string())
    }
}

impl From<i32> for SetValue {
    fn from(v: i32) -> Self {
        SetValue(v.to_string())
    }
}

impl From<u64> for SetValue {
    fn from(v: u64) -> Self {
        SetValue(v.to_string())
    }
}

impl From<f64> for SetValue {
    /// Non-finite floats have no JSON representation and become `null`
    fn from(v: f64) -> Self {
        SetValue::json(&serde_json::Value::from(v))
    }
}

impl From<bool> for SetValue {
    fn from(v: bool) -> Self {
        SetValue(v.to_string())
    }
}

impl From<serde_json::Value> for SetValue {
    fn from(v: serde_json::Value) -> Self {
        SetValue::json(&v)
    }
}

impl From<&serde_json::Value> for SetValue {
    fn from(v: &serde_json::Value) -> Self {
        SetValue::json(v)
    }
}
