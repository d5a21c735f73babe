//! Argument codec - typed accessors over an untyped argument mapping
//!
//! Tool arguments arrive as a JSON object. Each handler declares which keys
//! it needs through `require_*` (fail the call before any side effect) or
//! `optional_*` (fall back to a default) accessors, so typing stays static
//! at the handler signature level even though the wire payload is untyped.
//!
//! Coercion is numeric-widening only: integer parameters accept
//! integer-valued floats (truncated toward zero), never strings. For
//! optional parameters a wrong-typed value is treated the same as an absent
//! one and the default applies silently.

use serde_json::{Map, Value};

use super::ToolError;

/// The argument mapping of a single tool invocation.
#[derive(Debug, Clone, Default)]
pub struct Args(Map<String, Value>);

impl Args {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    fn int_value(&self, key: &str) -> Option<i64> {
        let value = self.0.get(key)?;
        value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
    }

    fn float_value(&self, key: &str) -> Option<f64> {
        self.0.get(key)?.as_f64()
    }

    /// Extract a required integer argument.
    pub fn require_i64(&self, key: &str) -> Result<i64, ToolError> {
        self.int_value(key)
            .ok_or_else(|| ToolError::MissingParameter(key.to_string()))
    }

    /// Extract an optional integer argument, defaulting when absent or
    /// wrong-typed.
    pub fn optional_i64(&self, key: &str, default: i64) -> i64 {
        self.int_value(key).unwrap_or(default)
    }

    /// Extract a required float argument.
    pub fn require_f64(&self, key: &str) -> Result<f64, ToolError> {
        self.float_value(key)
            .ok_or_else(|| ToolError::MissingParameter(key.to_string()))
    }

    /// Extract an optional float argument, defaulting when absent or
    /// wrong-typed.
    pub fn optional_f64(&self, key: &str, default: f64) -> f64 {
        self.float_value(key).unwrap_or(default)
    }

    /// Extract a required string argument.
    pub fn require_str(&self, key: &str) -> Result<&str, ToolError> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::MissingParameter(key.to_string()))
    }

    /// Extract an optional string argument, defaulting when absent or
    /// wrong-typed.
    pub fn optional_str(&self, key: &str, default: &str) -> String {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    }

    /// Extract a required boolean argument.
    pub fn require_bool(&self, key: &str) -> Result<bool, ToolError> {
        self.0
            .get(key)
            .and_then(Value::as_bool)
            .ok_or_else(|| ToolError::MissingParameter(key.to_string()))
    }

    /// Extract an optional boolean argument, defaulting when absent or
    /// wrong-typed.
    pub fn optional_bool(&self, key: &str, default: bool) -> bool {
        self.0.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    fn string_list(&self, key: &str) -> Option<Vec<String>> {
        let array = self.0.get(key)?.as_array()?;
        // Non-string elements are skipped rather than failing the call.
        Some(
            array
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
        )
    }

    /// Extract a required string-list argument.
    pub fn require_str_list(&self, key: &str) -> Result<Vec<String>, ToolError> {
        self.string_list(key)
            .ok_or_else(|| ToolError::MissingParameter(key.to_string()))
    }

    /// Extract an optional string-list argument, empty when absent or
    /// wrong-typed.
    pub fn optional_str_list(&self, key: &str) -> Vec<String> {
        self.string_list(key).unwrap_or_default()
    }
}

impl From<Map<String, Value>> for Args {
    fn from(map: Map<String, Value>) -> Self {
        Self::new(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Args {
        match value {
            Value::Object(map) => Args::new(map),
            _ => panic!("test arguments must be an object"),
        }
    }

    #[test]
    fn required_int_present() {
        let a = args(json!({"x": 100}));
        assert_eq!(a.require_i64("x").unwrap(), 100);
    }

    #[test]
    fn required_int_missing_names_the_key() {
        let a = args(json!({}));
        let err = a.require_i64("x").unwrap_err();
        assert_eq!(err.to_string(), "required parameter 'x' is missing");
    }

    #[test]
    fn required_int_wrong_type_is_missing() {
        let a = args(json!({"x": "100"}));
        assert!(a.require_i64("x").is_err());
    }

    #[test]
    fn integer_valued_float_coerces() {
        let a = args(json!({"x": 200.0}));
        assert_eq!(a.require_i64("x").unwrap(), 200);
    }

    #[test]
    fn float_truncates_toward_zero() {
        let a = args(json!({"pos": 3.9, "neg": -3.9}));
        assert_eq!(a.require_i64("pos").unwrap(), 3);
        assert_eq!(a.require_i64("neg").unwrap(), -3);
    }

    #[test]
    fn optional_int_falls_back_on_wrong_type() {
        let a = args(json!({"delay": "fast"}));
        assert_eq!(a.optional_i64("delay", 100), 100);
    }

    #[test]
    fn optional_int_absent_uses_default() {
        let a = args(json!({}));
        assert_eq!(a.optional_i64("display_id", -1), -1);
    }

    #[test]
    fn no_string_to_number_coercion() {
        let a = args(json!({"x": "42"}));
        assert!(a.require_i64("x").is_err());
        assert_eq!(a.optional_i64("x", 7), 7);
    }

    #[test]
    fn optional_string_and_bool_defaults() {
        let a = args(json!({"button": 3, "double": "yes"}));
        assert_eq!(a.optional_str("button", "left"), "left");
        assert!(!a.optional_bool("double", false));
        let b = args(json!({"button": "right", "double": true}));
        assert_eq!(b.optional_str("button", "left"), "right");
        assert!(b.optional_bool("double", false));
    }

    #[test]
    fn string_list_keeps_only_strings() {
        let a = args(json!({"modifiers": ["ctrl", 1, "shift", null]}));
        assert_eq!(a.optional_str_list("modifiers"), vec!["ctrl", "shift"]);
    }

    #[test]
    fn string_list_absent_is_empty() {
        let a = args(json!({}));
        assert!(a.optional_str_list("modifiers").is_empty());
        assert!(a.require_str_list("modifiers").is_err());
    }

    #[test]
    fn optional_float() {
        let a = args(json!({"low": 2, "high": "x"}));
        assert_eq!(a.optional_f64("low", 1.0), 2.0);
        assert_eq!(a.optional_f64("high", 3.0), 3.0);
    }
}
