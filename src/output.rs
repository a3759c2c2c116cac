//! JSON rendering of result trees.
//!
//! Encoding is delegated to `serde_json`. Object keys come out sorted because
//! [`Value::Object`] is a `BTreeMap`.
//!
//! # Examples
//!
//! ```
//! use hypeql::Value;
//! use hypeql::output::{errors_to_json, to_json};
//! use std::collections::BTreeMap;
//!
//! let mut obj = BTreeMap::new();
//! obj.insert("name".to_string(), Value::from("Alice"));
//! obj.insert("age".to_string(), Value::from(30));
//!
//! assert_eq!(to_json(&Value::Object(obj)).unwrap(), r#"{"age":30,"name":"Alice"}"#);
//! assert_eq!(errors_to_json(&["films.rating not found"]), r#"{"errors":["films.rating not found"]}"#);
//! ```

use std::fmt::Display;

use serde_json::json;

use crate::value::Value;

/// Compact JSON.
pub fn to_json(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// JSON with 2-space indentation.
pub fn to_json_pretty(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// The `{"errors": [...]}` body older clients expect in place of a result.
pub fn errors_to_json<E: Display>(errors: &[E]) -> String {
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    json!({ "errors": messages }).to_string()
}

/// Renders an execution outcome the way older clients expect it: the result
/// on success, the errors body otherwise. The flag is true for errors.
pub fn render_legacy<E: Display>(outcome: &Result<Value, E>) -> (String, bool) {
    match outcome {
        Ok(value) => match to_json(value) {
            Ok(json) => (json, false),
            Err(_) => (errors_to_json(&["JSON converting error"]), true),
        },
        Err(e) => (errors_to_json(&[e]), true),
    }
}
