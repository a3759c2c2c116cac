use std::{collections::BTreeMap, fmt};

use serde::Serialize;

/// Arguments of a branch, keyed by argument name.
///
/// Keys are unique; the parser rejects a repeated key.
pub type Arguments = BTreeMap<String, ArgumentValue>;

/// An argument value.
///
/// Only integers and strings exist in the query language. A quoted token is
/// always a string, even when it only contains digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    /// Bare numeric token (`p: 2`)
    Int(i64),

    /// Quoted token (`title: "2"`)
    Str(String),
}

impl ArgumentValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgumentValue::Int(n) => Some(*n),
            ArgumentValue::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgumentValue::Str(s) => Some(s),
            ArgumentValue::Int(_) => None,
        }
    }
}

impl From<i64> for ArgumentValue {
    fn from(n: i64) -> Self {
        ArgumentValue::Int(n)
    }
}

impl From<&str> for ArgumentValue {
    fn from(s: &str) -> Self {
        ArgumentValue::Str(s.to_string())
    }
}

impl From<String> for ArgumentValue {
    fn from(s: String) -> Self {
        ArgumentValue::Str(s)
    }
}

impl fmt::Display for ArgumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentValue::Int(n) => write!(f, "{}", n),
            ArgumentValue::Str(s) => write!(f, "{:?}", s),
        }
    }
}
