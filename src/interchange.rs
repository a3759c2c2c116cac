//! The list-shaped query encoding shared with hosts that build queries
//! without the parser.
//!
//! A leaf is a JSON string. A branch is a two or three element list:
//! `[name, [selections...]]` or `[name, [selections...], {arguments}]`, the
//! third element present only when there are arguments.
//!
//! ```
//! use hypeql::{interchange, QueryParser};
//! use serde_json::json;
//!
//! let query = QueryParser::default().parse(r#"{version, films(p: 2) {name}}"#).unwrap();
//! let encoded = interchange::to_json(&query);
//! assert_eq!(encoded, json!(["version", ["films", ["name"], {"p": 2}]]));
//! assert_eq!(interchange::from_json(&encoded).unwrap(), query);
//! ```
//!
//! Decoding is strict: anything that is not exactly this shape is rejected
//! with [`ExecutionError::IncorrectDataType`] naming where it was found.

use serde_json::{Map, Value as Json};

use crate::{
    ast::{ArgumentValue, Arguments, Selection},
    executor::{ExecutionError, dotted},
};

/// Encodes selections in the list shape.
pub fn to_json(selections: &[Selection]) -> Json {
    Json::Array(selections.iter().map(encode_selection).collect())
}

fn encode_selection(selection: &Selection) -> Json {
    match selection {
        Selection::Leaf(name) => Json::String(name.clone()),
        Selection::Branch {
            name,
            selections,
            arguments,
        } => {
            let mut list = vec![Json::String(name.clone()), to_json(selections)];
            if !arguments.is_empty() {
                list.push(Json::Object(
                    arguments
                        .iter()
                        .map(|(k, v)| (k.clone(), encode_argument(v)))
                        .collect(),
                ));
            }
            Json::Array(list)
        }
    }
}

fn encode_argument(value: &ArgumentValue) -> Json {
    match value {
        ArgumentValue::Int(n) => Json::Number((*n).into()),
        ArgumentValue::Str(s) => Json::String(s.clone()),
    }
}

/// Decodes and validates the list shape.
pub fn from_json(query: &Json) -> Result<Vec<Selection>, ExecutionError> {
    let mut path = Vec::new();
    match query {
        Json::Array(list) => decode_set(list, &mut path),
        _ => Err(incorrect(&path, "the query must be a list")),
    }
}

fn incorrect(path: &[String], reason: impl Into<String>) -> ExecutionError {
    ExecutionError::IncorrectDataType {
        path: dotted(path),
        reason: reason.into(),
    }
}

fn decode_set(list: &[Json], path: &mut Vec<String>) -> Result<Vec<Selection>, ExecutionError> {
    list.iter().map(|node| decode_selection(node, path)).collect()
}

fn decode_selection(node: &Json, path: &mut Vec<String>) -> Result<Selection, ExecutionError> {
    let list = match node {
        Json::String(name) => return Ok(Selection::Leaf(name.clone())),
        Json::Array(list) => list,
        _ => {
            return Err(incorrect(path, "only string or list types are allowed"));
        }
    };

    if list.len() != 2 && list.len() != 3 {
        return Err(incorrect(path, "a list must have two or three elements"));
    }

    let Json::String(name) = &list[0] else {
        return Err(incorrect(path, "the first element of a list must be a string"));
    };

    path.push(name.clone());

    let Json::Array(nested) = &list[1] else {
        return Err(incorrect(path, "the second element of a list must be a list"));
    };
    let arguments = match list.get(2) {
        Some(Json::Object(map)) => decode_arguments(map, path)?,
        Some(_) => {
            return Err(incorrect(path, "the third element of a list must be an object"));
        }
        None => Arguments::new(),
    };
    let selections = decode_set(nested, path)?;

    path.pop();

    Ok(Selection::Branch {
        name: name.clone(),
        selections,
        arguments,
    })
}

fn decode_arguments(map: &Map<String, Json>, path: &[String]) -> Result<Arguments, ExecutionError> {
    map.iter()
        .map(|(key, value)| {
            let value = match value {
                Json::String(s) => ArgumentValue::Str(s.clone()),
                Json::Number(n) => n.as_i64().map(ArgumentValue::Int).ok_or_else(|| {
                    incorrect(path, format!("argument '{}' must be an integer", key))
                })?,
                _ => {
                    return Err(incorrect(
                        path,
                        format!("argument '{}' must be an integer or a string", key),
                    ));
                }
            };
            Ok((key.clone(), value))
        })
        .collect()
}
