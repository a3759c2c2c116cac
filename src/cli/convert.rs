//! Query text to interchange JSON

use crate::{interchange, ParserConfig, QueryParser};

use super::CliError;

/// Parses `query` and returns its list-shaped interchange encoding.
pub fn query_to_interchange(
    query: &str,
    config: ParserConfig,
) -> Result<serde_json::Value, CliError> {
    let selections = QueryParser::new(config).parse(query)?;
    Ok(interchange::to_json(&selections))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_converts_nested_query() {
        let encoded = query_to_interchange(
            r#"{version, films(p: 1, title: "x") {name, comments {text}}}"#,
            ParserConfig::default(),
        )
        .unwrap();
        assert_eq!(
            encoded,
            json!(["version", ["films", ["name", ["comments", ["text"]]], {"p": 1, "title": "x"}]])
        );
    }

    #[test]
    fn test_reports_parse_errors() {
        let err = query_to_interchange("{films{name}", ParserConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::Parse(_)));
    }
}
