//! CLI support for hypeql
//!
//! Provides programmatic access to the `hypeql` binary's commands so they can
//! be embedded in other tools.

mod catalog;
mod check;
mod convert;
mod docs;

pub use catalog::{Catalog, Comment, Film, MAX_FILM_COUNT};
pub use check::{execute_check, CheckOptions, CheckResult};
pub use convert::query_to_interchange;
pub use docs::{get_doc_category, get_docs_overview, DocCategory};

use std::{io, path::Path};

use crate::Config;

/// Errors that can occur during CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    #[error("Execution error: {0}")]
    Execution(#[from] crate::ExecutionError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No query provided. Pass it as an argument or pipe it to stdin.")]
    NoQuery,

    #[error("Unknown category: '{0}'\nRun 'hypeql docs' to see available categories.")]
    UnknownCategory(String),
}

/// Loads a JSON config file, then applies a depth override to both limits.
pub fn load_config(path: Option<&Path>, max_depth: Option<u64>) -> Result<Config, CliError> {
    let mut config = match path {
        Some(path) => Config::from_json_str(&std::fs::read_to_string(path)?)?,
        None => Config::default(),
    };
    if let Some(max_depth) = max_depth {
        config = Config::with_max_depth(max_depth);
    }
    Ok(config)
}
