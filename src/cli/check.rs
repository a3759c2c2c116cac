//! Execute queries against the demo catalog

use crate::{Config, Context, Executor, QueryParser, Value};

use super::{Catalog, CliError};

/// Number of films the catalog lists when `films` has no arguments
const DEFAULT_FILM_COUNT: i64 = 3;

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The query to execute
    pub query: String,
    /// Seed stored under the `seed` context key
    pub seed: i64,
    /// Only validate syntax, don't execute
    pub syntax_only: bool,
    /// Depth limits for parsing and execution
    pub config: Config,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Query executed successfully
    Success(Value),
}

/// Execute a check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let parser = QueryParser::new(options.config.parser);
    let selections = parser.parse(&options.query)?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid);
    }

    let catalog = Catalog::new(DEFAULT_FILM_COUNT);
    let mut ctx = Context::new();
    ctx.insert("seed", options.seed);

    let result = Executor::new(options.config.executor).execute(&selections, &catalog, &mut ctx)?;
    Ok(CheckResult::Success(result))
}
