//! Depth limits for parsing and execution.
//!
//! Both limits are explicit values handed to [`QueryParser`](crate::QueryParser)
//! and [`Executor`](crate::Executor) at construction. `0` means unlimited.
//!
//! ```
//! use hypeql::Config;
//!
//! let config = Config::from_json_str(r#"{"parser": {"maxDepth": 4}}"#).unwrap();
//! assert_eq!(config.parser.max_depth, 4);
//! assert_eq!(config.executor.max_depth, 0);
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParserConfig {
    /// Deepest selection set the parser accepts (top level is 1)
    pub max_depth: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecutorConfig {
    /// Deepest level the executor walks (root level is 1)
    pub max_depth: u64,
}

/// Both limits, as a host would load them from a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub parser: ParserConfig,
    pub executor: ExecutorConfig,
}

impl Config {
    /// Same limit for the parser and the executor.
    pub fn with_max_depth(max_depth: u64) -> Self {
        Config {
            parser: ParserConfig { max_depth },
            executor: ExecutorConfig { max_depth },
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// True when `depth` goes past `max_depth`. A zero limit never trips.
pub(crate) fn exceeds(max_depth: u64, depth: usize) -> bool {
    max_depth != 0 && depth as u64 > max_depth
}
