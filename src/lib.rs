pub mod ast;
pub mod config;
pub mod context;
pub mod executor;
pub mod interchange;
pub mod output;
pub mod parser;
pub mod schema;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{ArgumentValue, Arguments, Selection};
pub use config::{Config, ExecutorConfig, ParserConfig};
pub use context::Context;
pub use executor::{ExecutionError, Executor};
pub use output::{to_json, to_json_pretty};
pub use parser::{ParseError, Position, QueryParser};
pub use schema::{BoxError, DataNode, FieldKind, FieldTable, FieldTableBuilder, Object, Resolution};
pub use value::Value;
