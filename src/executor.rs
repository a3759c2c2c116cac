use std::collections::{BTreeMap, HashSet};

use tracing::{debug, trace};

use crate::{
    ast::Selection,
    config::{self, ExecutorConfig},
    context::Context,
    interchange,
    schema::{BoxError, DataNode},
    value::Value,
};

/// Errors that can occur while executing a query against a data graph.
///
/// Paths are the dotted chain of field names from the root, e.g.
/// `films.comments.author`.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    /// No scalar field with that name on the node
    #[error("{path} not found")]
    FieldNotFound { path: String },

    /// No collection field with that name on the node
    #[error("{path} field not found")]
    CollectionNotFound { path: String },

    /// A query handed over in interchange form has the wrong shape
    #[error("{path} incorrect data type: {reason}")]
    IncorrectDataType { path: String, reason: String },

    /// Nesting went past the configured limit
    #[error("maximum query depth of {limit} exceeded at {path}")]
    DepthLimitExceeded { limit: u64, path: String },

    /// A batch-resolve hook failed; carries the hook's own error
    #[error(transparent)]
    BatchResolve(BoxError),
}

/// Renders a path for error messages. The root level has no field names.
pub(crate) fn dotted(path: &[String]) -> String {
    if path.is_empty() {
        "(root)".to_string()
    } else {
        path.join(".")
    }
}

fn dotted_with(path: &[String], name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path.join("."), name)
    }
}

/// Walks a selection tree over a data graph.
///
/// The executor holds only its configuration; every call gets its own path
/// and depth bookkeeping, and all mutable state lives in the caller's
/// [`Context`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Executor {
    config: ExecutorConfig,
}

impl Executor {
    pub fn new(config: ExecutorConfig) -> Self {
        Executor { config }
    }

    pub fn config(&self) -> ExecutorConfig {
        self.config
    }

    /// Executes `selections` against `root`.
    ///
    /// For every node, the type's batch-resolve hook runs first with the
    /// deduplicated names requested at that level. Then each selection is
    /// resolved: leaves through scalar fields, branches through collection
    /// fields whose elements are executed one level deeper. The first error
    /// aborts the whole call and nothing partial is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::LazyLock;
    /// use hypeql::{Context, Executor, ExecutorConfig, FieldTable, Object, Selection};
    ///
    /// struct Info {
    ///     version: String,
    /// }
    ///
    /// impl Object for Info {
    ///     fn field_table() -> &'static FieldTable<Self> {
    ///         static TABLE: LazyLock<FieldTable<Info>> = LazyLock::new(|| {
    ///             FieldTable::<Info>::builder()
    ///                 .scalar("version", |i| i.version.as_str().into())
    ///                 .build()
    ///         });
    ///         &TABLE
    ///     }
    /// }
    ///
    /// let info = Info { version: "1.2".into() };
    /// let executor = Executor::new(ExecutorConfig::default());
    ///
    /// let result = executor
    ///     .execute(&[Selection::leaf("version")], &info, &mut Context::new())
    ///     .unwrap();
    /// assert_eq!(result.get("version").and_then(|v| v.as_str()), Some("1.2"));
    ///
    /// let err = executor
    ///     .execute(&[Selection::leaf("build")], &info, &mut Context::new())
    ///     .unwrap_err();
    /// assert_eq!(err.to_string(), "build not found");
    /// ```
    pub fn execute(
        &self,
        selections: &[Selection],
        root: &dyn DataNode,
        ctx: &mut Context,
    ) -> Result<Value, ExecutionError> {
        let mut path = Vec::new();
        let result = self.execute_level(selections, root, ctx, &mut path, 1)?;
        debug!(root = root.type_name(), "executed query");
        Ok(result)
    }

    /// Decodes a query in interchange form and executes it.
    pub fn execute_interchange(
        &self,
        query: &serde_json::Value,
        root: &dyn DataNode,
        ctx: &mut Context,
    ) -> Result<Value, ExecutionError> {
        let selections = interchange::from_json(query)?;
        self.execute(&selections, root, ctx)
    }

    fn execute_level(
        &self,
        selections: &[Selection],
        node: &dyn DataNode,
        ctx: &mut Context,
        path: &mut Vec<String>,
        depth: usize,
    ) -> Result<Value, ExecutionError> {
        if config::exceeds(self.config.max_depth, depth) {
            return Err(ExecutionError::DepthLimitExceeded {
                limit: self.config.max_depth,
                path: dotted(path),
            });
        }

        let selections = first_by_name(selections);

        let requested: Vec<&str> = selections.iter().map(|s| s.name()).collect();
        if let Some(outcome) = node.batch_resolve(ctx, &requested) {
            outcome.map_err(ExecutionError::BatchResolve)?;
        }

        let mut object = BTreeMap::new();
        for selection in selections {
            let value = match selection {
                Selection::Leaf(name) => node.resolve_scalar(name, ctx).ok_or_else(|| {
                    ExecutionError::FieldNotFound {
                        path: dotted_with(path, name),
                    }
                })?,
                Selection::Branch {
                    name,
                    selections: nested,
                    arguments,
                } => {
                    let mut items = Vec::new();
                    path.push(name.clone());
                    let walked = node.walk_collection(
                        name,
                        ctx,
                        arguments,
                        &mut |child: &dyn DataNode, ctx: &mut Context| {
                            items.push(self.execute_level(nested, child, ctx, path, depth + 1)?);
                            Ok(())
                        },
                    );
                    path.pop();

                    match walked {
                        Some(outcome) => outcome?,
                        None => {
                            return Err(ExecutionError::CollectionNotFound {
                                path: dotted_with(path, name),
                            });
                        }
                    }
                    trace!(field = %name, items = items.len(), "resolved collection");
                    Value::Array(items)
                }
            };
            object.insert(selection.name().to_string(), value);
        }

        Ok(Value::Object(object))
    }
}

/// Drops repeated names, keeping the first occurrence and the original order.
fn first_by_name(selections: &[Selection]) -> Vec<&Selection> {
    let mut seen = HashSet::new();
    selections
        .iter()
        .filter(|selection| seen.insert(selection.name()))
        .collect()
}
