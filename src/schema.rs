//! Field descriptors: how a host type tells the executor what it exposes.
//!
//! Every queryable type implements [`Object`] by returning a [`FieldTable`]
//! that is built once, usually in a `LazyLock` static. The table maps each
//! field name to either a scalar accessor or a collection accessor, each with
//! an optional resolver that may override the stored value for the current
//! execution. A table can also carry a batch-resolve hook that runs once per
//! node before any of its fields.
//!
//! # Example
//!
//! ```
//! use std::sync::LazyLock;
//! use hypeql::{Arguments, Context, Executor, ExecutorConfig, FieldTable, Object, Resolution, Selection};
//!
//! #[derive(Default)]
//! struct Comment {
//!     text: String,
//! }
//!
//! impl Object for Comment {
//!     fn field_table() -> &'static FieldTable<Self> {
//!         static TABLE: LazyLock<FieldTable<Comment>> = LazyLock::new(|| {
//!             FieldTable::<Comment>::builder()
//!                 .scalar("text", |c| c.text.as_str().into())
//!                 .build()
//!         });
//!         &TABLE
//!     }
//! }
//!
//! struct Root {
//!     comments: Vec<Comment>,
//! }
//!
//! impl Root {
//!     fn latest(&self, _ctx: &mut Context, args: &Arguments) -> Resolution<Vec<Comment>> {
//!         match args.get("first").and_then(|v| v.as_int()) {
//!             Some(n) => Resolution::Override((0..n).map(|_| Comment::default()).collect()),
//!             None => Resolution::UseDefault,
//!         }
//!     }
//! }
//!
//! impl Object for Root {
//!     fn field_table() -> &'static FieldTable<Self> {
//!         static TABLE: LazyLock<FieldTable<Root>> = LazyLock::new(|| {
//!             FieldTable::<Root>::builder()
//!                 .collection_with("comments", |r| r.comments.as_slice(), Root::latest)
//!                 .build()
//!         });
//!         &TABLE
//!     }
//! }
//!
//! let root = Root { comments: vec![Comment { text: "hi".into() }] };
//! let query = vec![Selection::branch("comments", vec![Selection::leaf("text")])];
//! let result = Executor::new(ExecutorConfig::default())
//!     .execute(&query, &root, &mut Context::new())
//!     .unwrap();
//! assert_eq!(result.to_json(), serde_json::json!({"comments": [{"text": "hi"}]}));
//! ```

use std::{any, collections::HashMap, fmt};

use tracing::trace;

use crate::{ast::Arguments, context::Context, executor::ExecutionError, value::Value};

/// Error type batch-resolve hooks fail with. It reaches the caller unchanged.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// What a resolver decided for the current execution.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    /// Use this value instead of the stored one
    Override(T),
    /// Keep the stored value
    UseDefault,
}

pub type ScalarResolver<T> = fn(&T, &mut Context) -> Resolution<Value>;
pub type CollectionResolver<T, C> = fn(&T, &mut Context, &Arguments) -> Resolution<Vec<C>>;
pub type BatchResolver<T> = fn(&T, &mut Context, &[&str]) -> Result<(), BoxError>;

/// Callback the executor passes to a collection field; invoked once per element.
pub type Visit<'v> = dyn FnMut(&dyn DataNode, &mut Context) -> Result<(), ExecutionError> + 'v;

type Walk<T> = Box<
    dyn Fn(&T, &mut Context, &Arguments, &mut Visit<'_>) -> Result<(), ExecutionError>
        + Send
        + Sync,
>;

/// A host type that can be queried.
pub trait Object: Sized + 'static {
    fn field_table() -> &'static FieldTable<Self>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar,
    Collection,
}

enum Field<T> {
    Scalar {
        raw: fn(&T) -> Value,
        resolver: Option<ScalarResolver<T>>,
    },
    Collection {
        walk: Walk<T>,
    },
}

/// Statically declared fields of one [`Object`] type.
pub struct FieldTable<T> {
    fields: HashMap<&'static str, Field<T>>,
    batch_resolve: Option<BatchResolver<T>>,
}

impl<T: Object> FieldTable<T> {
    /// Starts an empty table. Accessor closures cannot infer `T`, so name it
    /// at the call site: `FieldTable::<Film>::builder()`.
    pub fn builder() -> FieldTableBuilder<T> {
        FieldTableBuilder {
            table: FieldTable {
                fields: HashMap::new(),
                batch_resolve: None,
            },
        }
    }

    pub fn kind(&self, name: &str) -> Option<FieldKind> {
        self.fields.get(name).map(|field| match field {
            Field::Scalar { .. } => FieldKind::Scalar,
            Field::Collection { .. } => FieldKind::Collection,
        })
    }

    /// Declared field names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.fields.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn has_batch_resolve(&self) -> bool {
        self.batch_resolve.is_some()
    }
}

impl<T> fmt::Debug for FieldTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.fields.keys().collect();
        names.sort_unstable();
        f.debug_struct("FieldTable")
            .field("type", &any::type_name::<T>())
            .field("fields", &names)
            .field("batch_resolve", &self.batch_resolve.is_some())
            .finish()
    }
}

/// Builder for [`FieldTable`]. Declaring a name twice keeps the last declaration.
pub struct FieldTableBuilder<T> {
    table: FieldTable<T>,
}

impl<T: Object> FieldTableBuilder<T> {
    /// Scalar field read straight from the node.
    pub fn scalar(self, name: &'static str, raw: fn(&T) -> Value) -> Self {
        self.insert(name, Field::Scalar { raw, resolver: None })
    }

    /// Scalar field whose resolver may override the stored value.
    pub fn scalar_with(
        self,
        name: &'static str,
        raw: fn(&T) -> Value,
        resolver: ScalarResolver<T>,
    ) -> Self {
        self.insert(
            name,
            Field::Scalar {
                raw,
                resolver: Some(resolver),
            },
        )
    }

    /// Collection of child nodes read straight from the node.
    pub fn collection<C: Object>(self, name: &'static str, raw: fn(&T) -> &[C]) -> Self {
        self.insert(name, Field::Collection { walk: walk(raw, None) })
    }

    /// Collection whose resolver may replace the stored children.
    pub fn collection_with<C: Object>(
        self,
        name: &'static str,
        raw: fn(&T) -> &[C],
        resolver: CollectionResolver<T, C>,
    ) -> Self {
        self.insert(
            name,
            Field::Collection {
                walk: walk(raw, Some(resolver)),
            },
        )
    }

    /// Hook run once per node before its fields, with the requested names.
    pub fn batch_resolve(mut self, hook: BatchResolver<T>) -> Self {
        self.table.batch_resolve = Some(hook);
        self
    }

    pub fn build(self) -> FieldTable<T> {
        self.table
    }

    fn insert(mut self, name: &'static str, field: Field<T>) -> Self {
        self.table.fields.insert(name, field);
        self
    }
}

fn walk<T: Object, C: Object>(
    raw: fn(&T) -> &[C],
    resolver: Option<CollectionResolver<T, C>>,
) -> Walk<T> {
    Box::new(move |node: &T, ctx: &mut Context, arguments: &Arguments, visit: &mut Visit<'_>| {
        if let Some(resolve) = resolver {
            if let Resolution::Override(children) = resolve(node, ctx, arguments) {
                trace!(children = children.len(), "collection resolver override");
                return children
                    .iter()
                    .try_for_each(|child| visit(child as &dyn DataNode, ctx));
            }
        }
        raw(node)
            .iter()
            .try_for_each(|child| visit(child as &dyn DataNode, ctx))
    })
}

/// Object-safe view of an [`Object`], used by the executor to walk
/// heterogeneous graphs. Implemented for every `Object`.
pub trait DataNode {
    fn type_name(&self) -> &'static str;

    /// Runs the batch-resolve hook. `None` when the type declares none.
    fn batch_resolve(
        &self,
        ctx: &mut Context,
        requested: &[&str],
    ) -> Option<Result<(), BoxError>>;

    /// Value of a scalar field. `None` when no scalar field has that name.
    fn resolve_scalar(&self, name: &str, ctx: &mut Context) -> Option<Value>;

    /// Feeds every element of a collection field to `visit`. `None` when no
    /// collection field has that name.
    fn walk_collection(
        &self,
        name: &str,
        ctx: &mut Context,
        arguments: &Arguments,
        visit: &mut Visit<'_>,
    ) -> Option<Result<(), ExecutionError>>;
}

impl<T: Object> DataNode for T {
    fn type_name(&self) -> &'static str {
        any::type_name::<T>()
    }

    fn batch_resolve(
        &self,
        ctx: &mut Context,
        requested: &[&str],
    ) -> Option<Result<(), BoxError>> {
        let hook = T::field_table().batch_resolve?;
        trace!(node = any::type_name::<T>(), ?requested, "batch resolve");
        Some(hook(self, ctx, requested))
    }

    fn resolve_scalar(&self, name: &str, ctx: &mut Context) -> Option<Value> {
        let Some(Field::Scalar { raw, resolver }) = T::field_table().fields.get(name) else {
            return None;
        };
        if let Some(resolve) = resolver {
            if let Resolution::Override(value) = resolve(self, ctx) {
                trace!(field = name, "scalar resolver override");
                return Some(value);
            }
        }
        Some(raw(self))
    }

    fn walk_collection(
        &self,
        name: &str,
        ctx: &mut Context,
        arguments: &Arguments,
        visit: &mut Visit<'_>,
    ) -> Option<Result<(), ExecutionError>> {
        let Some(Field::Collection { walk }) = T::field_table().fields.get(name) else {
            return None;
        };
        Some(walk(self, ctx, arguments, visit))
    }
}
