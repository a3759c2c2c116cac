// tests/executor_tests.rs

use std::sync::LazyLock;

use hypeql::{
    ArgumentValue, Arguments, BoxError, Context, ExecutionError, Executor, ExecutorConfig,
    FieldKind, FieldTable, Object, Resolution, Selection, Value,
};
use pretty_assertions::assert_eq;
use serde_json::json;

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Default)]
struct A {
    foo: String,
    bar: bool,
    clist: Vec<C>,
}

impl A {
    fn resolve_bar(&self, _ctx: &mut Context) -> Resolution<Value> {
        Resolution::Override(Value::Boolean(true))
    }

    fn resolve_clist(&self, _ctx: &mut Context, args: &Arguments) -> Resolution<Vec<C>> {
        match args.get("first").and_then(ArgumentValue::as_int) {
            Some(n) => Resolution::Override((0..n).map(|_| C::default()).collect()),
            None => Resolution::UseDefault,
        }
    }
}

impl Object for A {
    fn field_table() -> &'static FieldTable<Self> {
        static TABLE: LazyLock<FieldTable<A>> = LazyLock::new(|| {
            FieldTable::<A>::builder()
                .scalar("foo", |a| a.foo.as_str().into())
                .scalar_with("bar", |a| a.bar.into(), A::resolve_bar)
                .collection_with("clist", |a| a.clist.as_slice(), A::resolve_clist)
                .collection("blist", |_| &[] as &[B])
                .build()
        });
        &TABLE
    }
}

#[derive(Default)]
struct C {
    text: String,
}

impl C {
    fn prefetch(&self, ctx: &mut Context, _requested: &[&str]) -> Result<(), BoxError> {
        ctx.insert("text", "Hello");
        Ok(())
    }

    fn resolve_text(&self, ctx: &mut Context) -> Resolution<Value> {
        match ctx.get("text") {
            Some(text) => Resolution::Override(text.clone()),
            None => Resolution::UseDefault,
        }
    }
}

impl Object for C {
    fn field_table() -> &'static FieldTable<Self> {
        static TABLE: LazyLock<FieldTable<C>> = LazyLock::new(|| {
            FieldTable::<C>::builder()
                .scalar_with("text", |c| c.text.as_str().into(), C::resolve_text)
                .batch_resolve(C::prefetch)
                .build()
        });
        &TABLE
    }
}

#[derive(Debug)]
struct Unavailable;

impl std::fmt::Display for Unavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error throws here")
    }
}

impl std::error::Error for Unavailable {}

/// Node whose batch-resolve hook always fails.
struct B;

impl Object for B {
    fn field_table() -> &'static FieldTable<Self> {
        static TABLE: LazyLock<FieldTable<B>> = LazyLock::new(|| {
            FieldTable::<B>::builder()
                .scalar("id", |_| Value::Integer(1))
                .batch_resolve(|_, _, _| Err(Unavailable.into()))
                .build()
        });
        &TABLE
    }
}

struct FailingRoot {
    items: Vec<B>,
}

impl Object for FailingRoot {
    fn field_table() -> &'static FieldTable<Self> {
        static TABLE: LazyLock<FieldTable<FailingRoot>> = LazyLock::new(|| {
            FieldTable::<FailingRoot>::builder()
                .scalar("ok", |_| Value::Boolean(true))
                .collection("items", |r| r.items.as_slice())
                .build()
        });
        &TABLE
    }
}

/// Records which names its batch-resolve hook was handed.
#[derive(Default)]
struct Recorder {
    x: i64,
}

impl Object for Recorder {
    fn field_table() -> &'static FieldTable<Self> {
        static TABLE: LazyLock<FieldTable<Recorder>> = LazyLock::new(|| {
            FieldTable::<Recorder>::builder()
                .scalar("x", |p| p.x.into())
                .scalar("y", |_| Value::Null)
                .batch_resolve(|_, ctx, requested| {
                    ctx.insert("requested", requested.join(","));
                    let calls = ctx.get("calls").and_then(Value::as_int).unwrap_or(0);
                    ctx.insert("calls", calls + 1);
                    Ok(())
                })
                .build()
        });
        &TABLE
    }
}

/// Self-similar tree for depth tests.
struct Tree {
    children: Vec<Tree>,
}

impl Tree {
    fn chain(levels: usize) -> Tree {
        let mut tree = Tree { children: vec![] };
        for _ in 0..levels {
            tree = Tree {
                children: vec![tree],
            };
        }
        tree
    }
}

impl Object for Tree {
    fn field_table() -> &'static FieldTable<Self> {
        static TABLE: LazyLock<FieldTable<Tree>> = LazyLock::new(|| {
            FieldTable::<Tree>::builder()
                .scalar("leaf", |t| t.children.is_empty().into())
                .collection("children", |t| t.children.as_slice())
                .build()
        });
        &TABLE
    }
}

fn fixture() -> A {
    A {
        clist: vec![C::default(), C::default()],
        ..A::default()
    }
}

fn run(selections: &[Selection], root: &dyn hypeql::DataNode) -> Result<Value, ExecutionError> {
    Executor::default().execute(selections, root, &mut Context::new())
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn test_resolvers_and_fallback() {
    let query = vec![
        Selection::leaf("foo"),
        Selection::leaf("bar"),
        Selection::branch("clist", vec![Selection::leaf("text")]),
    ];

    let result = run(&query, &fixture()).unwrap();

    assert_eq!(
        hypeql::to_json(&result).unwrap(),
        r#"{"bar":true,"clist":[{"text":"Hello"},{"text":"Hello"}],"foo":""}"#
    );
}

#[test]
fn test_batch_resolve_runs_before_fields() {
    let root = C {
        text: "stored".into(),
    };
    // The hook sets the context key before the resolver reads it
    let result = run(&[Selection::leaf("text")], &root).unwrap();
    assert_eq!(result.to_json(), json!({"text": "Hello"}));
}

#[test]
fn test_field_table_introspection() {
    let table = A::field_table();
    assert_eq!(table.names(), vec!["bar", "blist", "clist", "foo"]);
    assert_eq!(table.kind("foo"), Some(FieldKind::Scalar));
    assert_eq!(table.kind("clist"), Some(FieldKind::Collection));
    assert_eq!(table.kind("missing"), None);
    assert!(!table.has_batch_resolve());
    assert!(C::field_table().has_batch_resolve());
}

#[test]
fn test_arguments_reach_collection_resolver() {
    let query = vec![
        Selection::branch("clist", vec![Selection::leaf("text")])
            .with_arguments([("first".to_string(), ArgumentValue::Int(3))].into()),
    ];
    let result = run(&query, &fixture()).unwrap();
    assert_eq!(
        result.to_json(),
        json!({"clist": [{"text": "Hello"}, {"text": "Hello"}, {"text": "Hello"}]})
    );
}

#[test]
fn test_empty_collection_and_empty_block() {
    let result = run(
        &[
            Selection::branch("blist", vec![Selection::leaf("id")]),
            Selection::branch("clist", vec![]),
        ],
        &fixture(),
    )
    .unwrap();
    assert_eq!(result.to_json(), json!({"blist": [], "clist": [{}, {}]}));
}

#[test]
fn test_empty_query() {
    assert_eq!(run(&[], &fixture()).unwrap().to_json(), json!({}));
}

#[test]
fn test_context_survives_execution() {
    let mut ctx = Context::new();
    Executor::default()
        .execute(
            &[Selection::branch("clist", vec![Selection::leaf("text")])],
            &fixture(),
            &mut ctx,
        )
        .unwrap();
    assert_eq!(ctx.get("text"), Some(&Value::from("Hello")));
}

// ============================================================================
// Deduplication
// ============================================================================

#[test]
fn test_duplicate_names_resolved_once() {
    let mut ctx = Context::new();
    let result = Executor::default()
        .execute(
            &[
                Selection::leaf("x"),
                Selection::leaf("y"),
                Selection::leaf("x"),
            ],
            &Recorder { x: 5 },
            &mut ctx,
        )
        .unwrap();

    assert_eq!(result.to_json(), json!({"x": 5, "y": null}));
    assert_eq!(ctx.get("requested"), Some(&Value::from("x,y")));
    assert_eq!(ctx.get("calls"), Some(&Value::Integer(1)));
}

#[test]
fn test_first_duplicate_branch_wins() {
    let query = vec![
        Selection::branch("clist", vec![Selection::leaf("text")]),
        Selection::branch("clist", vec![]),
    ];
    let result = run(&query, &fixture()).unwrap();
    assert_eq!(
        result.to_json(),
        json!({"clist": [{"text": "Hello"}, {"text": "Hello"}]})
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unknown_scalar() {
    let err = run(
        &[Selection::branch("clist", vec![Selection::leaf("missing")])],
        &fixture(),
    )
    .unwrap_err();
    assert!(matches!(err, ExecutionError::FieldNotFound { ref path } if path == "clist.missing"));
    assert_eq!(err.to_string(), "clist.missing not found");
}

#[test]
fn test_unknown_collection() {
    let err = run(
        &[Selection::branch("nope", vec![Selection::leaf("x")])],
        &fixture(),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "nope field not found");
}

#[test]
fn test_kind_mismatch() {
    // A collection asked for as a leaf, and a scalar asked for as a branch
    let err = run(&[Selection::leaf("clist")], &fixture()).unwrap_err();
    assert_eq!(err.to_string(), "clist not found");

    let err = run(&[Selection::branch("foo", vec![])], &fixture()).unwrap_err();
    assert_eq!(err.to_string(), "foo field not found");
}

#[test]
fn test_batch_resolve_error_passes_through() {
    let root = FailingRoot { items: vec![B] };
    let err = run(
        &[
            Selection::leaf("ok"),
            Selection::branch("items", vec![Selection::leaf("id")]),
        ],
        &root,
    )
    .unwrap_err();

    assert_eq!(err.to_string(), "Error throws here");
    let ExecutionError::BatchResolve(inner) = err else {
        panic!("expected a batch-resolve failure");
    };
    assert!(inner.downcast_ref::<Unavailable>().is_some());
}

#[test]
fn test_batch_resolve_not_called_without_elements() {
    let root = FailingRoot { items: vec![] };
    let result = run(
        &[Selection::branch("items", vec![Selection::leaf("id")])],
        &root,
    )
    .unwrap();
    assert_eq!(result.to_json(), json!({"items": []}));
}

// ============================================================================
// Depth limit
// ============================================================================

fn nested_children(levels: usize) -> Vec<Selection> {
    let mut selections = vec![Selection::leaf("leaf")];
    for _ in 0..levels {
        selections = vec![Selection::branch("children", selections)];
    }
    selections
}

#[test]
fn test_depth_limit() {
    let executor = Executor::new(ExecutorConfig { max_depth: 3 });
    let tree = Tree::chain(5);

    // Three levels: root, children, children
    let ok = executor.execute(&nested_children(2), &tree, &mut Context::new());
    assert!(ok.is_ok());

    let err = executor
        .execute(&nested_children(3), &tree, &mut Context::new())
        .unwrap_err();
    assert!(matches!(
        err,
        ExecutionError::DepthLimitExceeded { limit: 3, ref path }
            if path == "children.children.children"
    ));
}

#[test]
fn test_depth_matches_parser() {
    use hypeql::{ParserConfig, QueryParser};

    let query = "{children{children{children{leaf}}}}";
    let tree = Tree::chain(5);

    let parsed = QueryParser::default().parse(query).unwrap();
    assert!(
        Executor::new(ExecutorConfig { max_depth: 4 })
            .execute(&parsed, &tree, &mut Context::new())
            .is_ok()
    );
    assert!(QueryParser::new(ParserConfig { max_depth: 4 }).parse(query).is_ok());

    assert!(
        Executor::new(ExecutorConfig { max_depth: 3 })
            .execute(&parsed, &tree, &mut Context::new())
            .is_err()
    );
    assert!(QueryParser::new(ParserConfig { max_depth: 3 }).parse(query).is_err());
}

#[test]
fn test_zero_depth_is_unlimited() {
    let tree = Tree::chain(40);
    let result = run(&nested_children(40), &tree).unwrap();

    let mut node = &result;
    for _ in 0..40 {
        node = &node.get("children").unwrap().as_array().unwrap()[0];
    }
    assert_eq!(node.get("leaf"), Some(&Value::Boolean(true)));
}

// ============================================================================
// Interchange input
// ============================================================================

#[test]
fn test_execute_interchange() {
    let query = json!(["foo", ["clist", ["text"], {"first": 1}]]);
    let result = Executor::default()
        .execute_interchange(&query, &fixture(), &mut Context::new())
        .unwrap();
    assert_eq!(result.to_json(), json!({"clist": [{"text": "Hello"}], "foo": ""}));
}

#[test]
fn test_execute_interchange_rejects_bad_shape() {
    let err = Executor::default()
        .execute_interchange(&json!(["foo", 3]), &fixture(), &mut Context::new())
        .unwrap_err();
    assert!(matches!(err, ExecutionError::IncorrectDataType { .. }));
}
