//! Tests for the execution engine: concurrency, null propagation,
//! abstract type narrowing, and cancellation.

use crate::Json;
use crate::compile::CompiledOperation;
use crate::compile::compile;
use crate::execute::Executor;
use crate::execute::ResolverRegistry;
use crate::loader::Loaders;
use crate::response::FieldError;
use crate::response::Response;
use crate::schema::TypeGraph;
use crate::tests::fixtures::parse;
use crate::tests::fixtures::test_graph;
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn compile_op(graph: &TypeGraph, source: &str, variables: Json) -> CompiledOperation {
    let document = parse(source);
    let variables = variables.as_object().cloned().unwrap_or_default();
    compile(&document, graph, None, &variables).expect("test operation should compile")
}

async fn run(
    graph: &TypeGraph,
    registry: &ResolverRegistry,
    source: &str,
    root: Json,
) -> Response {
    run_with(graph, registry, source, root, CancellationToken::new()).await
}

async fn run_with(
    graph: &TypeGraph,
    registry: &ResolverRegistry,
    source: &str,
    root: Json,
    cancellation: CancellationToken,
) -> Response {
    let operation = compile_op(graph, source, json!({}));
    Executor::new(
        graph,
        registry,
        &operation,
        Arc::new(Loaders::new()),
        cancellation,
        8,
    )
    .execute(&root)
    .await
}

#[tokio::test]
async fn resolves_scalars_and_nested_objects() {
    let graph = test_graph();
    let registry = ResolverRegistry::new()
        .register("Query", "hello", |_ctx| async { Ok(json!("world")) })
        .register("Query", "viewer", |_ctx| async {
            Ok(json!({ "name": "ada" }))
        });

    let response = run(&graph, &registry, "{ hello viewer { name } }", Json::Null).await;
    assert!(response.is_ok(), "unexpected errors: {:?}", response.errors);
    assert_eq!(
        response.data,
        Some(json!({ "hello": "world", "viewer": { "name": "ada" } }))
    );
}

#[tokio::test]
async fn default_resolver_reads_parent_properties() {
    let graph = test_graph();
    let registry = ResolverRegistry::new();

    let response = run(
        &graph,
        &registry,
        "{ hello viewer { name } }",
        json!({ "hello": "from root", "viewer": { "name": "grace" } }),
    )
    .await;
    assert_eq!(
        response.data,
        Some(json!({ "hello": "from root", "viewer": { "name": "grace" } }))
    );
}

#[tokio::test]
async fn aliases_key_the_response() {
    let graph = test_graph();
    let registry =
        ResolverRegistry::new().register("Query", "hello", |_ctx| async { Ok(json!("hi")) });

    let response = run(&graph, &registry, "{ greeting: hello }", Json::Null).await;
    assert_eq!(response.data, Some(json!({ "greeting": "hi" })));
}

#[tokio::test]
async fn arguments_reach_resolvers_coerced() {
    let graph = test_graph();
    let registry = ResolverRegistry::new().register("Query", "user", |ctx| async move {
        let id = ctx.require_argument("id")?.clone();
        Ok(json!({ "id": id, "name": "u" }))
    });

    let response = run(&graph, &registry, r#"{ user(id: 42) { id name } }"#, Json::Null).await;
    // Integer IDs arrive as canonical strings.
    assert_eq!(
        response.data,
        Some(json!({ "user": { "id": "42", "name": "u" } }))
    );
}

// =============================================================================
// Null propagation
// =============================================================================

#[tokio::test]
async fn failing_non_null_field_nulls_nearest_nullable_ancestor() {
    let graph = test_graph();
    let registry = ResolverRegistry::new()
        .register("Query", "hello", |_ctx| async { Ok(json!("intact")) })
        .register("Query", "viewer", |_ctx| async { Ok(json!({})) })
        .register("Viewer", "user", |_ctx| async {
            Err(FieldError::new("user backend is down"))
        });

    let response = run(
        &graph,
        &registry,
        "{ hello viewer { user { id } } }",
        Json::Null,
    )
    .await;

    // `viewer` (nullable) absorbs the failure of `user` (non-null);
    // the sibling branch `hello` is unaffected.
    assert_eq!(
        response.data,
        Some(json!({ "hello": "intact", "viewer": null }))
    );
    assert_eq!(response.errors.len(), 1);
    let error = &response.errors[0];
    assert_eq!(error.message, "user backend is down");
    assert_eq!(error.path.to_string(), "viewer");
    assert!(!error.locations.is_empty());
}

#[tokio::test]
async fn failing_nullable_field_nulls_only_itself() {
    let graph = test_graph();
    let registry = ResolverRegistry::new()
        .register("Query", "hello", |_ctx| async { Ok(json!("ok")) })
        .register("Query", "viewer", |_ctx| async {
            Err(FieldError::new("no viewer"))
        });

    let response = run(&graph, &registry, "{ hello viewer { name } }", Json::Null).await;
    assert_eq!(
        response.data,
        Some(json!({ "hello": "ok", "viewer": null }))
    );
    assert_eq!(response.errors[0].path.to_string(), "viewer");
}

#[tokio::test]
async fn null_for_non_null_propagates_like_a_failure() {
    let graph = test_graph();
    let registry = ResolverRegistry::new()
        .register("Query", "viewer", |_ctx| async { Ok(json!({})) })
        .register("Viewer", "user", |_ctx| async { Ok(Json::Null) });

    let response = run(&graph, &registry, "{ viewer { user { id } } }", Json::Null).await;
    assert_eq!(response.data, Some(json!({ "viewer": null })));
    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("non-nullable"));
}

#[tokio::test]
async fn non_null_failure_at_root_nulls_data() {
    let graph = test_graph();
    let registry = ResolverRegistry::new().register("Query", "hello", |_ctx| async {
        Err(FieldError::new("boom"))
    });

    let response = run(&graph, &registry, "{ hello }", Json::Null).await;
    assert_eq!(response.data, Some(Json::Null));
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].message, "boom");
}

#[tokio::test]
async fn list_elements_propagate_independently() {
    let graph = test_graph();
    let registry = ResolverRegistry::new()
        .register("Query", "viewer", |_ctx| async { Ok(json!({})) })
        .register("Viewer", "user", |_ctx| async {
            Ok(json!({
                "id": "1",
                "name": "ada",
                "friends": [
                    { "id": "2", "name": "grace" },
                    { "id": "3" },
                ],
            }))
        });

    // `friends: [User!]` — a failing element nulls the whole list (the
    // nearest nullable slot), not the enclosing user.
    let response = run(
        &graph,
        &registry,
        "{ viewer { user { id friends { name } } } }",
        Json::Null,
    )
    .await;

    assert_eq!(
        response.data,
        Some(json!({ "viewer": { "user": { "id": "1", "friends": null } } }))
    );
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].path.to_string(), "viewer.user.friends");
}

// =============================================================================
// Abstract types
// =============================================================================

#[tokio::test]
async fn interface_narrowing_uses_runtime_typename() {
    let graph = test_graph();
    let registry = ResolverRegistry::new().register("Query", "node", |_ctx| async {
        Ok(json!({ "__typename": "Post", "id": "p1", "title": "hi" }))
    });

    let response = run(
        &graph,
        &registry,
        "{ node { __typename id ... on User { name } ... on Post { title } } }",
        Json::Null,
    )
    .await;

    assert!(response.is_ok(), "unexpected errors: {:?}", response.errors);
    assert_eq!(
        response.data,
        Some(json!({ "node": { "__typename": "Post", "id": "p1", "title": "hi" } }))
    );
}

#[tokio::test]
async fn abstract_value_without_typename_is_an_error() {
    let graph = test_graph();
    let registry = ResolverRegistry::new().register("Query", "node", |_ctx| async {
        Ok(json!({ "id": "p1" }))
    });

    let response = run(&graph, &registry, "{ node { id } }", Json::Null).await;
    assert_eq!(response.data, Some(json!({ "node": null })));
    assert!(response.errors[0].message.contains("__typename"));
}

// =============================================================================
// Mutations
// =============================================================================

#[tokio::test]
async fn mutations_execute_root_fields_in_order() {
    use std::sync::Mutex;

    let graph = test_graph();
    let order: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let log = order.clone();
    let registry = ResolverRegistry::new().register("Mutation", "bump", move |ctx| {
        let log = log.clone();
        async move {
            log.lock().unwrap().push(ctx.path.to_string());
            Ok(json!(1))
        }
    });

    let response = run(
        &graph,
        &registry,
        "mutation { a: bump b: bump }",
        Json::Null,
    )
    .await;
    assert_eq!(response.data, Some(json!({ "a": 1, "b": 1 })));
    assert_eq!(*order.lock().unwrap(), vec!["a".to_string(), "b".to_string()]);
}

// =============================================================================
// Cancellation
// =============================================================================

#[tokio::test]
async fn cancellation_surfaces_errors_but_keeps_the_document_well_formed() {
    let graph = test_graph();
    let registry = ResolverRegistry::new().register("Query", "viewer", |_ctx| async {
        Ok(json!({ "name": "ada" }))
    });

    let cancellation = CancellationToken::new();
    cancellation.cancel();
    let response = run_with(
        &graph,
        &registry,
        "{ viewer { name } }",
        Json::Null,
        cancellation,
    )
    .await;

    // The nullable viewer slot nulls out; a request-level error is
    // appended once.
    assert_eq!(response.data, Some(json!({ "viewer": null })));
    assert!(
        response
            .errors
            .iter()
            .any(|e| e.message == "request was cancelled" && e.path.is_root())
    );
}

#[tokio::test]
async fn results_committed_before_cancellation_are_retained() {
    let graph = test_graph();
    let cancellation = CancellationToken::new();
    let to_cancel = cancellation.clone();
    let registry = ResolverRegistry::new()
        .register("Query", "hello", |_ctx| async { Ok(json!("done")) })
        .register("Query", "viewer", move |_ctx| {
            let to_cancel = to_cancel.clone();
            async move {
                // Cancel mid-request: fields below this one observe
                // the token.
                to_cancel.cancel();
                Ok(json!({ "name": "ada" }))
            }
        });

    let response = run_with(
        &graph,
        &registry,
        "{ hello viewer { name } }",
        Json::Null,
        cancellation,
    )
    .await;

    let data = response.data.unwrap();
    assert_eq!(data.get("hello"), Some(&json!("done")));
    // `viewer.name` was cancelled; the nullable name slot nulled out.
    assert_eq!(data.get("viewer"), Some(&json!({ "name": null })));
    assert!(
        response
            .errors
            .iter()
            .any(|e| e.path.to_string() == "viewer.name")
    );
}
