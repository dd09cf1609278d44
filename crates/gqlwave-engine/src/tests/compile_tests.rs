//! Tests for the operation compiler: operation selection, variable
//! coercion, fragment resolution, conditional inclusion, and field
//! merging.

use crate::JsonMap;
use crate::compile::CompileErrorKind;
use crate::compile::compile;
use crate::tests::fixtures::compile_simple;
use crate::tests::fixtures::compile_with_variables;
use crate::tests::fixtures::parse;
use crate::tests::fixtures::test_graph;
use serde_json::json;

// =============================================================================
// Operation selection
// =============================================================================

#[test]
fn selects_the_single_operation() {
    let operation = compile_simple("{ hello }").unwrap();
    assert_eq!(operation.root_type, "Query");
    assert_eq!(operation.root.len(), 1);
    assert_eq!(operation.root[0].response_key, "hello");
}

#[test]
fn requires_a_name_with_multiple_operations() {
    let document = parse("query A { hello } query B { hello }");
    let error = compile(&document, &test_graph(), None, &JsonMap::new()).unwrap_err();
    assert_eq!(*error.kind(), CompileErrorKind::OperationNameRequired);

    let operation = compile(&document, &test_graph(), Some("B"), &JsonMap::new()).unwrap();
    assert_eq!(operation.operation_name.as_deref(), Some("B"));
}

#[test]
fn unknown_operation_name_is_an_error() {
    let document = parse("query A { hello }");
    let error = compile(&document, &test_graph(), Some("Missing"), &JsonMap::new()).unwrap_err();
    assert!(matches!(
        error.kind(),
        CompileErrorKind::UnknownOperation { name } if name == "Missing"
    ));
}

#[test]
fn anonymous_operation_must_be_alone() {
    let document = parse("{ hello } query B { hello }");
    let error = compile(&document, &test_graph(), Some("B"), &JsonMap::new()).unwrap_err();
    assert_eq!(*error.kind(), CompileErrorKind::OperationNameRequired);
}

#[test]
fn fragment_only_documents_have_no_operations() {
    let document = parse("fragment F on User { id }");
    let error = compile(&document, &test_graph(), None, &JsonMap::new()).unwrap_err();
    assert_eq!(*error.kind(), CompileErrorKind::NoOperations);
}

#[test]
fn subscriptions_are_rejected() {
    let error = compile_simple("subscription S { hello }").unwrap_err();
    assert_eq!(*error.kind(), CompileErrorKind::UnsupportedOperation);
}

// =============================================================================
// Variable coercion
// =============================================================================

#[test]
fn coerces_variables_and_applies_defaults() {
    let operation = compile_with_variables(
        "query Q($id: ID!, $limit: Int = 5) { user(id: $id) { id } }",
        json!({ "id": 7 }),
    )
    .unwrap();
    // Integer IDs normalize to strings; the default fills the absent
    // variable.
    assert_eq!(operation.variables.get("id"), Some(&json!("7")));
    assert_eq!(operation.variables.get("limit"), Some(&json!(5)));
}

#[test]
fn missing_required_variable_is_an_error() {
    let error = compile_with_variables(
        "query Q($id: ID!) { user(id: $id) { id } }",
        json!({}),
    )
    .unwrap_err();
    assert!(matches!(
        error.kind(),
        CompileErrorKind::VariableCoercion { variable } if variable == "id"
    ));
}

#[test]
fn wrong_variable_type_is_an_error() {
    let error = compile_with_variables(
        "query Q($limit: Int) { users(filter: { limit: $limit }) { id } }",
        json!({ "limit": "lots" }),
    )
    .unwrap_err();
    assert!(matches!(
        error.kind(),
        CompileErrorKind::VariableCoercion { .. }
    ));
}

#[test]
fn input_objects_check_fields_and_apply_defaults() {
    let operation = compile_with_variables(
        "query Q($f: UserFilter) { users(filter: $f) { id } }",
        json!({ "f": { "nameContains": "an" } }),
    )
    .unwrap();
    assert_eq!(
        operation.variables.get("f"),
        Some(&json!({ "nameContains": "an", "limit": 10 }))
    );

    let error = compile_with_variables(
        "query Q($f: UserFilter) { users(filter: $f) { id } }",
        json!({ "f": { "unknownField": 1 } }),
    )
    .unwrap_err();
    assert!(matches!(
        error.kind(),
        CompileErrorKind::VariableCoercion { .. }
    ));
}

#[test]
fn input_object_literals_apply_field_defaults() {
    let operation = compile_simple("{ users(filter: { nameContains: \"x\" }) { id } }").unwrap();
    let users = &operation.root[0];
    assert_eq!(
        users.arguments.get("filter"),
        Some(&json!({ "nameContains": "x", "limit": 10 }))
    );
}

// =============================================================================
// Argument coercion
// =============================================================================

#[test]
fn unknown_arguments_are_rejected() {
    let error = compile_simple("{ hello(loud: true) }").unwrap_err();
    assert!(matches!(
        error.kind(),
        CompileErrorKind::InvalidArguments { .. }
    ));
}

#[test]
fn missing_required_arguments_are_rejected() {
    let error = compile_simple("{ user { id } }").unwrap_err();
    assert!(matches!(
        error.kind(),
        CompileErrorKind::InvalidArguments { field } if field == "user"
    ));
}

#[test]
fn unknown_fields_are_rejected() {
    let error = compile_simple("{ nonexistent }").unwrap_err();
    assert!(matches!(
        error.kind(),
        CompileErrorKind::UnknownField { type_name, field }
            if type_name == "Query" && field == "nonexistent"
    ));
}

// =============================================================================
// Fragments
// =============================================================================

#[test]
fn inlines_fragment_spreads() {
    let operation = compile_simple(
        "{ viewer { user { ...userFields } } }
         fragment userFields on User { id name }",
    )
    .unwrap();
    let user = &operation.root[0].children[0];
    let keys: Vec<_> = user.children.iter().map(|f| f.response_key.as_str()).collect();
    assert_eq!(keys, vec!["id", "name"]);
}

#[test]
fn fragment_cycles_fail_without_looping() {
    let error = compile_simple(
        "{ viewer { user { ...a } } }
         fragment a on User { ...b }
         fragment b on User { ...a }",
    )
    .unwrap_err();
    assert!(matches!(
        error.kind(),
        CompileErrorKind::FragmentCycle { .. }
    ));
}

#[test]
fn directly_self_referencing_fragment_is_a_cycle() {
    let error = compile_simple(
        "{ viewer { user { ...a } } }
         fragment a on User { id ...a }",
    )
    .unwrap_err();
    assert!(matches!(
        error.kind(),
        CompileErrorKind::FragmentCycle { fragment } if fragment == "a"
    ));
}

#[test]
fn unknown_fragments_are_rejected() {
    let error = compile_simple("{ viewer { ...missing } }").unwrap_err();
    assert!(matches!(
        error.kind(),
        CompileErrorKind::UnknownFragment { fragment } if fragment == "missing"
    ));
}

#[test]
fn type_conditions_narrow_to_possible_types() {
    let operation = compile_simple(
        "{ node { id ... on User { name } ... on Post { title } } }",
    )
    .unwrap();
    let node = &operation.root[0];

    let id = node.children.iter().find(|f| f.response_key == "id").unwrap();
    assert!(id.applies_to.is_none());

    let name = node.children.iter().find(|f| f.response_key == "name").unwrap();
    assert!(name.applies_to_type("User"));
    assert!(!name.applies_to_type("Post"));

    let title = node.children.iter().find(|f| f.response_key == "title").unwrap();
    assert!(title.applies_to_type("Post"));
    assert!(!title.applies_to_type("User"));
}

#[test]
fn condition_covering_every_runtime_type_is_unconditional() {
    // `... on Node` inside a User-typed selection set restricts
    // nothing.
    let operation = compile_simple(
        "{ viewer { user { ... on Node { id } } } }",
    )
    .unwrap();
    let user = &operation.root[0].children[0];
    assert!(user.children[0].applies_to.is_none());
}

// =============================================================================
// Conditional inclusion
// =============================================================================

#[test]
fn skip_true_removes_the_selection_entirely() {
    let operation = compile_simple("{ hello @skip(if: true) viewer { name } }").unwrap();
    let keys: Vec<_> = operation.root.iter().map(|f| f.response_key.as_str()).collect();
    assert_eq!(keys, vec!["viewer"]);
}

#[test]
fn include_false_removes_the_selection_entirely() {
    let operation = compile_with_variables(
        "query Q($show: Boolean!) { hello @include(if: $show) viewer { name } }",
        json!({ "show": false }),
    )
    .unwrap();
    let keys: Vec<_> = operation.root.iter().map(|f| f.response_key.as_str()).collect();
    assert_eq!(keys, vec!["viewer"]);
}

#[test]
fn skip_applies_to_fragment_spreads() {
    let operation = compile_simple(
        "{ viewer { name ...extra @skip(if: true) } }
         fragment extra on Viewer { user { id } }",
    )
    .unwrap();
    let viewer = &operation.root[0];
    let keys: Vec<_> = viewer.children.iter().map(|f| f.response_key.as_str()).collect();
    assert_eq!(keys, vec!["name"]);
}

#[test]
fn skip_directive_requires_a_boolean_if() {
    let error = compile_simple("{ hello @skip(if: 3) }").unwrap_err();
    assert!(matches!(
        error.kind(),
        CompileErrorKind::InvalidDirective { directive } if directive == "skip"
    ));
}

// =============================================================================
// Field merging
// =============================================================================

#[test]
fn identical_selections_merge_into_one() {
    let operation = compile_simple("{ a: hello a: hello }").unwrap();
    assert_eq!(operation.root.len(), 1);
    let merged = &operation.root[0];
    assert_eq!(merged.response_key, "a");
    // Both originating AST nodes are retained for diagnostics.
    assert_eq!(merged.locations.len(), 2);
}

#[test]
fn merged_fields_union_their_child_selections() {
    let operation = compile_simple(
        "{ viewer { user { id } } viewer { user { name } name } }",
    )
    .unwrap();
    assert_eq!(operation.root.len(), 1);
    let viewer = &operation.root[0];
    let keys: Vec<_> = viewer.children.iter().map(|f| f.response_key.as_str()).collect();
    assert_eq!(keys, vec!["user", "name"]);
    let user = &viewer.children[0];
    let user_keys: Vec<_> = user.children.iter().map(|f| f.response_key.as_str()).collect();
    assert_eq!(user_keys, vec!["id", "name"]);
}

#[test]
fn same_key_different_field_names_conflict() {
    let error = compile_simple("{ a: hello a: viewer { name } }").unwrap_err();
    assert!(matches!(
        error.kind(),
        CompileErrorKind::FieldMergeConflict { response_key } if response_key == "a"
    ));
}

#[test]
fn same_key_different_arguments_conflict() {
    let error = compile_simple(
        r#"{ u: user(id: "1") { id } u: user(id: "2") { id } }"#,
    )
    .unwrap_err();
    assert!(matches!(
        error.kind(),
        CompileErrorKind::FieldMergeConflict { .. }
    ));
}

#[test]
fn disjoint_type_conditions_may_share_a_response_key() {
    let operation = compile_simple(
        "{ node { ... on User { label: name } ... on Post { label: title } } }",
    )
    .unwrap();
    let node = &operation.root[0];
    let labels: Vec<_> = node
        .children
        .iter()
        .filter(|f| f.response_key == "label")
        .collect();
    assert_eq!(labels.len(), 2);
}

// =============================================================================
// Emission
// =============================================================================

#[test]
fn compilation_is_idempotent() {
    let source = "query Q($id: ID!) { user(id: $id) { id name friends { name } } }";
    let document = parse(source);
    let graph = test_graph();
    let variables = json!({ "id": "7" });
    let variables = variables.as_object().unwrap();

    let first = compile(&document, &graph, None, variables).unwrap();
    let second = compile(&document, &graph, None, variables).unwrap();
    assert_eq!(first, second);
}

#[test]
fn fields_get_stable_preorder_indexes() {
    let operation = compile_simple("{ hello viewer { name user { id } } }").unwrap();
    let indexes: Vec<_> = operation.fields().map(|f| f.index).collect();
    assert_eq!(indexes, (0..operation.field_count).collect::<Vec<_>>());

    let keys: Vec<_> = operation.fields().map(|f| f.response_key.as_str()).collect();
    assert_eq!(keys, vec!["hello", "viewer", "name", "user", "id"]);
}

#[test]
fn typename_compiles_on_any_composite() {
    let operation = compile_simple("{ viewer { __typename } }").unwrap();
    let typename = &operation.root[0].children[0];
    assert!(typename.is_typename());
    assert!(typename.children.is_empty());
}

#[test]
fn composite_fields_require_subselections() {
    let error = compile_simple("{ viewer }").unwrap_err();
    assert_eq!(*error.kind(), CompileErrorKind::InvalidSelection);
}

#[test]
fn leaf_fields_reject_subselections() {
    let error = compile_simple("{ hello { length } }").unwrap_err();
    assert_eq!(*error.kind(), CompileErrorKind::InvalidSelection);
}
