//! Tests for the recursive descent parser: grammar coverage, spans,
//! error reporting, and recovery.

use crate::ParseErrorKind;
use crate::ast;
use crate::tests::utils::field_at;
use crate::tests::utils::first_field;
use crate::tests::utils::first_operation;
use crate::tests::utils::parse;
use crate::tests::utils::parse_valid;

// =============================================================================
// Operations
// =============================================================================

#[test]
fn parses_shorthand_query() {
    let doc = parse_valid("{ name }");
    let op = first_operation(&doc);
    assert_eq!(op.kind, ast::OperationKind::Query);
    assert!(op.name.is_none());
    assert_eq!(op.selection_set.selections.len(), 1);
}

#[test]
fn parses_named_operation_with_variables_and_directives() {
    let doc = parse_valid("query GetUser($id: ID!, $full: Boolean = false) @traced { user }");
    let op = first_operation(&doc);
    assert_eq!(op.kind, ast::OperationKind::Query);
    assert_eq!(op.name.as_ref().unwrap().value, "GetUser");
    assert_eq!(op.variable_definitions.len(), 2);
    assert_eq!(op.directives.len(), 1);
    assert_eq!(op.directives[0].name.value, "traced");

    let id_var = &op.variable_definitions[0];
    assert_eq!(id_var.name.value, "id");
    assert!(matches!(
        &id_var.var_type,
        ast::TypeAnnotation::NonNull { inner, .. }
            if matches!(&**inner, ast::TypeAnnotation::Named { name, .. } if name.value == "ID")
    ));

    let full_var = &op.variable_definitions[1];
    assert!(matches!(
        full_var.default_value,
        Some(ast::Value::Boolean(ast::BooleanValue { value: false, .. }))
    ));
}

#[test]
fn parses_mutation_and_subscription_keywords() {
    let doc = parse_valid("mutation M { save }\n\nsubscription S { events }");
    let kinds: Vec<_> = doc.operations().map(|op| op.kind).collect();
    assert_eq!(
        kinds,
        vec![ast::OperationKind::Mutation, ast::OperationKind::Subscription]
    );
}

#[test]
fn parses_list_type_annotations() {
    let doc = parse_valid("query Q($ids: [ID!]!) { f }");
    let op = first_operation(&doc);
    let annotation = &op.variable_definitions[0].var_type;
    // [ID!]! == NonNull(List(NonNull(Named(ID))))
    let ast::TypeAnnotation::NonNull { inner, .. } = annotation else {
        panic!("expected outer non-null");
    };
    let ast::TypeAnnotation::List { inner, .. } = &**inner else {
        panic!("expected list");
    };
    let ast::TypeAnnotation::NonNull { inner, .. } = &**inner else {
        panic!("expected inner non-null");
    };
    assert!(matches!(&**inner, ast::TypeAnnotation::Named { name, .. } if name.value == "ID"));
}

// =============================================================================
// Selections
// =============================================================================

#[test]
fn parses_aliases_arguments_and_nested_selections() {
    let doc = parse_valid("{ hero: user(id: 7, active: true) { name friends { name } } }");
    let op = first_operation(&doc);
    let field = first_field(&op.selection_set);
    assert_eq!(field.alias.as_ref().unwrap().value, "hero");
    assert_eq!(field.name.value, "user");
    assert_eq!(field.response_key(), "hero");
    assert_eq!(field.arguments.len(), 2);
    assert!(matches!(
        field.arguments[0].value,
        ast::Value::Int(ast::IntValue { value: 7, .. })
    ));

    let children = field.selection_set.as_ref().unwrap();
    assert_eq!(children.selections.len(), 2);
    assert_eq!(field_at(children, 0).name.value, "name");
}

#[test]
fn parses_fragment_spreads_and_inline_fragments() {
    let doc = parse_valid(
        "{ ...userFields ... on Droid { primaryFunction } ... @include(if: $x) { id } }",
    );
    let op = first_operation(&doc);
    let selections = &op.selection_set.selections;
    assert_eq!(selections.len(), 3);

    assert!(matches!(
        &selections[0],
        ast::Selection::FragmentSpread(spread) if spread.name.value == "userFields"
    ));
    assert!(matches!(
        &selections[1],
        ast::Selection::InlineFragment(inline)
            if inline.type_condition.as_ref().unwrap().on.value == "Droid"
    ));
    match &selections[2] {
        ast::Selection::InlineFragment(inline) => {
            assert!(inline.type_condition.is_none());
            assert_eq!(inline.directives.len(), 1);
        }
        other => panic!("expected inline fragment, got {other:?}"),
    }
}

#[test]
fn parses_fragment_definitions() {
    let doc = parse_valid("fragment userFields on User { id name }");
    let frag = doc.fragments().next().unwrap();
    assert_eq!(frag.name.value, "userFields");
    assert_eq!(frag.type_condition.on.value, "User");
    assert_eq!(frag.selection_set.selections.len(), 2);
    assert!(doc.fragment("userFields").is_some());
    assert!(doc.fragment("other").is_none());
}

// =============================================================================
// Values
// =============================================================================

#[test]
fn parses_all_value_kinds() {
    let doc = parse_valid(
        r#"{ f(a: 1, b: 1.5, c: "s", d: true, e: null, g: RED, h: [1, 2], i: { x: 1, y: $v }, j: $v) }"#,
    );
    let field = first_field(&first_operation(&doc).selection_set);
    let values: Vec<&ast::Value> = field.arguments.iter().map(|arg| &arg.value).collect();
    assert!(matches!(values[0], ast::Value::Int(_)));
    assert!(matches!(values[1], ast::Value::Float(_)));
    assert!(matches!(values[2], ast::Value::String(_)));
    assert!(matches!(values[3], ast::Value::Boolean(_)));
    assert!(matches!(values[4], ast::Value::Null(_)));
    assert!(matches!(values[5], ast::Value::Enum(_)));
    assert!(matches!(values[6], ast::Value::List(_)));
    assert!(matches!(values[7], ast::Value::Object(_)));
    assert!(matches!(values[8], ast::Value::Variable(_)));

    assert!(values[7].references_variables());
    assert!(!values[6].references_variables());
}

#[test]
fn rejects_variables_in_variable_default_values() {
    let result = parse("query Q($a: Int = $b) { f }");
    assert!(result.has_errors());
}

#[test]
fn rejects_integer_overflow() {
    let result = parse("{ f(a: 99999999999999999999999999) }");
    assert!(result.has_errors());
    assert!(matches!(
        result.errors[0].kind(),
        ParseErrorKind::InvalidLiteral
    ));
}

// =============================================================================
// Errors and recovery
// =============================================================================

#[test]
fn empty_selection_set_is_an_error() {
    let result = parse("{ }");
    assert!(result.has_errors());
    assert!(matches!(
        result.errors[0].kind(),
        ParseErrorKind::InvalidEmptyConstruct { .. }
    ));
}

#[test]
fn unclosed_selection_set_reports_opening_location() {
    let result = parse("{ user { name ");
    assert!(result.has_errors());
    let error = result
        .errors
        .iter()
        .find(|e| matches!(e.kind(), ParseErrorKind::UnclosedDelimiter { .. }))
        .expect("expected an unclosed delimiter error");
    assert!(!error.notes().is_empty());
}

#[test]
fn reports_expected_vs_found_with_position() {
    let result = parse("{ user(id 7) }");
    assert!(result.has_errors());
    let error = &result.errors[0];
    assert!(matches!(
        error.kind(),
        ParseErrorKind::UnexpectedToken { expected, .. } if expected.contains(&":".to_string())
    ));
    assert_eq!(error.span().start_inclusive.line(), 0);
    assert_eq!(error.span().start_inclusive.column(), 10);
}

#[test]
fn fragment_named_on_is_reserved() {
    let result = parse("fragment on on User { id }");
    assert!(result.has_errors());
    assert!(matches!(
        result.errors[0].kind(),
        ParseErrorKind::ReservedName { .. }
    ));
}

#[test]
fn type_system_definitions_are_rejected() {
    let result = parse("type User { name: String }");
    assert!(result.has_errors());
    assert!(matches!(
        result.errors[0].kind(),
        ParseErrorKind::NotExecutable
    ));
}

#[test]
fn empty_document_is_an_error() {
    let result = parse("   ");
    assert!(result.has_errors());
}

#[test]
fn recovers_and_reports_multiple_definitions() {
    // The first operation is broken; the second parses fine and both
    // errors-and-AST are surfaced.
    let result = parse("query Bad( { f }\n\nquery Good { g }");
    assert!(result.has_errors());
    let doc = result.ast().expect("recovered AST expected");
    assert!(doc.operations().any(|op| {
        op.name.as_ref().map(|n| n.value.as_str()) == Some("Good")
    }));
}

#[test]
fn deeply_nested_values_hit_the_recursion_guard() {
    let mut source = String::from("{ f(a: ");
    source.push_str(&"[".repeat(200));
    let result = parse(&source);
    assert!(result.has_errors());
}

#[test]
fn lexer_errors_surface_as_parse_errors() {
    let result = parse("{ f(a: \"unterminated) }");
    assert!(result.has_errors());
    assert!(result
        .errors
        .iter()
        .any(|e| matches!(e.kind(), ParseErrorKind::LexicalError)));
}

// =============================================================================
// Spans
// =============================================================================

#[test]
fn nodes_carry_source_spans() {
    let doc = parse_valid("{\n  name\n}");
    let field = first_field(&first_operation(&doc).selection_set);
    assert_eq!(field.span.start_inclusive.line(), 1);
    assert_eq!(field.span.start_inclusive.column(), 2);
}
