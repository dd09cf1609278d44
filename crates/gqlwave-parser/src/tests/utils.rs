//! Shared helpers for parser crate tests.

use crate::ParseResult;
use crate::Parser;
use crate::ast;

/// Parses source text as an executable document.
pub fn parse(source: &str) -> ParseResult<ast::Document> {
    Parser::new(source).parse()
}

/// Parses source text, asserting the parse is fully successful.
pub fn parse_valid(source: &str) -> ast::Document {
    let result = parse(source);
    assert!(
        !result.has_errors(),
        "expected a clean parse of {source:?}, got errors: {:?}",
        result.errors
    );
    result.into_valid_ast().expect("no AST produced")
}

/// Returns the first operation definition of a document.
pub fn first_operation(document: &ast::Document) -> &ast::OperationDefinition {
    document.operations().next().expect("no operations in document")
}

/// Returns the first selection of a selection set as a field.
pub fn first_field(selection_set: &ast::SelectionSet) -> &ast::Field {
    match selection_set.selections.first().expect("empty selection set") {
        ast::Selection::Field(field) => field,
        other => panic!("expected a field selection, got {other:?}"),
    }
}

/// Returns the selection at `index` of a selection set as a field.
pub fn field_at(selection_set: &ast::SelectionSet, index: usize) -> &ast::Field {
    match &selection_set.selections[index] {
        ast::Selection::Field(field) => field,
        other => panic!("expected a field selection, got {other:?}"),
    }
}
