//! The operation compiler: AST + type graph + raw variables in, a
//! flattened [`CompiledOperation`] out.
//!
//! Compilation proceeds in a fixed order: operation selection, variable
//! coercion, fragment resolution (with cycle detection), conditional
//! inclusion (`@skip`/`@include`), field collection and merging, and
//! finally selection emission with pre-bound field definitions and
//! coerced argument maps. Any failure is a fatal [`CompileError`]; the
//! request never reaches the execution engine.

mod collect;
mod compiled;
mod error;
mod inputs;

pub use compiled::CompiledField;
pub use compiled::CompiledOperation;
pub use error::CompileError;
pub use error::CompileErrorKind;

use crate::JsonMap;
use crate::schema::TypeGraph;
use collect::Collector;
use gqlwave_parser::ast;
use gqlwave_parser::ast::OperationKind;
use inputs::coerce_variables;

/// Compiles one operation of a parsed document into an executable
/// plan.
///
/// `operation_name` selects the operation when the document defines
/// more than one; `variables` is the raw (JSON) variable map from the
/// request.
pub fn compile(
    document: &ast::Document,
    graph: &TypeGraph,
    operation_name: Option<&str>,
    variables: &JsonMap,
) -> Result<CompiledOperation, CompileError> {
    let operation = select_operation(document, operation_name)?;

    if operation.kind == OperationKind::Subscription {
        return Err(CompileError::at(
            "subscription operations are not supported",
            operation.span,
            CompileErrorKind::UnsupportedOperation,
        ));
    }

    let root_type = match operation.kind {
        OperationKind::Query => graph.query_type().to_string(),
        OperationKind::Mutation => match graph.mutation_type() {
            Some(name) => name.to_string(),
            None => {
                return Err(CompileError::at(
                    "the schema does not define a mutation type",
                    operation.span,
                    CompileErrorKind::UnsupportedOperation,
                ));
            }
        },
        OperationKind::Subscription => unreachable!("rejected above"),
    };
    if !graph.is_composite(&root_type) {
        return Err(CompileError::new(
            format!("root type `{root_type}` is missing from the type graph"),
            CompileErrorKind::UnknownType {
                name: root_type.clone(),
            },
        ));
    }

    let coerced_variables = coerce_variables(graph, operation, variables)?;

    let mut collector = Collector::new(graph, document, &coerced_variables);
    let root = collector.collect_set(&root_type, &operation.selection_set)?;
    let field_count = collector.field_count();

    tracing::debug!(
        operation = operation.name.as_ref().map(|n| n.value.as_str()),
        kind = operation.kind.keyword(),
        field_count,
        "compiled operation"
    );

    Ok(CompiledOperation {
        kind: operation.kind,
        operation_name: operation.name.as_ref().map(|name| name.value.clone()),
        root_type,
        variables: coerced_variables,
        root,
        field_count,
    })
}

/// Selects the operation to execute, enforcing the anonymous-operation
/// rule: an unnamed operation is only legal as the sole operation of
/// the document.
fn select_operation<'a>(
    document: &'a ast::Document,
    operation_name: Option<&str>,
) -> Result<&'a ast::OperationDefinition, CompileError> {
    let operations: Vec<&ast::OperationDefinition> = document.operations().collect();

    if operations.is_empty() {
        return Err(CompileError::new(
            "the document defines no operations",
            CompileErrorKind::NoOperations,
        ));
    }

    if operations.len() > 1
        && let Some(anonymous) = operations.iter().find(|op| op.name.is_none())
    {
        return Err(CompileError::at(
            "an anonymous operation must be the only operation in the document",
            anonymous.span,
            CompileErrorKind::OperationNameRequired,
        ));
    }

    match operation_name {
        Some(name) => operations
            .iter()
            .find(|op| {
                op.name
                    .as_ref()
                    .is_some_and(|op_name| op_name.value == name)
            })
            .copied()
            .ok_or_else(|| {
                CompileError::new(
                    format!("unknown operation `{name}`"),
                    CompileErrorKind::UnknownOperation {
                        name: name.to_string(),
                    },
                )
            }),
        None => {
            if operations.len() == 1 {
                Ok(operations[0])
            } else {
                Err(CompileError::new(
                    format!(
                        "the document defines {} operations; an operation name is required",
                        operations.len()
                    ),
                    CompileErrorKind::OperationNameRequired,
                ))
            }
        }
    }
}
