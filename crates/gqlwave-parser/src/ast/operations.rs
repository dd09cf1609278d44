use crate::SourceSpan;
use crate::ast::Directive;
use crate::ast::Name;
use crate::ast::SelectionSet;
use crate::ast::TypeAnnotation;
use crate::ast::TypeCondition;
use crate::ast::Value;

/// The kind of an operation definition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    /// Returns the operation keyword as it appears in source text.
    pub fn keyword(&self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
            OperationKind::Subscription => "subscription",
        }
    }
}

/// An operation definition (query, mutation, or subscription).
///
/// Shorthand documents (`{ field }`) parse to an unnamed query.
#[derive(Clone, Debug, PartialEq)]
pub struct OperationDefinition {
    pub span: SourceSpan,
    pub kind: OperationKind,
    pub name: Option<Name>,
    pub variable_definitions: Vec<VariableDefinition>,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
}

/// A named fragment definition (`fragment F on T { ... }`).
#[derive(Clone, Debug, PartialEq)]
pub struct FragmentDefinition {
    pub span: SourceSpan,
    pub name: Name,
    pub type_condition: TypeCondition,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
}

/// A variable definition within an operation's variable list,
/// e.g. `$id: ID! = "default"`.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableDefinition {
    pub span: SourceSpan,
    pub name: Name,
    pub var_type: TypeAnnotation,
    pub default_value: Option<Value>,
    pub directives: Vec<Directive>,
}
