//! Owned AST types for parsed executable GraphQL documents.
//!
//! All nodes are plain owned values (no borrowed source text), so a
//! [`Document`] can be cached and shared read-only across threads behind
//! an `Arc`. Every node carries a [`SourceSpan`](crate::SourceSpan) for
//! diagnostics; two documents that differ only in spans compare unequal
//! with `==` but identically under
//! [`print_document`](crate::print_document).
//!
//! Node-kind polymorphism ([`Definition`], [`Selection`], [`Value`]) is
//! expressed as closed sum types so consumers can match exhaustively.

mod document;
mod operations;
mod selections;
mod type_annotation;
mod values;

pub use document::Definition;
pub use document::Document;
pub use operations::FragmentDefinition;
pub use operations::OperationDefinition;
pub use operations::OperationKind;
pub use operations::VariableDefinition;
pub use selections::Field;
pub use selections::FragmentSpread;
pub use selections::InlineFragment;
pub use selections::Selection;
pub use selections::SelectionSet;
pub use selections::TypeCondition;
pub use type_annotation::TypeAnnotation;
pub use values::Argument;
pub use values::BooleanValue;
pub use values::Directive;
pub use values::EnumValue;
pub use values::FloatValue;
pub use values::IntValue;
pub use values::ListValue;
pub use values::Name;
pub use values::NullValue;
pub use values::ObjectField;
pub use values::ObjectValue;
pub use values::StringValue;
pub use values::Value;
pub use values::VariableValue;
