//! The read-only type graph consumed by the operation compiler and the
//! execution engine.
//!
//! Building and validating a type graph is an external collaborator's
//! job (a schema builder, an SDL parser); this module only models the
//! finished product. A [`TypeGraph`] is immutable once constructed and
//! safely shared across concurrent requests behind an `Arc`.

mod type_graph;
mod type_ref;

pub use type_graph::EnumType;
pub use type_graph::FieldDefinition;
pub use type_graph::InputObjectType;
pub use type_graph::InputValueDefinition;
pub use type_graph::InterfaceType;
pub use type_graph::ObjectType;
pub use type_graph::ScalarType;
pub use type_graph::TypeDefinition;
pub use type_graph::TypeGraph;
pub use type_graph::UnionType;
pub use type_ref::TypeRef;
