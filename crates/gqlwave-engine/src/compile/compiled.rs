use crate::Json;
use crate::schema::TypeRef;
use gqlwave_parser::SourceSpan;
use gqlwave_parser::ast::OperationKind;
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// A compiled, executable operation: the flattened selection tree plus
/// the coerced variable values it was compiled against.
///
/// Immutable once produced. A variable-free compiled operation can be
/// shared across concurrent executions; one compiled against variables
/// is built per request. Compiling the same (document, operation name,
/// variables) tuple twice yields structurally identical output.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledOperation {
    /// The operation kind. Mutations execute their root fields
    /// serially; queries execute concurrently.
    pub kind: OperationKind,

    /// The operation name, when the definition had one.
    pub operation_name: Option<String>,

    /// The root composite type the operation executes against.
    pub root_type: String,

    /// Coerced variable values, defaults applied.
    pub variables: IndexMap<String, Json>,

    /// The root selection set.
    pub root: Vec<CompiledField>,

    /// Total number of compiled fields in the tree; every field's
    /// `index` is below this bound.
    pub field_count: usize,
}

impl CompiledOperation {
    /// Iterates over every compiled field in the tree, depth-first in
    /// index order. Useful for diagnostics and cost analysis without
    /// re-walking the AST.
    pub fn fields(&self) -> impl Iterator<Item = &CompiledField> {
        let mut stack: Vec<&CompiledField> = self.root.iter().rev().collect();
        std::iter::from_fn(move || {
            let field = stack.pop()?;
            stack.extend(field.children.iter().rev());
            Some(field)
        })
    }
}

/// One resolved, merged field in a compiled operation.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledField {
    /// Preorder ordinal of this field in the compiled tree; a stable
    /// slot key for per-request result storage.
    pub index: usize,

    /// The key this field resolves under in the response document.
    pub response_key: String,

    /// The field name as defined in the type graph (`__typename` for
    /// the meta field).
    pub field_name: String,

    /// The composite type the field definition was found on. Used as
    /// the fallback resolver lookup key when the runtime type has no
    /// registration of its own.
    pub parent_type: String,

    /// The field's declared return type.
    pub field_type: TypeRef,

    /// Coerced argument values, defaults applied, in definition order.
    pub arguments: IndexMap<String, Json>,

    /// The runtime object type names this selection applies to, from
    /// the type conditions it was collected under. `None` means it
    /// applies unconditionally.
    pub applies_to: Option<BTreeSet<String>>,

    /// Source spans of every AST field node merged into this
    /// selection, in document order.
    pub locations: Vec<SourceSpan>,

    /// Child selections for composite fields; empty for leaves.
    pub children: Vec<CompiledField>,
}

impl CompiledField {
    /// Returns `true` if this selection applies to the given runtime
    /// object type.
    pub fn applies_to_type(&self, type_name: &str) -> bool {
        match &self.applies_to {
            None => true,
            Some(types) => types.contains(type_name),
        }
    }

    /// Returns `true` if this is the `__typename` meta field.
    pub fn is_typename(&self) -> bool {
        self.field_name == "__typename"
    }
}
