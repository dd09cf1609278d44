use crate::SourceSpan;
use crate::ast::FragmentDefinition;
use crate::ast::OperationDefinition;

/// Root AST node for an executable GraphQL document.
///
/// A document is a non-empty list of operation and fragment definitions.
/// Only the executable subset of the language is represented here;
/// type-system definitions are rejected at parse time.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub span: SourceSpan,
    pub definitions: Vec<Definition>,
}

impl Document {
    /// Iterates over the operation definitions in this document.
    pub fn operations(&self) -> impl Iterator<Item = &OperationDefinition> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::Operation(op) => Some(op),
            Definition::Fragment(_) => None,
        })
    }

    /// Iterates over the fragment definitions in this document.
    pub fn fragments(&self) -> impl Iterator<Item = &FragmentDefinition> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::Fragment(frag) => Some(frag),
            Definition::Operation(_) => None,
        })
    }

    /// Looks up a fragment definition by name.
    pub fn fragment(&self, name: &str) -> Option<&FragmentDefinition> {
        self.fragments().find(|frag| frag.name.value == name)
    }
}

/// A single definition within a document.
#[allow(clippy::large_enum_variant)]
#[derive(Clone, Debug, PartialEq)]
pub enum Definition {
    Operation(OperationDefinition),
    Fragment(FragmentDefinition),
}
