use crate::SourceSpan;
use crate::ast::Argument;
use crate::ast::Directive;
use crate::ast::Name;

/// A selection set: the non-empty list of selections within braces.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionSet {
    pub span: SourceSpan,
    pub selections: Vec<Selection>,
}

/// A single selection within a selection set.
#[allow(clippy::large_enum_variant)]
#[derive(Clone, Debug, PartialEq)]
pub enum Selection {
    Field(Field),
    FragmentSpread(FragmentSpread),
    InlineFragment(InlineFragment),
}

/// A field selection, optionally aliased, with arguments, directives,
/// and a nested selection set.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub span: SourceSpan,
    pub alias: Option<Name>,
    pub name: Name,
    pub arguments: Vec<Argument>,
    pub directives: Vec<Directive>,
    pub selection_set: Option<SelectionSet>,
}

impl Field {
    /// The key this field resolves under in the response: the alias if
    /// present, the field name otherwise.
    pub fn response_key(&self) -> &str {
        self.alias
            .as_ref()
            .map(|alias| alias.value.as_str())
            .unwrap_or(self.name.value.as_str())
    }
}

/// A named fragment spread (`...FragmentName`).
#[derive(Clone, Debug, PartialEq)]
pub struct FragmentSpread {
    pub span: SourceSpan,
    pub name: Name,
    pub directives: Vec<Directive>,
}

/// An inline fragment (`... on Type { ... }` or `... { ... }`).
#[derive(Clone, Debug, PartialEq)]
pub struct InlineFragment {
    pub span: SourceSpan,
    pub type_condition: Option<TypeCondition>,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
}

/// A type condition (`on TypeName`).
#[derive(Clone, Debug, PartialEq)]
pub struct TypeCondition {
    pub span: SourceSpan,
    pub on: Name,
}
