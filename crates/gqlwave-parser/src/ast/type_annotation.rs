use crate::SourceSpan;
use crate::ast::Name;

/// A type annotation as written in a variable definition,
/// e.g. `[User!]!`.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeAnnotation {
    /// A named type, e.g. `User`.
    Named { span: SourceSpan, name: Name },
    /// A list type, e.g. `[User]`.
    List {
        span: SourceSpan,
        inner: Box<TypeAnnotation>,
    },
    /// A non-null type, e.g. `User!`. Wraps a named or list annotation.
    NonNull {
        span: SourceSpan,
        inner: Box<TypeAnnotation>,
    },
}

impl TypeAnnotation {
    /// Returns this annotation's source span.
    pub fn span(&self) -> &SourceSpan {
        match self {
            TypeAnnotation::Named { span, .. } => span,
            TypeAnnotation::List { span, .. } => span,
            TypeAnnotation::NonNull { span, .. } => span,
        }
    }

    /// Returns the innermost named type.
    pub fn named_type(&self) -> &Name {
        match self {
            TypeAnnotation::Named { name, .. } => name,
            TypeAnnotation::List { inner, .. } => inner.named_type(),
            TypeAnnotation::NonNull { inner, .. } => inner.named_type(),
        }
    }
}
