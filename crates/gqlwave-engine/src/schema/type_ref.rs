use std::fmt;

/// A reference to a type in the graph, with list/non-null wrapping.
///
/// `[User!]!` is represented as
/// `NonNull(List(NonNull(Named("User"))))`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeRef {
    /// A named type.
    Named(String),
    /// A list wrapping.
    List(Box<TypeRef>),
    /// A non-null wrapping of a named or list type.
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// Creates a named type reference.
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    /// Wraps a type reference in a list.
    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    /// Wraps a type reference in a non-null.
    pub fn non_null(inner: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(inner))
    }

    /// Shorthand for a non-null named type.
    pub fn named_non_null(name: impl Into<String>) -> Self {
        TypeRef::non_null(TypeRef::named(name))
    }

    /// Returns `true` if the outermost wrapping is non-null.
    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    /// Strips one level of non-null wrapping, if present.
    pub fn nullable(&self) -> &TypeRef {
        match self {
            TypeRef::NonNull(inner) => inner,
            other => other,
        }
    }

    /// Returns the innermost named type.
    pub fn named_type(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) => inner.named_type(),
            TypeRef::NonNull(inner) => inner.named_type(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{name}"),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}
