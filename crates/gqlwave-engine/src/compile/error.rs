use gqlwave_parser::SourceSpan;

/// A fatal compile-time error: the request never executes and the
/// response carries no `data` key.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub struct CompileError {
    message: String,
    locations: Vec<SourceSpan>,
    kind: CompileErrorKind,
}

impl CompileError {
    /// Creates a compile error without a source location.
    pub fn new(message: impl Into<String>, kind: CompileErrorKind) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            kind,
        }
    }

    /// Creates a compile error pointing at a source location.
    pub fn at(message: impl Into<String>, span: SourceSpan, kind: CompileErrorKind) -> Self {
        Self {
            message: message.into(),
            locations: vec![span],
            kind,
        }
    }

    /// Adds another source location to this error (e.g. the other
    /// field of a merge conflict).
    pub fn also_at(mut self, span: SourceSpan) -> Self {
        self.locations.push(span);
        self
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the source locations this error points at.
    pub fn locations(&self) -> &[SourceSpan] {
        &self.locations
    }

    /// Returns the categorized error kind.
    pub fn kind(&self) -> &CompileErrorKind {
        &self.kind
    }
}

/// Categorizes compile errors for programmatic handling.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum CompileErrorKind {
    /// The document defines no operations.
    #[error("no operations")]
    NoOperations,

    /// Multiple operations exist and no operation name was supplied,
    /// or an anonymous operation is not the only definition.
    #[error("operation name required")]
    OperationNameRequired,

    /// No operation matches the supplied name.
    #[error("unknown operation `{name}`")]
    UnknownOperation { name: String },

    /// The selected operation kind is not executable by this engine
    /// (subscriptions).
    #[error("unsupported operation")]
    UnsupportedOperation,

    /// A supplied variable value (or missing value) failed coercion
    /// against its declared type.
    #[error("variable coercion failed for `${variable}`")]
    VariableCoercion { variable: String },

    /// A fragment spreads itself, directly or transitively.
    #[error("fragment cycle through `{fragment}`")]
    FragmentCycle { fragment: String },

    /// A fragment spread references an undefined fragment.
    #[error("unknown fragment `{fragment}`")]
    UnknownFragment { fragment: String },

    /// Two selections with the same response key disagree on field
    /// name or argument values.
    #[error("field merge conflict on `{response_key}`")]
    FieldMergeConflict { response_key: String },

    /// A named type is missing from the type graph.
    #[error("unknown type `{name}`")]
    UnknownType { name: String },

    /// A field is not defined on the type it is selected from.
    #[error("unknown field `{field}` on `{type_name}`")]
    UnknownField { type_name: String, field: String },

    /// An argument is not defined on the field it is supplied to, or a
    /// required argument is missing, or a literal failed coercion.
    #[error("invalid arguments for `{field}`")]
    InvalidArguments { field: String },

    /// A `@skip`/`@include` directive is malformed.
    #[error("invalid directive `@{directive}`")]
    InvalidDirective { directive: String },

    /// A selection set appears on a leaf field, or is missing from a
    /// composite field.
    #[error("invalid selection")]
    InvalidSelection,
}
