/// Categorizes parse errors for programmatic handling.
///
/// Each variant carries the minimal data needed for programmatic
/// decisions; human-readable context (suggestions, explanations) lives
/// in the `notes` field of [`ParseError`](crate::ParseError).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ParseErrorKind {
    /// Expected specific token(s) but found something else.
    #[error("unexpected token: `{found}`")]
    UnexpectedToken {
        /// What was expected (e.g. `[":", "{"]`).
        expected: Vec<String>,
        /// Description of what was found.
        found: String,
    },

    /// The document ended before a complete construct was parsed.
    #[error("unexpected end of input")]
    UnexpectedEof { expected: Vec<String> },

    /// The parser encountered an `Error` token from the lexer. The
    /// lexer's message and notes are preserved on the parent
    /// [`ParseError`](crate::ParseError).
    #[error("lexical error")]
    LexicalError,

    /// A delimiter was opened but EOF was reached before the matching
    /// closing delimiter. The opening location is included in the
    /// error's notes.
    #[error("unclosed delimiter: `{delimiter}`")]
    UnclosedDelimiter { delimiter: String },

    /// A string/number literal could not be interpreted (bad escape,
    /// integer overflow, ...).
    #[error("invalid literal")]
    InvalidLiteral,

    /// A reserved name was used where it is not allowed (e.g. `on` as a
    /// fragment name).
    #[error("reserved name: `{name}`")]
    ReservedName { name: String },

    /// A type-system definition appeared in an executable document.
    #[error("type-system definitions are not executable")]
    NotExecutable,

    /// An empty construct that the grammar requires to be non-empty
    /// (selection set, argument list, variable definition list).
    #[error("invalid empty construct: `{construct}`")]
    InvalidEmptyConstruct { construct: String },

    /// A catch-all for syntax errors without a dedicated variant.
    #[error("invalid syntax")]
    InvalidSyntax,
}
