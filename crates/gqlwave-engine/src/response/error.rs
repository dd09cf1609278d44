use crate::JsonMap;
use crate::response::ResponsePath;
use gqlwave_parser::SourceSpan;
use serde::Serialize;

/// A source location in an error object, 1-based for display per the
/// response contract.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl From<&SourceSpan> for Location {
    fn from(span: &SourceSpan) -> Self {
        Location {
            line: span.start_inclusive.line() + 1,
            column: span.start_inclusive.column() + 1,
        }
    }
}

/// An error entry in the response `errors` list.
///
/// Shape per the GraphQL-over-HTTP contract: `message`, `locations`
/// (1-based line/column pairs), `path` (response keys and list
/// indices), and an optional `extensions` map.
#[derive(Clone, Debug, Serialize)]
pub struct GraphQLError {
    pub message: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,

    #[serde(skip_serializing_if = "ResponsePath::is_root")]
    pub path: ResponsePath,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<JsonMap>,
}

impl GraphQLError {
    /// Creates an error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: ResponsePath::root(),
            extensions: None,
        }
    }

    /// Attaches source locations.
    pub fn with_locations(mut self, spans: impl IntoIterator<Item = SourceSpan>) -> Self {
        self.locations = spans.into_iter().map(|span| Location::from(&span)).collect();
        self
    }

    /// Attaches a response path.
    pub fn with_path(mut self, path: ResponsePath) -> Self {
        self.path = path;
        self
    }
}

/// A runtime error raised by (or on behalf of) a field resolver.
///
/// Resolver callbacks return `Result<Json, FieldError>`; the engine
/// attaches the response path and source locations when it converts
/// the error into a response [`GraphQLError`]. `Clone` because a
/// batched load failure fans the same error out to every caller and
/// the per-request cache retains it.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub struct FieldError {
    pub message: String,
    pub extensions: Option<JsonMap>,
}

impl FieldError {
    /// Creates a field error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            extensions: None,
        }
    }

    /// Attaches a structured `extensions` map.
    pub fn with_extensions(mut self, extensions: JsonMap) -> Self {
        self.extensions = Some(extensions);
        self
    }
}

impl From<&str> for FieldError {
    fn from(message: &str) -> Self {
        FieldError::new(message)
    }
}

impl From<String> for FieldError {
    fn from(message: String) -> Self {
        FieldError::new(message)
    }
}
