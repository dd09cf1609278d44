//! The response document returned to the transport layer.

mod error;
mod path;

pub use error::FieldError;
pub use error::GraphQLError;
pub use error::Location;
pub use path::PathSegment;
pub use path::ResponsePath;

use crate::Json;
use crate::JsonMap;
use serde::Serialize;

/// A GraphQL response document.
///
/// Serializes field-for-field to the GraphQL-over-HTTP response shape:
/// `data` is omitted entirely when the request failed before execution
/// (parse or compile error), `null` when a non-null root field
/// propagated, and an object otherwise; `errors` is omitted when empty;
/// `extensions` carries free-form diagnostic data.
#[derive(Debug, Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Json>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQLError>,

    #[serde(skip_serializing_if = "JsonMap::is_empty")]
    pub extensions: JsonMap,
}

impl Response {
    /// A successful (possibly partial) response with data and any
    /// field errors collected during execution.
    pub fn new(data: Json, errors: Vec<GraphQLError>) -> Self {
        Self {
            data: Some(data),
            errors,
            extensions: JsonMap::new(),
        }
    }

    /// A response for a request that failed before execution began:
    /// no `data` key at all, a single descriptive error.
    pub fn request_error(error: GraphQLError) -> Self {
        Self {
            data: None,
            errors: vec![error],
            extensions: JsonMap::new(),
        }
    }

    /// Adds an entry to the response `extensions`.
    pub fn with_extension(mut self, key: impl Into<String>, value: Json) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    /// Returns `true` if the response carries no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}
