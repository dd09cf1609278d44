use crate::Json;
use crate::JsonMap;
use serde::Deserialize;

/// An incoming GraphQL request, as supplied by the transport layer.
#[derive(Clone, Debug, Deserialize)]
pub struct Request {
    /// The query text.
    pub query: String,

    /// Selects the operation when the document defines several.
    #[serde(default, rename = "operationName")]
    pub operation_name: Option<String>,

    /// Raw variable values.
    #[serde(default)]
    pub variables: JsonMap,
}

impl Request {
    /// Creates a request from query text.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            operation_name: None,
            variables: JsonMap::new(),
        }
    }

    /// Selects an operation by name.
    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// Sets the raw variable map.
    pub fn with_variables(mut self, variables: JsonMap) -> Self {
        self.variables = variables;
        self
    }

    /// Sets one raw variable.
    pub fn with_variable(mut self, name: impl Into<String>, value: Json) -> Self {
        self.variables.insert(name.into(), value);
        self
    }
}
