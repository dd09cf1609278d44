use crate::Json;
use crate::response::FieldError;
use std::collections::HashMap;
use std::sync::Arc;

/// An error that fails an entire batch dispatch. Every key awaiting
/// the batch receives it as a field error.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub struct BatchError {
    message: String,
}

impl BatchError {
    /// Creates a batch error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A batched data source.
///
/// The layer collects every key raised for this loader during one
/// execution wave and invokes [`load`](BatchLoader::load) exactly once
/// with the deduplicated key set. The returned list must align 1:1
/// with `keys`; a mismatched length is treated as a configuration
/// error and fails every key in the batch.
#[async_trait::async_trait]
pub trait BatchLoader: Send + Sync {
    async fn load(&self, keys: Vec<Json>) -> Result<Vec<Result<Json, FieldError>>, BatchError>;
}

/// The registry of batch loaders available to a request, keyed by
/// loader identity. Shared read-only across requests.
#[derive(Clone, Default)]
pub struct Loaders {
    loaders: HashMap<String, Arc<dyn BatchLoader>>,
}

impl Loaders {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a loader under an identity, replacing any previous
    /// registration.
    pub fn register(mut self, identity: impl Into<String>, loader: impl BatchLoader + 'static) -> Self {
        self.loaders.insert(identity.into(), Arc::new(loader));
        self
    }

    /// Looks up a loader by identity.
    pub fn get(&self, identity: &str) -> Option<Arc<dyn BatchLoader>> {
        self.loaders.get(identity).cloned()
    }
}
