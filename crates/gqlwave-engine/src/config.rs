use serde::Deserialize;

/// Engine configuration.
///
/// Deserializable so a host can embed it in its own configuration
/// file; every field has a default.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Upper bound on concurrently running field resolutions within
    /// one wave. Defaults to the machine's available parallelism.
    pub max_concurrency: usize,

    /// Capacity of the in-memory parsed-document cache. Zero disables
    /// caching.
    pub document_cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            document_cache_capacity: 256,
        }
    }
}

fn default_max_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(8)
}
