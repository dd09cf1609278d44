//! Caching of parsed documents across requests.
//!
//! Re-parsing identical query text on every request is wasted work for
//! the common case of a client sending the same handful of operations.
//! The cache is an explicit, injectable component of the
//! [`Engine`](crate::Engine) — never hidden static state — keyed by
//! the raw query text.

use cached::Cached;
use cached::SizedCache;
use gqlwave_parser::ast;
use std::sync::Arc;
use std::sync::Mutex;

/// A cache of parsed documents, keyed by query text.
pub trait DocumentCache: Send + Sync {
    /// Looks up a previously parsed document.
    fn get(&self, query: &str) -> Option<Arc<ast::Document>>;

    /// Stores a parsed document.
    fn insert(&self, query: String, document: Arc<ast::Document>);
}

/// A bounded in-memory document cache with least-recently-used
/// eviction.
pub struct InMemoryDocumentCache {
    cache: Mutex<SizedCache<String, Arc<ast::Document>>>,
}

impl InMemoryDocumentCache {
    /// Creates a cache holding at most `capacity` documents.
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: Mutex::new(SizedCache::with_size(capacity.max(1))),
        }
    }
}

impl DocumentCache for InMemoryDocumentCache {
    fn get(&self, query: &str) -> Option<Arc<ast::Document>> {
        self.cache.lock().unwrap().cache_get(query).cloned()
    }

    fn insert(&self, query: String, document: Arc<ast::Document>) {
        self.cache.lock().unwrap().cache_set(query, document);
    }
}

/// A cache that never stores anything; every request re-parses.
pub struct NoopDocumentCache;

impl DocumentCache for NoopDocumentCache {
    fn get(&self, _query: &str) -> Option<Arc<ast::Document>> {
        None
    }

    fn insert(&self, _query: String, _document: Arc<ast::Document>) {}
}
