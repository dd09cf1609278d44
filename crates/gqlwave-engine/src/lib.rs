//! The runtime heart of a GraphQL server: operation compilation,
//! concurrent execution, and request-scoped batching.
//!
//! The crate consumes the AST produced by `gqlwave-parser` and a
//! read-only [`TypeGraph`](schema::TypeGraph), and turns requests into
//! response documents:
//!
//! ```text
//! ast::Document + TypeGraph + variables
//!     -> compile  -> CompiledOperation
//!     -> execute  -> Response { data, errors, extensions }
//! ```
//!
//! The [`Engine`] front door wires the pieces together with an
//! injectable document cache and configuration; the
//! [`loader`] module provides the per-request batch/cache layer that
//! coalesces keyed resolver loads into one dispatch per execution wave.

pub mod compile;
mod config;
mod document_cache;
mod engine;
pub mod execute;
pub mod loader;
mod request;
pub mod response;
pub mod schema;

pub use config::EngineConfig;
pub use document_cache::DocumentCache;
pub use document_cache::InMemoryDocumentCache;
pub use document_cache::NoopDocumentCache;
pub use engine::Engine;
pub use request::Request;

/// JSON value type used for variables, resolver values, and response
/// data. The `preserve_order` feature keeps object members in
/// insertion order, which the response assembly relies on.
pub type Json = serde_json::Value;

/// A JSON object map.
pub type JsonMap = serde_json::Map<String, Json>;

#[cfg(test)]
mod tests;
