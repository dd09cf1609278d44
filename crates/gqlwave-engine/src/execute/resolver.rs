use crate::Json;
use crate::loader::LoaderHandle;
use crate::response::FieldError;
use crate::response::ResponsePath;
use futures_util::future::BoxFuture;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// The outcome of one resolver invocation.
pub type ResolverResult = Result<Json, FieldError>;

type BoxResolverFn = Box<dyn Fn(ResolverContext) -> BoxFuture<'static, ResolverResult> + Send + Sync>;

/// Everything a resolver callback gets to work with.
///
/// Owned (cheaply cloned from per-request state) so resolver futures
/// have no borrow ties to the engine; a resolver may suspend at any
/// point, e.g. awaiting [`ResolverContext::loader`] or external I/O.
pub struct ResolverContext {
    /// The parent value the field is being resolved on.
    pub parent: Json,

    /// Coerced argument values, defaults applied.
    pub arguments: IndexMap<String, Json>,

    /// The response path of the field being resolved.
    pub path: ResponsePath,

    /// Handle to the request's batch/cache layer.
    pub loader: LoaderHandle,

    /// Cancellation signal for the whole request.
    pub cancellation: CancellationToken,
}

impl ResolverContext {
    /// Looks up an argument by name.
    pub fn argument(&self, name: &str) -> Option<&Json> {
        self.arguments.get(name)
    }

    /// Looks up an argument, failing with a field error if absent.
    /// Arguments with defaults are always present, so this is the
    /// common accessor.
    pub fn require_argument(&self, name: &str) -> Result<&Json, FieldError> {
        self.arguments
            .get(name)
            .ok_or_else(|| FieldError::new(format!("argument `{name}` was not provided")))
    }

    /// Reads a property off the parent object, `null` if absent.
    pub fn parent_property(&self, key: &str) -> Json {
        self.parent.get(key).cloned().unwrap_or(Json::Null)
    }
}

/// Field resolvers keyed by `(type name, field name)`.
///
/// The engine looks up `(runtime type, field)` first and falls back to
/// the type the field definition was found on (an interface), so a
/// resolver registered on an interface serves every implementor that
/// has no registration of its own. Fields with no resolver at all fall
/// back to reading the property off the parent object.
#[derive(Default)]
pub struct ResolverRegistry {
    resolvers: HashMap<(String, String), BoxResolverFn>,
}

impl ResolverRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a resolver for a field.
    pub fn register<F, Fut>(
        mut self,
        type_name: impl Into<String>,
        field_name: impl Into<String>,
        resolver: F,
    ) -> Self
    where
        F: Fn(ResolverContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ResolverResult> + Send + 'static,
    {
        self.resolvers.insert(
            (type_name.into(), field_name.into()),
            Box::new(move |ctx| Box::pin(resolver(ctx))),
        );
        self
    }

    /// Looks up the resolver for a field on a type.
    pub(crate) fn get(
        &self,
        type_name: &str,
        field_name: &str,
    ) -> Option<&BoxResolverFn> {
        self.resolvers
            .get(&(type_name.to_string(), field_name.to_string()))
    }
}
