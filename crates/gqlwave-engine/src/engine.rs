use crate::EngineConfig;
use crate::Json;
use crate::Request;
use crate::compile::compile;
use crate::document_cache::DocumentCache;
use crate::document_cache::InMemoryDocumentCache;
use crate::document_cache::NoopDocumentCache;
use crate::execute::Executor;
use crate::execute::ResolverRegistry;
use crate::loader::Loaders;
use crate::response::GraphQLError;
use crate::response::Location;
use crate::response::Response;
use crate::schema::TypeGraph;
use gqlwave_parser::Parser;
use gqlwave_parser::ast;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// The engine front door: parse (cache-aware), compile, execute.
///
/// One engine is built per schema and shared across requests; the type
/// graph, resolver registry, and loader registry are all read-only
/// after construction.
pub struct Engine {
    graph: Arc<TypeGraph>,
    resolvers: Arc<ResolverRegistry>,
    loaders: Arc<Loaders>,
    document_cache: Arc<dyn DocumentCache>,
    config: EngineConfig,
}

impl Engine {
    /// Creates an engine with default configuration and no batch
    /// loaders.
    pub fn new(graph: TypeGraph, resolvers: ResolverRegistry) -> Self {
        let config = EngineConfig::default();
        let document_cache: Arc<dyn DocumentCache> = if config.document_cache_capacity == 0 {
            Arc::new(NoopDocumentCache)
        } else {
            Arc::new(InMemoryDocumentCache::new(config.document_cache_capacity))
        };
        Self {
            graph: Arc::new(graph),
            resolvers: Arc::new(resolvers),
            loaders: Arc::new(Loaders::new()),
            document_cache,
            config,
        }
    }

    /// Replaces the batch loader registry.
    pub fn with_loaders(mut self, loaders: Loaders) -> Self {
        self.loaders = Arc::new(loaders);
        self
    }

    /// Applies a configuration, rebuilding the default document cache
    /// to the configured capacity.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.document_cache = if config.document_cache_capacity == 0 {
            Arc::new(NoopDocumentCache)
        } else {
            Arc::new(InMemoryDocumentCache::new(config.document_cache_capacity))
        };
        self.config = config;
        self
    }

    /// Injects a document cache implementation.
    pub fn with_document_cache(mut self, cache: impl DocumentCache + 'static) -> Self {
        self.document_cache = Arc::new(cache);
        self
    }

    /// Returns the type graph this engine executes against.
    pub fn type_graph(&self) -> &TypeGraph {
        &self.graph
    }

    /// Executes a request against a null root value with no external
    /// cancellation.
    pub async fn execute(&self, request: Request) -> Response {
        self.execute_with(request, &Json::Null, CancellationToken::new())
            .await
    }

    /// Executes a request against a root value, with a cancellation
    /// signal that propagates to every in-flight resolver and to the
    /// batch layer.
    pub async fn execute_with(
        &self,
        request: Request,
        root_value: &Json,
        cancellation: CancellationToken,
    ) -> Response {
        let span = tracing::debug_span!(
            "graphql_request",
            operation = request.operation_name.as_deref()
        );
        let _enter = span.enter();

        let document = match self.parse_document(&request.query) {
            Ok(document) => document,
            Err(response) => return response,
        };

        let operation = match compile(
            &document,
            &self.graph,
            request.operation_name.as_deref(),
            &request.variables,
        ) {
            Ok(operation) => operation,
            Err(error) => {
                tracing::debug!(message = error.message(), "compile error");
                let graphql_error = GraphQLError::new(error.message().to_string())
                    .with_locations(error.locations().iter().copied());
                return Response::request_error(graphql_error);
            }
        };

        drop(_enter);
        Executor::new(
            &self.graph,
            &self.resolvers,
            &operation,
            self.loaders.clone(),
            cancellation,
            self.config.max_concurrency,
        )
        .execute(root_value)
        .await
    }

    /// Parses query text, consulting the document cache first. A parse
    /// failure becomes the fatal single-error response.
    fn parse_document(&self, query: &str) -> Result<Arc<ast::Document>, Response> {
        if let Some(document) = self.document_cache.get(query) {
            tracing::trace!("document cache hit");
            return Ok(document);
        }

        let result = Parser::new(query).parse();
        match Result::<_, Vec<gqlwave_parser::ParseError>>::from(result) {
            Ok(document) => {
                let document = Arc::new(document);
                self.document_cache
                    .insert(query.to_string(), document.clone());
                Ok(document)
            }
            Err(errors) => {
                // The request never compiles: no `data` key, one
                // descriptive error pointing at the offending token.
                let first = errors.into_iter().next();
                let graphql_error = match first {
                    Some(error) => {
                        tracing::debug!(message = error.message(), "parse error");
                        GraphQLError {
                            message: error.message().to_string(),
                            locations: vec![Location::from(error.span())],
                            path: Default::default(),
                            extensions: None,
                        }
                    }
                    None => GraphQLError::new("the document could not be parsed"),
                };
                Err(Response::request_error(graphql_error))
            }
        }
    }
}
