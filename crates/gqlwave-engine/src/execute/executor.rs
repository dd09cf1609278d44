use crate::Json;
use crate::JsonMap;
use crate::compile::CompiledField;
use crate::compile::CompiledOperation;
use crate::execute::ResolverContext;
use crate::execute::ResolverRegistry;
use crate::loader::LoaderHandle;
use crate::loader::Loaders;
use crate::response::FieldError;
use crate::response::GraphQLError;
use crate::response::Location;
use crate::response::Response;
use crate::response::ResponsePath;
use crate::schema::TypeDefinition;
use crate::schema::TypeGraph;
use crate::schema::TypeRef;
use futures_util::StreamExt;
use futures_util::future::BoxFuture;
use futures_util::stream;
use gqlwave_parser::SourceSpan;
use gqlwave_parser::ast::OperationKind;
use std::sync::Arc;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// A field failure travelling up toward the nearest nullable slot.
///
/// Created when a non-null field fails (resolver error, null result,
/// or shape mismatch); the slot that finally absorbs it by becoming
/// null records it with that slot's response path.
struct Propagated {
    message: String,
    locations: Vec<SourceSpan>,
    extensions: Option<crate::JsonMap>,
}

impl Propagated {
    fn at_field(message: impl Into<String>, field: &CompiledField) -> Self {
        Self {
            message: message.into(),
            locations: field.locations.clone(),
            extensions: None,
        }
    }
}

/// Executes one compiled operation against a root value.
///
/// One executor exists per in-flight request and exclusively owns the
/// request's mutable state (collected errors, the batch/cache layer);
/// the type graph, resolver registry, and compiled operation are read
/// shared.
pub struct Executor<'a> {
    graph: &'a TypeGraph,
    registry: &'a ResolverRegistry,
    operation: &'a CompiledOperation,
    loader: LoaderHandle,
    cancellation: CancellationToken,
    errors: Mutex<Vec<GraphQLError>>,
    max_concurrency: usize,
}

impl<'a> Executor<'a> {
    /// Creates an executor for one request.
    pub fn new(
        graph: &'a TypeGraph,
        registry: &'a ResolverRegistry,
        operation: &'a CompiledOperation,
        loaders: Arc<Loaders>,
        cancellation: CancellationToken,
        max_concurrency: usize,
    ) -> Self {
        Self {
            graph,
            registry,
            operation,
            loader: LoaderHandle::new(loaders, cancellation.clone()),
            cancellation,
            errors: Mutex::new(Vec::new()),
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Runs the operation to completion and assembles the response.
    ///
    /// Mutation root fields run serially in selection order; everything
    /// else runs concurrently within its wave. Result assembly follows
    /// selection order regardless of completion order.
    pub async fn execute(self, root_value: &Json) -> Response {
        tracing::debug!(
            operation = self.operation.operation_name.as_deref(),
            root_type = %self.operation.root_type,
            "executing operation"
        );

        let serial = self.operation.kind == OperationKind::Mutation;
        let result = self
            .resolve_selection_set(
                &self.operation.root,
                root_value,
                &self.operation.root_type,
                ResponsePath::root(),
                serial,
            )
            .await;

        let mut errors = self.errors.into_inner().unwrap();
        let data = match result {
            Ok(map) => Json::Object(map),
            Err(propagated) => {
                // The whole root went null: record the error at the
                // root path.
                errors.push(to_graphql_error(propagated, ResponsePath::root()));
                Json::Null
            }
        };

        if self.cancellation.is_cancelled() {
            errors.push(GraphQLError::new("request was cancelled"));
        }

        Response::new(data, errors)
    }

    /// Resolves the applicable fields of one selection set against a
    /// parent value, re-imposing selection order on the results.
    fn resolve_selection_set<'s>(
        &'s self,
        fields: &'s [CompiledField],
        parent: &'s Json,
        runtime_type: &'s str,
        path: ResponsePath,
        serial: bool,
    ) -> BoxFuture<'s, Result<JsonMap, Propagated>> {
        Box::pin(async move {
            let applicable: Vec<&CompiledField> = fields
                .iter()
                .filter(|field| field.applies_to_type(runtime_type))
                .collect();

            let mut map = JsonMap::new();

            if serial {
                for field in applicable {
                    let value = self
                        .resolve_field(field, parent, runtime_type, &path)
                        .await?;
                    map.insert(field.response_key.clone(), value);
                }
                return Ok(map);
            }

            // One wave: every sibling whose input (the parent value) is
            // available starts together, bounded by the configured
            // concurrency. `buffered` yields results in selection
            // order.
            let futures: Vec<_> = applicable
                .iter()
                .map(|field| self.resolve_field(field, parent, runtime_type, &path))
                .collect();
            let results: Vec<Result<Json, Propagated>> = stream::iter(futures)
                .buffered(self.max_concurrency)
                .collect()
                .await;

            for (field, result) in applicable.iter().zip(results) {
                // A propagating failure discards the whole sibling set;
                // unrelated branches above are unaffected.
                map.insert(field.response_key.clone(), result?);
            }
            Ok(map)
        })
    }

    /// Resolves one field: invoke the resolver (or the default
    /// property lookup), then complete the value against the field's
    /// declared type.
    async fn resolve_field(
        &self,
        field: &CompiledField,
        parent: &Json,
        runtime_type: &str,
        parent_path: &ResponsePath,
    ) -> Result<Json, Propagated> {
        let path = parent_path.key(field.response_key.clone());

        if field.is_typename() {
            return Ok(Json::String(runtime_type.to_string()));
        }

        let resolved = if self.cancellation.is_cancelled() {
            Err(FieldError::new("request was cancelled"))
        } else {
            self.invoke_resolver(field, parent, runtime_type, &path).await
        };

        match resolved {
            Ok(value) => {
                self.complete_value(field, &field.field_type, value, path)
                    .await
            }
            Err(field_error) => self.fail_field(field, field_error, path),
        }
    }

    /// Dispatches to the registered resolver, falling back from the
    /// runtime type to the declaring type, then to the default
    /// property lookup. The invocation is bracketed by the loader's
    /// task accounting so batch flushing can detect the end of the
    /// wave.
    async fn invoke_resolver(
        &self,
        field: &CompiledField,
        parent: &Json,
        runtime_type: &str,
        path: &ResponsePath,
    ) -> Result<Json, FieldError> {
        let resolver = self
            .registry
            .get(runtime_type, &field.field_name)
            .or_else(|| self.registry.get(&field.parent_type, &field.field_name));

        tracing::trace!(path = %path, field = %field.field_name, "resolving field");

        self.loader.begin_task();
        let result = match resolver {
            Some(resolver) => {
                let ctx = ResolverContext {
                    parent: parent.clone(),
                    arguments: field.arguments.clone(),
                    path: path.clone(),
                    loader: self.loader.clone(),
                    cancellation: self.cancellation.clone(),
                };
                resolver(ctx).await
            }
            None => Ok(parent.get(&field.field_name).cloned().unwrap_or(Json::Null)),
        };
        self.loader.finish_task().await;

        result
    }

    /// Turns a resolver failure into either a recorded error plus a
    /// null slot (nullable field) or a propagation toward the nearest
    /// nullable ancestor (non-null field).
    fn fail_field(
        &self,
        field: &CompiledField,
        field_error: FieldError,
        path: ResponsePath,
    ) -> Result<Json, Propagated> {
        let propagated = Propagated {
            message: field_error.message,
            locations: field.locations.clone(),
            extensions: field_error.extensions,
        };
        if field.field_type.is_non_null() {
            Err(propagated)
        } else {
            self.record(propagated, path);
            Ok(Json::Null)
        }
    }

    /// Completes a resolved value against a declared type, enforcing
    /// nullability bottom-up: a failure below a non-null wrapping
    /// propagates; a nullable position absorbs it, records the error
    /// at its own path, and becomes null.
    fn complete_value<'s>(
        &'s self,
        field: &'s CompiledField,
        ty: &'s TypeRef,
        value: Json,
        path: ResponsePath,
    ) -> BoxFuture<'s, Result<Json, Propagated>> {
        Box::pin(async move {
            match ty {
                TypeRef::NonNull(inner) => {
                    let completed = self.complete_shape(field, inner, value, &path).await?;
                    if completed.is_null() {
                        Err(Propagated::at_field(
                            format!(
                                "cannot return null for non-nullable field `{}.{}`",
                                field.parent_type, field.field_name
                            ),
                            field,
                        ))
                    } else {
                        Ok(completed)
                    }
                }
                nullable => match self.complete_shape(field, nullable, value, &path).await {
                    Ok(completed) => Ok(completed),
                    Err(propagated) => {
                        self.record(propagated, path);
                        Ok(Json::Null)
                    }
                },
            }
        })
    }

    /// Completes a value against a list or named type, with
    /// nullability already handled by the caller.
    async fn complete_shape(
        &self,
        field: &CompiledField,
        ty: &TypeRef,
        value: Json,
        path: &ResponsePath,
    ) -> Result<Json, Propagated> {
        if value.is_null() {
            return Ok(Json::Null);
        }

        match ty {
            TypeRef::NonNull(_) => unreachable!("stripped by complete_value"),

            TypeRef::List(inner) => {
                let Json::Array(items) = value else {
                    return Err(Propagated::at_field(
                        format!(
                            "resolver for `{}.{}` returned a non-list value for a list type",
                            field.parent_type, field.field_name
                        ),
                        field,
                    ));
                };

                // Elements resolve independently, indexed by position.
                let futures: Vec<_> = items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| self.complete_value(field, inner, item, path.index(i)))
                    .collect();
                let results: Vec<Result<Json, Propagated>> = stream::iter(futures)
                    .buffered(self.max_concurrency)
                    .collect()
                    .await;

                let mut completed = Vec::with_capacity(results.len());
                for result in results {
                    completed.push(result?);
                }
                Ok(Json::Array(completed))
            }

            TypeRef::Named(name) => match self.graph.type_definition(name) {
                Some(
                    TypeDefinition::Object(_)
                    | TypeDefinition::Interface(_)
                    | TypeDefinition::Union(_),
                ) => {
                    if !value.is_object() {
                        return Err(Propagated::at_field(
                            format!(
                                "resolver for `{}.{}` returned a non-object value for composite \
                                 type `{name}`",
                                field.parent_type, field.field_name
                            ),
                            field,
                        ));
                    }
                    let runtime_type = self.runtime_type_of(name, &value, field)?;
                    let map = self
                        .resolve_selection_set(
                            &field.children,
                            &value,
                            &runtime_type,
                            path.clone(),
                            false,
                        )
                        .await?;
                    Ok(Json::Object(map))
                }

                Some(TypeDefinition::Enum(enum_type)) => match value.as_str() {
                    Some(s) if enum_type.contains(s) => Ok(value),
                    _ => Err(Propagated::at_field(
                        format!(
                            "resolver for `{}.{}` returned a value that is not a member of enum \
                             `{name}`",
                            field.parent_type, field.field_name
                        ),
                        field,
                    )),
                },

                Some(TypeDefinition::Scalar(_)) => {
                    serialize_scalar(name, value).map_err(|reason| {
                        Propagated::at_field(
                            format!(
                                "resolver for `{}.{}` returned an invalid `{name}` value: {reason}",
                                field.parent_type, field.field_name
                            ),
                            field,
                        )
                    })
                }

                Some(TypeDefinition::InputObject(_)) | None => Err(Propagated::at_field(
                    format!("type `{name}` cannot be resolved in an output position"),
                    field,
                )),
            },
        }
    }

    /// Determines the runtime object type of a composite value: the
    /// declared type for objects, the value's `__typename` for
    /// interfaces and unions.
    fn runtime_type_of(
        &self,
        declared: &str,
        value: &Json,
        field: &CompiledField,
    ) -> Result<String, Propagated> {
        match self.graph.type_definition(declared) {
            Some(TypeDefinition::Object(_)) => Ok(declared.to_string()),
            Some(TypeDefinition::Interface(_) | TypeDefinition::Union(_)) => {
                let Some(type_name) = value.get("__typename").and_then(Json::as_str) else {
                    return Err(Propagated::at_field(
                        format!(
                            "cannot resolve the runtime type of abstract type `{declared}`: the \
                             value carries no `__typename`"
                        ),
                        field,
                    ));
                };
                let possible = self.graph.possible_types(declared).unwrap_or_default();
                if !possible.contains(type_name) {
                    return Err(Propagated::at_field(
                        format!(
                            "runtime type `{type_name}` is not a possible type of `{declared}`"
                        ),
                        field,
                    ));
                }
                Ok(type_name.to_string())
            }
            _ => Err(Propagated::at_field(
                format!("type `{declared}` is not a composite type"),
                field,
            )),
        }
    }

    /// Records an absorbed failure at the path of the slot that became
    /// null.
    fn record(&self, propagated: Propagated, path: ResponsePath) {
        self.errors
            .lock()
            .unwrap()
            .push(to_graphql_error(propagated, path));
    }
}

fn to_graphql_error(propagated: Propagated, path: ResponsePath) -> GraphQLError {
    GraphQLError {
        message: propagated.message,
        locations: propagated
            .locations
            .iter()
            .map(Location::from)
            .collect(),
        path,
        extensions: propagated.extensions,
    }
}

/// Serializes a scalar result value. Built-in scalars are checked;
/// custom scalars pass through as-is.
fn serialize_scalar(name: &str, value: Json) -> Result<Json, String> {
    match name {
        "Int" => match value.as_i64() {
            Some(n) if i32::try_from(n).is_ok() => Ok(value),
            _ => Err("expected a 32-bit integer".to_string()),
        },
        "Float" => match value.as_f64() {
            Some(_) => Ok(value),
            None => Err("expected a number".to_string()),
        },
        "String" => match value {
            Json::String(_) => Ok(value),
            _ => Err("expected a string".to_string()),
        },
        "Boolean" => match value {
            Json::Bool(_) => Ok(value),
            _ => Err("expected a boolean".to_string()),
        },
        "ID" => match value {
            Json::String(_) => Ok(value),
            Json::Number(ref n) if n.is_i64() => Ok(Json::String(n.to_string())),
            _ => Err("expected a string or integer id".to_string()),
        },
        _ => Ok(value),
    }
}
