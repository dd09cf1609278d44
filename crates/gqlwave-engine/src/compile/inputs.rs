//! Input coercion: raw JSON variable values and AST literals, checked
//! and normalized against declared input types.

use crate::Json;
use crate::JsonMap;
use crate::compile::CompileError;
use crate::compile::CompileErrorKind;
use crate::schema::FieldDefinition;
use crate::schema::TypeDefinition;
use crate::schema::TypeGraph;
use crate::schema::TypeRef;
use gqlwave_parser::ast;
use indexmap::IndexMap;

/// Converts a parsed type annotation to a [`TypeRef`], checking that
/// the named type exists in the graph and is an input type.
pub(crate) fn annotation_to_input_type(
    graph: &TypeGraph,
    annotation: &ast::TypeAnnotation,
) -> Result<TypeRef, CompileError> {
    let named = annotation.named_type();
    if graph.type_definition(&named.value).is_none() {
        return Err(CompileError::at(
            format!("unknown type `{}`", named.value),
            named.span,
            CompileErrorKind::UnknownType {
                name: named.value.clone(),
            },
        ));
    }
    if !graph.is_input_type(&named.value) {
        return Err(CompileError::at(
            format!("type `{}` is not an input type", named.value),
            named.span,
            CompileErrorKind::VariableCoercion {
                variable: String::new(),
            },
        ));
    }
    Ok(annotation_to_type_ref(annotation))
}

fn annotation_to_type_ref(annotation: &ast::TypeAnnotation) -> TypeRef {
    match annotation {
        ast::TypeAnnotation::Named { name, .. } => TypeRef::named(name.value.clone()),
        ast::TypeAnnotation::List { inner, .. } => TypeRef::list(annotation_to_type_ref(inner)),
        ast::TypeAnnotation::NonNull { inner, .. } => {
            TypeRef::non_null(annotation_to_type_ref(inner))
        }
    }
}

/// Coerces the raw variable map of a request against an operation's
/// variable definitions, applying defaults. Returns the coerced map;
/// variables that are nullable, absent, and defaultless are left out.
pub(crate) fn coerce_variables(
    graph: &TypeGraph,
    operation: &ast::OperationDefinition,
    raw: &JsonMap,
) -> Result<IndexMap<String, Json>, CompileError> {
    let mut coerced = IndexMap::new();

    for var_def in &operation.variable_definitions {
        let name = &var_def.name.value;
        let ty = annotation_to_input_type(graph, &var_def.var_type)?;

        if let Some(value) = raw.get(name) {
            let value = coerce_input_value(graph, &ty, value).map_err(|reason| {
                CompileError::at(
                    format!("variable `${name}` got an invalid value: {reason}"),
                    var_def.span,
                    CompileErrorKind::VariableCoercion {
                        variable: name.clone(),
                    },
                )
            })?;
            coerced.insert(name.clone(), value);
        } else if let Some(default) = &var_def.default_value {
            let value = coerce_literal(graph, &ty, default, &IndexMap::new())?;
            coerced.insert(name.clone(), value);
        } else if ty.is_non_null() {
            return Err(CompileError::at(
                format!("variable `${name}` of required type `{ty}` was not provided"),
                var_def.span,
                CompileErrorKind::VariableCoercion {
                    variable: name.clone(),
                },
            ));
        }
    }

    Ok(coerced)
}

/// Coerces the arguments of one AST field against the field's
/// definition, substituting coerced variables and applying argument
/// defaults.
pub(crate) fn coerce_arguments(
    graph: &TypeGraph,
    definition: &FieldDefinition,
    field: &ast::Field,
    variables: &IndexMap<String, Json>,
) -> Result<IndexMap<String, Json>, CompileError> {
    let mut coerced = IndexMap::new();

    for argument in &field.arguments {
        let arg_name = &argument.name.value;
        let Some(arg_def) = definition.argument(arg_name) else {
            return Err(CompileError::at(
                format!(
                    "unknown argument `{arg_name}` on field `{}`",
                    definition.name
                ),
                argument.name.span,
                CompileErrorKind::InvalidArguments {
                    field: definition.name.clone(),
                },
            ));
        };
        if coerced.contains_key(arg_name) {
            return Err(CompileError::at(
                format!("duplicate argument `{arg_name}`"),
                argument.name.span,
                CompileErrorKind::InvalidArguments {
                    field: definition.name.clone(),
                },
            ));
        }

        // An argument set to an unprovided variable counts as not
        // provided at all, so defaults still apply.
        if let ast::Value::Variable(variable) = &argument.value
            && !variables.contains_key(&variable.name.value)
        {
            continue;
        }

        let value = coerce_literal(graph, &arg_def.ty, &argument.value, variables)?;
        coerced.insert(arg_name.clone(), value);
    }

    for arg_def in definition.arguments.values() {
        if coerced.contains_key(&arg_def.name) {
            continue;
        }
        if let Some(default) = &arg_def.default_value {
            coerced.insert(arg_def.name.clone(), default.clone());
        } else if arg_def.ty.is_non_null() {
            return Err(CompileError::at(
                format!(
                    "missing required argument `{}` on field `{}`",
                    arg_def.name, definition.name
                ),
                field.name.span,
                CompileErrorKind::InvalidArguments {
                    field: definition.name.clone(),
                },
            ));
        }
    }

    Ok(coerced)
}

/// Coerces an AST value literal against a declared input type,
/// substituting variable references from the coerced variable map.
///
/// An absent variable coerces to `null` in nested positions; the
/// argument layer handles the top-level not-provided case before
/// calling this.
pub(crate) fn coerce_literal(
    graph: &TypeGraph,
    ty: &TypeRef,
    value: &ast::Value,
    variables: &IndexMap<String, Json>,
) -> Result<Json, CompileError> {
    // Variable references are re-checked against the position's type:
    // the declared variable type may be more lenient than this usage.
    if let ast::Value::Variable(variable) = value {
        let var_value = variables.get(&variable.name.value).cloned().unwrap_or(Json::Null);
        return coerce_input_value(graph, ty, &var_value).map_err(|reason| {
            CompileError::at(
                format!(
                    "variable `${}` got an invalid value for this position: {reason}",
                    variable.name.value
                ),
                variable.span,
                CompileErrorKind::VariableCoercion {
                    variable: variable.name.value.clone(),
                },
            )
        });
    }

    match ty {
        TypeRef::NonNull(inner) => {
            if matches!(value, ast::Value::Null(_)) {
                return Err(invalid_literal(
                    format!("expected non-null value of type `{ty}`, found null"),
                    value,
                ));
            }
            coerce_literal(graph, inner, value, variables)
        }

        TypeRef::List(inner) => match value {
            ast::Value::Null(_) => Ok(Json::Null),
            ast::Value::List(list) => {
                let mut items = Vec::with_capacity(list.items.len());
                for item in &list.items {
                    items.push(coerce_literal(graph, inner, item, variables)?);
                }
                Ok(Json::Array(items))
            }
            // A single value coerces to a one-element list.
            single => Ok(Json::Array(vec![coerce_literal(
                graph, inner, single, variables,
            )?])),
        },

        TypeRef::Named(name) => {
            if matches!(value, ast::Value::Null(_)) {
                return Ok(Json::Null);
            }
            match graph.type_definition(name) {
                Some(TypeDefinition::Scalar(_)) => coerce_scalar_literal(name, value, variables),
                Some(TypeDefinition::Enum(enum_type)) => match value {
                    ast::Value::Enum(enum_value) if enum_type.contains(&enum_value.value) => {
                        Ok(Json::String(enum_value.value.clone()))
                    }
                    ast::Value::Enum(enum_value) => Err(invalid_literal(
                        format!("`{}` is not a value of enum `{name}`", enum_value.value),
                        value,
                    )),
                    _ => Err(invalid_literal(
                        format!("expected a value of enum `{name}`"),
                        value,
                    )),
                },
                Some(TypeDefinition::InputObject(input_object)) => {
                    let ast::Value::Object(object) = value else {
                        return Err(invalid_literal(
                            format!("expected an input object of type `{name}`"),
                            value,
                        ));
                    };
                    let mut coerced = JsonMap::new();
                    for field in &object.fields {
                        let Some(field_def) = input_object.field(&field.name.value) else {
                            return Err(invalid_literal(
                                format!(
                                    "unknown field `{}` on input object `{name}`",
                                    field.name.value
                                ),
                                value,
                            ));
                        };
                        let field_value =
                            coerce_literal(graph, &field_def.ty, &field.value, variables)?;
                        coerced.insert(field.name.value.clone(), field_value);
                    }
                    for field_def in input_object.fields.values() {
                        if coerced.contains_key(&field_def.name) {
                            continue;
                        }
                        if let Some(default) = &field_def.default_value {
                            coerced.insert(field_def.name.clone(), default.clone());
                        } else if field_def.ty.is_non_null() {
                            return Err(invalid_literal(
                                format!(
                                    "missing required field `{}` on input object `{name}`",
                                    field_def.name
                                ),
                                value,
                            ));
                        }
                    }
                    Ok(Json::Object(coerced))
                }
                Some(_) => Err(invalid_literal(
                    format!("type `{name}` is not an input type"),
                    value,
                )),
                None => Err(CompileError::at(
                    format!("unknown type `{name}`"),
                    *value.span(),
                    CompileErrorKind::UnknownType { name: name.clone() },
                )),
            }
        }
    }
}

/// Coerces a scalar literal. Built-in scalars check literal kinds;
/// custom scalars accept any literal as plain JSON.
fn coerce_scalar_literal(
    name: &str,
    value: &ast::Value,
    variables: &IndexMap<String, Json>,
) -> Result<Json, CompileError> {
    match name {
        "Int" => match value {
            ast::Value::Int(int_value) if i32::try_from(int_value.value).is_ok() => {
                Ok(Json::from(int_value.value))
            }
            ast::Value::Int(_) => Err(invalid_literal(
                "Int cannot represent a value outside 32-bit signed range".to_string(),
                value,
            )),
            _ => Err(invalid_literal("expected an Int value".to_string(), value)),
        },
        "Float" => match value {
            ast::Value::Float(float_value) => Ok(Json::from(float_value.value)),
            ast::Value::Int(int_value) => Ok(Json::from(int_value.value as f64)),
            _ => Err(invalid_literal("expected a Float value".to_string(), value)),
        },
        "String" => match value {
            ast::Value::String(string_value) => Ok(Json::String(string_value.value.clone())),
            _ => Err(invalid_literal("expected a String value".to_string(), value)),
        },
        "Boolean" => match value {
            ast::Value::Boolean(boolean_value) => Ok(Json::Bool(boolean_value.value)),
            _ => Err(invalid_literal(
                "expected a Boolean value".to_string(),
                value,
            )),
        },
        "ID" => match value {
            ast::Value::String(string_value) => Ok(Json::String(string_value.value.clone())),
            ast::Value::Int(int_value) => Ok(Json::String(int_value.value.to_string())),
            _ => Err(invalid_literal("expected an ID value".to_string(), value)),
        },
        // Custom scalar: carry the literal through as JSON.
        _ => ast_value_to_json(value, variables),
    }
}

/// Converts an AST value to plain JSON, substituting variables. Used
/// for custom scalar literals, which have no declared structure.
fn ast_value_to_json(
    value: &ast::Value,
    variables: &IndexMap<String, Json>,
) -> Result<Json, CompileError> {
    Ok(match value {
        ast::Value::Null(_) => Json::Null,
        ast::Value::Boolean(v) => Json::Bool(v.value),
        ast::Value::Int(v) => Json::from(v.value),
        ast::Value::Float(v) => Json::from(v.value),
        ast::Value::String(v) => Json::String(v.value.clone()),
        ast::Value::Enum(v) => Json::String(v.value.clone()),
        ast::Value::Variable(v) => variables.get(&v.name.value).cloned().unwrap_or(Json::Null),
        ast::Value::List(list) => {
            let mut items = Vec::with_capacity(list.items.len());
            for item in &list.items {
                items.push(ast_value_to_json(item, variables)?);
            }
            Json::Array(items)
        }
        ast::Value::Object(object) => {
            let mut map = JsonMap::new();
            for field in &object.fields {
                map.insert(
                    field.name.value.clone(),
                    ast_value_to_json(&field.value, variables)?,
                );
            }
            Json::Object(map)
        }
    })
}

fn invalid_literal(message: String, value: &ast::Value) -> CompileError {
    CompileError::at(
        message,
        *value.span(),
        CompileErrorKind::InvalidArguments {
            field: String::new(),
        },
    )
}

/// Coerces a raw JSON value (a variable from the request) against a
/// declared input type. Errors are plain strings; the caller wraps
/// them with the variable's name and location.
pub(crate) fn coerce_input_value(
    graph: &TypeGraph,
    ty: &TypeRef,
    value: &Json,
) -> Result<Json, String> {
    match ty {
        TypeRef::NonNull(inner) => {
            if value.is_null() {
                return Err(format!("expected non-null value of type `{ty}`, found null"));
            }
            coerce_input_value(graph, inner, value)
        }

        TypeRef::List(inner) => match value {
            Json::Null => Ok(Json::Null),
            Json::Array(items) => {
                let mut coerced = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    coerced.push(
                        coerce_input_value(graph, inner, item)
                            .map_err(|reason| format!("at index {i}: {reason}"))?,
                    );
                }
                Ok(Json::Array(coerced))
            }
            // A single value coerces to a one-element list.
            single => Ok(Json::Array(vec![coerce_input_value(graph, inner, single)?])),
        },

        TypeRef::Named(name) => {
            if value.is_null() {
                return Ok(Json::Null);
            }
            match graph.type_definition(name) {
                Some(TypeDefinition::Scalar(_)) => coerce_scalar_input(name, value),
                Some(TypeDefinition::Enum(enum_type)) => match value.as_str() {
                    Some(s) if enum_type.contains(s) => Ok(value.clone()),
                    Some(s) => Err(format!("`{s}` is not a value of enum `{name}`")),
                    None => Err(format!("expected a value of enum `{name}`")),
                },
                Some(TypeDefinition::InputObject(input_object)) => {
                    let Json::Object(object) = value else {
                        return Err(format!("expected an input object of type `{name}`"));
                    };
                    for key in object.keys() {
                        if input_object.field(key).is_none() {
                            return Err(format!("unknown field `{key}` on input object `{name}`"));
                        }
                    }
                    let mut coerced = JsonMap::new();
                    for field_def in input_object.fields.values() {
                        match object.get(&field_def.name) {
                            Some(field_value) => {
                                let field_value = coerce_input_value(graph, &field_def.ty, field_value)
                                    .map_err(|reason| {
                                        format!("at field `{}`: {reason}", field_def.name)
                                    })?;
                                coerced.insert(field_def.name.clone(), field_value);
                            }
                            None => {
                                if let Some(default) = &field_def.default_value {
                                    coerced.insert(field_def.name.clone(), default.clone());
                                } else if field_def.ty.is_non_null() {
                                    return Err(format!(
                                        "missing required field `{}` on input object `{name}`",
                                        field_def.name
                                    ));
                                }
                            }
                        }
                    }
                    Ok(Json::Object(coerced))
                }
                Some(_) => Err(format!("type `{name}` is not an input type")),
                None => Err(format!("unknown type `{name}`")),
            }
        }
    }
}

/// Coerces a raw JSON scalar. Built-in scalars are checked strictly;
/// custom scalars pass through.
fn coerce_scalar_input(name: &str, value: &Json) -> Result<Json, String> {
    match name {
        "Int" => match value.as_i64() {
            Some(n) if i32::try_from(n).is_ok() => Ok(value.clone()),
            Some(_) => Err("Int cannot represent a value outside 32-bit signed range".to_string()),
            None => Err(format!("expected an Int value, found {value}")),
        },
        "Float" => match value.as_f64() {
            Some(_) => Ok(value.clone()),
            None => Err(format!("expected a Float value, found {value}")),
        },
        "String" => match value {
            Json::String(_) => Ok(value.clone()),
            _ => Err(format!("expected a String value, found {value}")),
        },
        "Boolean" => match value {
            Json::Bool(_) => Ok(value.clone()),
            _ => Err(format!("expected a Boolean value, found {value}")),
        },
        "ID" => match value {
            Json::String(_) => Ok(value.clone()),
            Json::Number(n) if n.is_i64() => Ok(Json::String(n.to_string())),
            _ => Err(format!("expected an ID value, found {value}")),
        },
        _ => Ok(value.clone()),
    }
}
