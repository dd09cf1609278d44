//! Field collection and merging: AST selection sets are flattened into
//! compiled fields, with fragments inlined, `@skip`/`@include`
//! evaluated, and same-response-key selections merged.

use crate::Json;
use crate::compile::CompileError;
use crate::compile::CompileErrorKind;
use crate::compile::CompiledField;
use crate::compile::inputs::coerce_arguments;
use crate::schema::TypeGraph;
use crate::schema::TypeRef;
use gqlwave_parser::SourceSpan;
use gqlwave_parser::ast;
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// The runtime object types a selection applies to. `None` means it
/// applies to every runtime type of the enclosing selection set.
type Condition = Option<BTreeSet<String>>;

/// Walks selection sets, inlining fragments and grouping fields by
/// response key.
pub(crate) struct Collector<'a> {
    graph: &'a TypeGraph,
    document: &'a ast::Document,
    variables: &'a IndexMap<String, Json>,

    /// Names of the fragment spreads currently being inlined, for
    /// cycle detection.
    spread_stack: Vec<&'a str>,

    /// Preorder ordinal for the next emitted field.
    next_index: usize,
}

/// Fields with one response key that have been merged into a single
/// selection. The originating AST nodes are retained so child
/// selection sets can be merged recursively and so diagnostics can
/// report every contributing location.
struct FieldGroup<'a> {
    response_key: String,
    field_name: String,
    parent_type: String,
    field_type: TypeRef,
    arguments: IndexMap<String, Json>,
    applies_to: Condition,
    ast_fields: Vec<&'a ast::Field>,
    locations: Vec<SourceSpan>,
}

impl<'a> Collector<'a> {
    pub fn new(
        graph: &'a TypeGraph,
        document: &'a ast::Document,
        variables: &'a IndexMap<String, Json>,
    ) -> Self {
        Self {
            graph,
            document,
            variables,
            spread_stack: Vec::new(),
            next_index: 0,
        }
    }

    /// Returns the total number of fields emitted so far.
    pub fn field_count(&self) -> usize {
        self.next_index
    }

    /// Collects and emits the compiled fields of one selection set
    /// against the composite type `set_type`.
    pub fn collect_set(
        &mut self,
        set_type: &str,
        selection_set: &'a ast::SelectionSet,
    ) -> Result<Vec<CompiledField>, CompileError> {
        let mut groups: IndexMap<String, Vec<FieldGroup<'a>>> = IndexMap::new();
        self.collect_into(set_type, set_type, None, selection_set, &mut groups)?;
        self.emit(groups)
    }

    /// Adds the selections of one set (or inlined fragment) to the
    /// response-key groups.
    ///
    /// `set_type` is the type the selection set belongs to and stays
    /// fixed while fragments recurse; `scope_type` is the (possibly
    /// narrowed) type field definitions are looked up on; `condition`
    /// is the accumulated type-condition restriction.
    fn collect_into(
        &mut self,
        set_type: &str,
        scope_type: &str,
        condition: Condition,
        selection_set: &'a ast::SelectionSet,
        groups: &mut IndexMap<String, Vec<FieldGroup<'a>>>,
    ) -> Result<(), CompileError> {
        for selection in &selection_set.selections {
            match selection {
                ast::Selection::Field(field) => {
                    if !self.evaluate_inclusion(&field.directives)? {
                        continue;
                    }
                    self.add_field(scope_type, condition.clone(), field, groups)?;
                }

                ast::Selection::FragmentSpread(spread) => {
                    if !self.evaluate_inclusion(&spread.directives)? {
                        continue;
                    }
                    let name = spread.name.value.as_str();
                    if self.spread_stack.contains(&name) {
                        return Err(CompileError::at(
                            format!("fragment `{name}` spreads itself, directly or transitively"),
                            spread.span,
                            CompileErrorKind::FragmentCycle {
                                fragment: name.to_string(),
                            },
                        ));
                    }
                    let Some(fragment) = self.document.fragment(name) else {
                        return Err(CompileError::at(
                            format!("unknown fragment `{name}`"),
                            spread.span,
                            CompileErrorKind::UnknownFragment {
                                fragment: name.to_string(),
                            },
                        ));
                    };

                    let condition_type = &fragment.type_condition.on;
                    let Some(narrowed) = self.narrow_condition(
                        set_type,
                        &condition,
                        condition_type,
                    )?
                    else {
                        // The fragment can never apply to any runtime
                        // type of this selection set.
                        continue;
                    };

                    self.spread_stack.push(name);
                    self.collect_into(
                        set_type,
                        &condition_type.value,
                        narrowed,
                        &fragment.selection_set,
                        groups,
                    )?;
                    self.spread_stack.pop();
                }

                ast::Selection::InlineFragment(inline) => {
                    if !self.evaluate_inclusion(&inline.directives)? {
                        continue;
                    }
                    match &inline.type_condition {
                        Some(type_condition) => {
                            let Some(narrowed) = self.narrow_condition(
                                set_type,
                                &condition,
                                &type_condition.on,
                            )?
                            else {
                                continue;
                            };
                            self.collect_into(
                                set_type,
                                &type_condition.on.value,
                                narrowed,
                                &inline.selection_set,
                                groups,
                            )?;
                        }
                        None => {
                            self.collect_into(
                                set_type,
                                scope_type,
                                condition.clone(),
                                &inline.selection_set,
                                groups,
                            )?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Resolves one AST field against the scope type and merges it
    /// into the response-key groups.
    fn add_field(
        &mut self,
        scope_type: &str,
        condition: Condition,
        field: &'a ast::Field,
        groups: &mut IndexMap<String, Vec<FieldGroup<'a>>>,
    ) -> Result<(), CompileError> {
        let (field_type, arguments) = if field.name.value == "__typename" {
            if !field.arguments.is_empty() {
                return Err(CompileError::at(
                    "`__typename` takes no arguments",
                    field.name.span,
                    CompileErrorKind::InvalidArguments {
                        field: "__typename".to_string(),
                    },
                ));
            }
            (TypeRef::named_non_null("String"), IndexMap::new())
        } else {
            let Some(definition) = self.graph.field(scope_type, &field.name.value) else {
                return Err(CompileError::at(
                    format!(
                        "cannot query field `{}` on type `{scope_type}`",
                        field.name.value
                    ),
                    field.name.span,
                    CompileErrorKind::UnknownField {
                        type_name: scope_type.to_string(),
                        field: field.name.value.clone(),
                    },
                ));
            };
            let arguments = coerce_arguments(self.graph, definition, field, self.variables)?;
            (definition.ty.clone(), arguments)
        };

        let response_key = field.response_key().to_string();
        let entry = groups.entry(response_key.clone()).or_default();

        // Find every existing group this candidate can coexist with at
        // runtime. Overlapping groups must agree on field name and
        // argument values, and collapse into one merged group so that
        // at most one group per response key applies to any runtime
        // type.
        let mut overlapping: Vec<usize> = Vec::new();
        for (i, group) in entry.iter().enumerate() {
            if conditions_overlap(&group.applies_to, &condition) {
                overlapping.push(i);
            }
        }

        for &i in &overlapping {
            let group = &entry[i];
            if group.field_name != field.name.value || group.arguments != arguments {
                let error = CompileError::at(
                    format!(
                        "fields for response key `{response_key}` conflict: they must have the \
                         same field name and argument values to be merged"
                    ),
                    field.span,
                    CompileErrorKind::FieldMergeConflict {
                        response_key: response_key.clone(),
                    },
                );
                return Err(error_with_first_location(error, group.locations.first()));
            }
        }

        match overlapping.first().copied() {
            None => {
                entry.push(FieldGroup {
                    response_key,
                    field_name: field.name.value.clone(),
                    parent_type: scope_type.to_string(),
                    field_type,
                    arguments,
                    applies_to: condition,
                    ast_fields: vec![field],
                    locations: vec![field.span],
                });
            }
            Some(first) => {
                // Fold the candidate and any later overlapping groups
                // into the first one.
                let mut merged_condition = union_conditions(entry[first].applies_to.take(), condition);
                for &i in overlapping.iter().skip(1).rev() {
                    let folded = entry.remove(i);
                    merged_condition = union_conditions(merged_condition, folded.applies_to);
                    entry[first].ast_fields.extend(folded.ast_fields);
                    entry[first].locations.extend(folded.locations);
                }
                let group = &mut entry[first];
                group.applies_to = merged_condition;
                group.ast_fields.push(field);
                group.locations.push(field.span);
            }
        }

        Ok(())
    }

    /// Emits compiled fields from the collected groups, recursing into
    /// merged child selection sets.
    fn emit(
        &mut self,
        groups: IndexMap<String, Vec<FieldGroup<'a>>>,
    ) -> Result<Vec<CompiledField>, CompileError> {
        let mut compiled = Vec::new();

        for (_, entry) in groups {
            for group in entry {
                let index = self.next_index;
                self.next_index += 1;

                let named_type = group.field_type.named_type().to_string();
                let is_composite = self.graph.is_composite(&named_type);
                let has_subselections = group
                    .ast_fields
                    .iter()
                    .any(|f| f.selection_set.is_some());

                let children = if is_composite {
                    if !has_subselections {
                        return Err(CompileError::at(
                            format!(
                                "field `{}` of type `{}` must have a selection of subfields",
                                group.field_name, group.field_type
                            ),
                            group.locations[0],
                            CompileErrorKind::InvalidSelection,
                        ));
                    }
                    // Merge the children of every AST node merged into
                    // this selection (union of child selections).
                    let mut child_groups: IndexMap<String, Vec<FieldGroup<'a>>> = IndexMap::new();
                    for ast_field in &group.ast_fields {
                        if let Some(selection_set) = &ast_field.selection_set {
                            self.collect_into(
                                &named_type,
                                &named_type,
                                None,
                                selection_set,
                                &mut child_groups,
                            )?;
                        }
                    }
                    self.emit(child_groups)?
                } else {
                    if has_subselections && group.field_name != "__typename" {
                        return Err(CompileError::at(
                            format!(
                                "field `{}` of leaf type `{}` cannot have a selection set",
                                group.field_name, group.field_type
                            ),
                            group.locations[0],
                            CompileErrorKind::InvalidSelection,
                        ));
                    }
                    if has_subselections {
                        return Err(CompileError::at(
                            "`__typename` cannot have a selection set",
                            group.locations[0],
                            CompileErrorKind::InvalidSelection,
                        ));
                    }
                    Vec::new()
                };

                compiled.push(CompiledField {
                    index,
                    response_key: group.response_key,
                    field_name: group.field_name,
                    parent_type: group.parent_type,
                    field_type: group.field_type,
                    arguments: group.arguments,
                    applies_to: group.applies_to,
                    locations: group.locations,
                    children,
                });
            }
        }

        Ok(compiled)
    }

    /// Intersects the current condition with a fragment's type
    /// condition. Returns `Ok(None)` when the fragment can never apply,
    /// `Ok(Some(condition))` otherwise.
    fn narrow_condition(
        &self,
        set_type: &str,
        current: &Condition,
        condition_type: &ast::Name,
    ) -> Result<Option<Condition>, CompileError> {
        if self.graph.type_definition(&condition_type.value).is_none() {
            return Err(CompileError::at(
                format!("unknown type `{}` in type condition", condition_type.value),
                condition_type.span,
                CompileErrorKind::UnknownType {
                    name: condition_type.value.clone(),
                },
            ));
        }
        let Some(condition_possible) = self.graph.possible_types(&condition_type.value) else {
            return Err(CompileError::at(
                format!(
                    "type condition `{}` must name a composite type",
                    condition_type.value
                ),
                condition_type.span,
                CompileErrorKind::InvalidSelection,
            ));
        };
        let Some(set_possible) = self.graph.possible_types(set_type) else {
            return Err(CompileError::new(
                format!("type `{set_type}` is not a composite type"),
                CompileErrorKind::InvalidSelection,
            ));
        };

        let current_possible = match current {
            None => &set_possible,
            Some(types) => types,
        };
        let effective: BTreeSet<String> = current_possible
            .intersection(&condition_possible)
            .cloned()
            .collect();

        if effective.is_empty() {
            return Ok(None);
        }
        // A condition covering every runtime type of the set is no
        // condition at all.
        if effective == set_possible {
            return Ok(Some(None));
        }
        Ok(Some(Some(effective)))
    }

    /// Evaluates `@skip(if:)` / `@include(if:)` against the coerced
    /// variable values. Returns `false` when the selection is to be
    /// dropped. Other directives are ignored here.
    fn evaluate_inclusion(&self, directives: &[ast::Directive]) -> Result<bool, CompileError> {
        for directive in directives {
            let skip = match directive.name.value.as_str() {
                "skip" => true,
                "include" => false,
                _ => continue,
            };
            let condition = self.directive_if_argument(directive)?;
            if skip == condition {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Extracts the boolean `if:` argument of a `@skip`/`@include`
    /// directive, resolving a variable reference if needed.
    fn directive_if_argument(&self, directive: &ast::Directive) -> Result<bool, CompileError> {
        let name = &directive.name.value;
        let Some(argument) = directive.argument("if") else {
            return Err(CompileError::at(
                format!("directive `@{name}` requires an `if` argument"),
                directive.span,
                CompileErrorKind::InvalidDirective {
                    directive: name.clone(),
                },
            ));
        };
        match &argument.value {
            ast::Value::Boolean(boolean) => Ok(boolean.value),
            ast::Value::Variable(variable) => {
                match self.variables.get(&variable.name.value) {
                    Some(Json::Bool(value)) => Ok(*value),
                    _ => Err(CompileError::at(
                        format!(
                            "directive `@{name}` expects a Boolean for `if`, but `${}` is not one",
                            variable.name.value
                        ),
                        variable.span,
                        CompileErrorKind::InvalidDirective {
                            directive: name.clone(),
                        },
                    )),
                }
            }
            other => Err(CompileError::at(
                format!("directive `@{name}` expects a Boolean value for `if`"),
                *other.span(),
                CompileErrorKind::InvalidDirective {
                    directive: name.clone(),
                },
            )),
        }
    }
}

/// Two conditions overlap when some runtime type satisfies both.
fn conditions_overlap(a: &Condition, b: &Condition) -> bool {
    match (a, b) {
        (None, _) | (_, None) => true,
        (Some(a), Some(b)) => !a.is_disjoint(b),
    }
}

/// The union of two conditions; `None` (unconditional) absorbs
/// everything.
fn union_conditions(a: Condition, b: Condition) -> Condition {
    match (a, b) {
        (None, _) | (_, None) => None,
        (Some(mut a), Some(b)) => {
            a.extend(b);
            Some(a)
        }
    }
}

/// Adds the first merged location of the conflicting group to a merge
/// conflict error, so both sites are reported.
fn error_with_first_location(
    error: CompileError,
    first_location: Option<&SourceSpan>,
) -> CompileError {
    match first_location {
        Some(span) => error.also_at(*span),
        None => error,
    }
}
