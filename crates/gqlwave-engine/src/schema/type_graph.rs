use crate::Json;
use crate::schema::TypeRef;
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// The names of the built-in scalar types, always present in a graph.
const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

/// An immutable graph of named types.
///
/// The compiler reads field and argument definitions from the graph and
/// never mutates it; every type reference a compiled operation carries
/// is checked against the graph at compile time.
#[derive(Clone, Debug)]
pub struct TypeGraph {
    types: IndexMap<String, TypeDefinition>,
    query_type: String,
    mutation_type: Option<String>,
}

impl TypeGraph {
    /// Creates a graph with the given root query type name. The
    /// built-in scalars are inserted automatically.
    pub fn new(query_type: impl Into<String>) -> Self {
        let mut types = IndexMap::new();
        for name in BUILTIN_SCALARS {
            types.insert(name.to_string(), TypeDefinition::Scalar(ScalarType::new(name)));
        }
        Self {
            types,
            query_type: query_type.into(),
            mutation_type: None,
        }
    }

    /// Sets the root mutation type name.
    pub fn with_mutation_type(mut self, name: impl Into<String>) -> Self {
        self.mutation_type = Some(name.into());
        self
    }

    /// Inserts a type definition, replacing any previous definition
    /// with the same name.
    pub fn insert(mut self, definition: TypeDefinition) -> Self {
        self.types.insert(definition.name().to_string(), definition);
        self
    }

    /// Returns the root query type name.
    pub fn query_type(&self) -> &str {
        &self.query_type
    }

    /// Returns the root mutation type name, if one is configured.
    pub fn mutation_type(&self) -> Option<&str> {
        self.mutation_type.as_deref()
    }

    /// Looks up a type definition by name.
    pub fn type_definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    /// Looks up a field definition on a composite type.
    pub fn field(&self, type_name: &str, field_name: &str) -> Option<&FieldDefinition> {
        match self.types.get(type_name)? {
            TypeDefinition::Object(object) => object.field(field_name),
            TypeDefinition::Interface(interface) => interface.field(field_name),
            _ => None,
        }
    }

    /// Returns the set of object type names a composite type can
    /// resolve to at runtime: the type itself for objects, the
    /// registered possible types for interfaces and unions. `None` for
    /// non-composite types.
    pub fn possible_types(&self, name: &str) -> Option<BTreeSet<String>> {
        match self.types.get(name)? {
            TypeDefinition::Object(object) => {
                let mut set = BTreeSet::new();
                set.insert(object.name.clone());
                Some(set)
            }
            TypeDefinition::Interface(interface) => {
                Some(interface.possible_types.iter().cloned().collect())
            }
            TypeDefinition::Union(union) => Some(union.possible_types.iter().cloned().collect()),
            _ => None,
        }
    }

    /// Returns `true` if `name` refers to a composite (selectable)
    /// type: object, interface, or union.
    pub fn is_composite(&self, name: &str) -> bool {
        matches!(
            self.types.get(name),
            Some(
                TypeDefinition::Object(_)
                    | TypeDefinition::Interface(_)
                    | TypeDefinition::Union(_)
            )
        )
    }

    /// Returns `true` if `name` refers to an input type: scalar, enum,
    /// or input object.
    pub fn is_input_type(&self, name: &str) -> bool {
        matches!(
            self.types.get(name),
            Some(
                TypeDefinition::Scalar(_)
                    | TypeDefinition::Enum(_)
                    | TypeDefinition::InputObject(_)
            )
        )
    }
}

/// A single named type in the graph.
#[derive(Clone, Debug)]
pub enum TypeDefinition {
    Scalar(ScalarType),
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Enum(EnumType),
    InputObject(InputObjectType),
}

impl TypeDefinition {
    /// Returns the type's name.
    pub fn name(&self) -> &str {
        match self {
            TypeDefinition::Scalar(t) => &t.name,
            TypeDefinition::Object(t) => &t.name,
            TypeDefinition::Interface(t) => &t.name,
            TypeDefinition::Union(t) => &t.name,
            TypeDefinition::Enum(t) => &t.name,
            TypeDefinition::InputObject(t) => &t.name,
        }
    }
}

/// A scalar type. Built-in scalars get dedicated coercion; custom
/// scalars pass values through unchecked.
#[derive(Clone, Debug)]
pub struct ScalarType {
    pub name: String,
}

impl ScalarType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// An object type with ordered fields.
#[derive(Clone, Debug)]
pub struct ObjectType {
    pub name: String,
    pub fields: IndexMap<String, FieldDefinition>,
    /// Names of the interfaces this object implements.
    pub interfaces: Vec<String>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
            interfaces: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn with_interface(mut self, name: impl Into<String>) -> Self {
        self.interfaces.push(name.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }
}

/// An interface type: shared fields plus the object types implementing
/// it.
#[derive(Clone, Debug)]
pub struct InterfaceType {
    pub name: String,
    pub fields: IndexMap<String, FieldDefinition>,
    pub possible_types: Vec<String>,
}

impl InterfaceType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
            possible_types: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn with_possible_type(mut self, name: impl Into<String>) -> Self {
        self.possible_types.push(name.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }
}

/// A union type over a set of object types.
#[derive(Clone, Debug)]
pub struct UnionType {
    pub name: String,
    pub possible_types: Vec<String>,
}

impl UnionType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            possible_types: Vec::new(),
        }
    }

    pub fn with_possible_type(mut self, name: impl Into<String>) -> Self {
        self.possible_types.push(name.into());
        self
    }
}

/// An enum type with its allowed values.
#[derive(Clone, Debug)]
pub struct EnumType {
    pub name: String,
    pub values: Vec<String>,
}

impl EnumType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.values.push(value.into());
        self
    }

    /// Returns `true` if `value` is one of this enum's values.
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

/// An input object type with ordered input fields.
#[derive(Clone, Debug)]
pub struct InputObjectType {
    pub name: String,
    pub fields: IndexMap<String, InputValueDefinition>,
}

impl InputObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    pub fn with_field(mut self, field: InputValueDefinition) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&InputValueDefinition> {
        self.fields.get(name)
    }
}

/// A field definition on an object or interface type.
#[derive(Clone, Debug)]
pub struct FieldDefinition {
    pub name: String,
    pub arguments: IndexMap<String, InputValueDefinition>,
    pub ty: TypeRef,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            arguments: IndexMap::new(),
            ty,
        }
    }

    pub fn with_argument(mut self, argument: InputValueDefinition) -> Self {
        self.arguments.insert(argument.name.clone(), argument);
        self
    }

    pub fn argument(&self, name: &str) -> Option<&InputValueDefinition> {
        self.arguments.get(name)
    }
}

/// An argument or input-field definition.
#[derive(Clone, Debug)]
pub struct InputValueDefinition {
    pub name: String,
    pub ty: TypeRef,
    pub default_value: Option<Json>,
}

impl InputValueDefinition {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            default_value: None,
        }
    }

    pub fn with_default(mut self, default_value: Json) -> Self {
        self.default_value = Some(default_value);
        self
    }
}
