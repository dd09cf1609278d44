use crate::SourceSpan;

/// A GraphQL name (identifier).
///
/// Names are used for field names, aliases, argument names, directive
/// names, enum values, fragment names, and variable names.
#[derive(Clone, Debug, PartialEq)]
pub struct Name {
    pub span: SourceSpan,
    pub value: String,
}

impl Name {
    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

/// A named argument (`name: value`) on a field or directive.
#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    pub span: SourceSpan,
    pub name: Name,
    pub value: Value,
}

/// A directive annotation (`@name(args)`).
#[derive(Clone, Debug, PartialEq)]
pub struct Directive {
    pub span: SourceSpan,
    pub name: Name,
    pub arguments: Vec<Argument>,
}

impl Directive {
    /// Looks up an argument by name.
    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|arg| arg.name.value == name)
    }
}

/// A GraphQL input value literal or variable reference.
///
/// Represents every value production in the grammar. Numeric and string
/// literals are stored in parsed form; raw source text is recoverable
/// from the span.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Boolean(BooleanValue),
    Enum(EnumValue),
    Float(FloatValue),
    Int(IntValue),
    List(ListValue),
    Null(NullValue),
    Object(ObjectValue),
    String(StringValue),
    Variable(VariableValue),
}

impl Value {
    /// Returns this value's source span.
    pub fn span(&self) -> &SourceSpan {
        match self {
            Value::Boolean(v) => &v.span,
            Value::Enum(v) => &v.span,
            Value::Float(v) => &v.span,
            Value::Int(v) => &v.span,
            Value::List(v) => &v.span,
            Value::Null(v) => &v.span,
            Value::Object(v) => &v.span,
            Value::String(v) => &v.span,
            Value::Variable(v) => &v.span,
        }
    }

    /// Returns `true` if this value is or contains a variable reference.
    pub fn references_variables(&self) -> bool {
        match self {
            Value::Variable(_) => true,
            Value::List(list) => list.items.iter().any(Value::references_variables),
            Value::Object(object) => object
                .fields
                .iter()
                .any(|field| field.value.references_variables()),
            Value::Boolean(_)
            | Value::Enum(_)
            | Value::Float(_)
            | Value::Int(_)
            | Value::Null(_)
            | Value::String(_) => false,
        }
    }
}

/// A `true` or `false` literal.
#[derive(Clone, Debug, PartialEq)]
pub struct BooleanValue {
    pub span: SourceSpan,
    pub value: bool,
}

/// An enum value literal (a bare name that is not `true`/`false`/`null`).
#[derive(Clone, Debug, PartialEq)]
pub struct EnumValue {
    pub span: SourceSpan,
    pub value: String,
}

/// A float literal.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatValue {
    pub span: SourceSpan,
    pub value: f64,
}

/// An integer literal.
#[derive(Clone, Debug, PartialEq)]
pub struct IntValue {
    pub span: SourceSpan,
    pub value: i64,
}

/// A list literal (`[a, b, c]`).
#[derive(Clone, Debug, PartialEq)]
pub struct ListValue {
    pub span: SourceSpan,
    pub items: Vec<Value>,
}

/// The `null` literal.
#[derive(Clone, Debug, PartialEq)]
pub struct NullValue {
    pub span: SourceSpan,
}

/// An input object literal (`{ field: value }`).
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectValue {
    pub span: SourceSpan,
    pub fields: Vec<ObjectField>,
}

/// A single `name: value` entry in an input object literal.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectField {
    pub span: SourceSpan,
    pub name: Name,
    pub value: Value,
}

/// A string literal (single-line or block), stored unescaped.
#[derive(Clone, Debug, PartialEq)]
pub struct StringValue {
    pub span: SourceSpan,
    pub value: String,
    /// Whether this was written as a block string (`"""..."""`).
    pub block: bool,
}

/// A variable reference (`$name`).
#[derive(Clone, Debug, PartialEq)]
pub struct VariableValue {
    pub span: SourceSpan,
    pub name: Name,
}
