//! Shared test fixtures: a small social-graph schema and helpers for
//! compiling documents against it.

use crate::JsonMap;
use crate::compile::CompileError;
use crate::compile::CompiledOperation;
use crate::compile::compile;
use crate::schema::EnumType;
use crate::schema::FieldDefinition;
use crate::schema::InputObjectType;
use crate::schema::InputValueDefinition;
use crate::schema::InterfaceType;
use crate::schema::ObjectType;
use crate::schema::TypeDefinition;
use crate::schema::TypeGraph;
use crate::schema::TypeRef;
use gqlwave_parser::ast;
use serde_json::json;

/// Builds the test type graph:
///
/// ```graphql
/// type Query {
///   hello: String!
///   viewer: Viewer
///   user(id: ID!): User
///   users(filter: UserFilter): [User!]!
///   node: Node
/// }
/// type Mutation { bump: Int! }
/// type Viewer { user: User!  name: String }
/// interface Node { id: ID! }
/// type User implements Node { id: ID!  name: String!  role: Role
///   friends: [User!] }
/// type Post implements Node { id: ID!  title: String! }
/// enum Role { ADMIN  MEMBER }
/// input UserFilter { nameContains: String  limit: Int! = 10 }
/// ```
pub fn test_graph() -> TypeGraph {
    TypeGraph::new("Query")
        .with_mutation_type("Mutation")
        .insert(TypeDefinition::Object(
            ObjectType::new("Query")
                .with_field(FieldDefinition::new("hello", TypeRef::named_non_null("String")))
                .with_field(FieldDefinition::new("viewer", TypeRef::named("Viewer")))
                .with_field(
                    FieldDefinition::new("user", TypeRef::named("User")).with_argument(
                        InputValueDefinition::new("id", TypeRef::named_non_null("ID")),
                    ),
                )
                .with_field(
                    FieldDefinition::new(
                        "users",
                        TypeRef::non_null(TypeRef::list(TypeRef::named_non_null("User"))),
                    )
                    .with_argument(InputValueDefinition::new(
                        "filter",
                        TypeRef::named("UserFilter"),
                    )),
                )
                .with_field(FieldDefinition::new("node", TypeRef::named("Node"))),
        ))
        .insert(TypeDefinition::Object(
            ObjectType::new("Mutation")
                .with_field(FieldDefinition::new("bump", TypeRef::named_non_null("Int"))),
        ))
        .insert(TypeDefinition::Object(
            ObjectType::new("Viewer")
                .with_field(FieldDefinition::new("user", TypeRef::named_non_null("User")))
                .with_field(FieldDefinition::new("name", TypeRef::named("String"))),
        ))
        .insert(TypeDefinition::Interface(
            InterfaceType::new("Node")
                .with_field(FieldDefinition::new("id", TypeRef::named_non_null("ID")))
                .with_possible_type("User")
                .with_possible_type("Post"),
        ))
        .insert(TypeDefinition::Object(
            ObjectType::new("User")
                .with_interface("Node")
                .with_field(FieldDefinition::new("id", TypeRef::named_non_null("ID")))
                .with_field(FieldDefinition::new("name", TypeRef::named_non_null("String")))
                .with_field(FieldDefinition::new("role", TypeRef::named("Role")))
                .with_field(FieldDefinition::new(
                    "friends",
                    TypeRef::list(TypeRef::named_non_null("User")),
                )),
        ))
        .insert(TypeDefinition::Object(
            ObjectType::new("Post")
                .with_interface("Node")
                .with_field(FieldDefinition::new("id", TypeRef::named_non_null("ID")))
                .with_field(FieldDefinition::new("title", TypeRef::named_non_null("String"))),
        ))
        .insert(TypeDefinition::Enum(
            EnumType::new("Role").with_value("ADMIN").with_value("MEMBER"),
        ))
        .insert(TypeDefinition::InputObject(
            InputObjectType::new("UserFilter")
                .with_field(InputValueDefinition::new(
                    "nameContains",
                    TypeRef::named("String"),
                ))
                .with_field(
                    InputValueDefinition::new("limit", TypeRef::named_non_null("Int"))
                        .with_default(json!(10)),
                ),
        ))
}

/// Parses a document, panicking on syntax errors.
pub fn parse(source: &str) -> ast::Document {
    gqlwave_parser::parse_document(source)
        .into_valid_ast()
        .expect("test document should parse")
}

/// Compiles a document against the test graph with no variables.
pub fn compile_simple(source: &str) -> Result<CompiledOperation, CompileError> {
    let document = parse(source);
    compile(&document, &test_graph(), None, &JsonMap::new())
}

/// Compiles a document against the test graph with raw variables.
pub fn compile_with_variables(
    source: &str,
    variables: serde_json::Value,
) -> Result<CompiledOperation, CompileError> {
    let document = parse(source);
    let variables = variables
        .as_object()
        .expect("variables fixture must be an object")
        .clone();
    compile(&document, &test_graph(), None, &variables)
}
