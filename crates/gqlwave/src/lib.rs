pub use gqlwave_engine::*;

/// Lexing and parsing of executable GraphQL documents (tokens, the
/// AST, source spans, and the canonical printer).
pub mod parser {
    pub use gqlwave_parser::*;
}
