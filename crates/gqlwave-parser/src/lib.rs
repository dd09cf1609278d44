//! Lexing and parsing for executable GraphQL documents.
//!
//! This crate turns UTF-8 query text into an immutable, owned AST:
//!
//! ```text
//! &str -> Lexer -> Token stream -> Parser -> ast::Document
//! ```
//!
//! The lexer is a single-pass, zero-copy byte scanner that attaches
//! comments and commas to tokens as trivia. The parser is a
//! one-token-lookahead recursive descent parser that records multiple
//! [`ParseError`]s with source spans and recovers at definition
//! boundaries, returning a [`ParseResult`].
//!
//! Only the executable subset of the GraphQL grammar is supported
//! (operations and fragment definitions); type-system definitions are
//! rejected with a descriptive error.

pub mod ast;
mod error_note;
mod lexer;
mod parse_error;
mod parse_error_kind;
mod parse_result;
mod parser;
mod printer;
mod source_position;
mod source_span;
mod string_value_error;
pub mod token;
mod token_stream;

pub use error_note::ErrorNote;
pub use error_note::ErrorNoteKind;
pub use error_note::ErrorNotes;
pub use lexer::Lexer;
pub use parse_error::ParseError;
pub use parse_error_kind::ParseErrorKind;
pub use parse_result::ParseResult;
pub use parser::Parser;
pub use parser::parse_document;
pub use printer::AstPrint;
pub use printer::print_document;
pub use smallvec::SmallVec;
pub use smallvec::smallvec;
pub use source_position::SourcePosition;
pub use source_span::SourceSpan;
pub use string_value_error::StringValueError;
pub use token_stream::TokenStream;

#[cfg(test)]
mod tests;
