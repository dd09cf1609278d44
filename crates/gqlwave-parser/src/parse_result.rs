//! Result type for parsing operations that may produce partial results.

use crate::ParseError;

/// The result of a parsing operation.
///
/// Unlike `Result<T, E>`, a `ParseResult` can hold both a partial AST
/// and errors. This enables error recovery: the parser reports every
/// error it finds in one pass while still producing as much AST as
/// possible — useful for IDE tooling and batch error reporting. Callers
/// that need guaranteed-valid input (an execution engine) use
/// [`valid_ast()`](Self::valid_ast) / [`into_valid_ast()`](Self::into_valid_ast),
/// which treat any recorded error as fatal.
#[derive(Debug)]
pub struct ParseResult<TAst> {
    /// The parsed AST, possibly produced via error recovery.
    ast: Option<TAst>,

    /// Errors encountered during parsing. Empty on full success.
    pub errors: Vec<ParseError>,
}

impl<TAst> ParseResult<TAst> {
    /// Creates a successful parse result with no errors.
    pub(crate) fn ok(ast: TAst) -> Self {
        Self {
            ast: Some(ast),
            errors: Vec::new(),
        }
    }

    /// Creates a recovered parse result with both an AST and errors.
    pub(crate) fn recovered(ast: Option<TAst>, errors: Vec<ParseError>) -> Self {
        Self { ast, errors }
    }

    /// Returns the AST only if parsing was completely successful.
    pub fn valid_ast(&self) -> Option<&TAst> {
        if self.errors.is_empty() {
            self.ast.as_ref()
        } else {
            None
        }
    }

    /// Returns the AST if present, regardless of errors.
    pub fn ast(&self) -> Option<&TAst> {
        self.ast.as_ref()
    }

    /// Takes ownership of the AST only if parsing was completely
    /// successful.
    pub fn into_valid_ast(self) -> Option<TAst> {
        if self.errors.is_empty() { self.ast } else { None }
    }

    /// Returns `true` if parsing was completely successful.
    pub fn is_ok(&self) -> bool {
        self.ast.is_some() && self.errors.is_empty()
    }

    /// Returns `true` if any errors were recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl<TAst> From<ParseResult<TAst>> for Result<TAst, Vec<ParseError>> {
    /// Converts to a standard `Result`, treating recovered ASTs as
    /// errors.
    fn from(result: ParseResult<TAst>) -> Self {
        if result.errors.is_empty() {
            match result.ast {
                Some(ast) => Ok(ast),
                None => Err(Vec::new()),
            }
        } else {
            Err(result.errors)
        }
    }
}
