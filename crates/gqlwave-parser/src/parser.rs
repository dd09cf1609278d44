//! Recursive descent parser for executable GraphQL documents.
//!
//! Most grammar rules have a corresponding `parse_*` method that returns
//! `Result<AstNode, ()>`, where `Err(())` means an error was recorded
//! and the caller should attempt recovery. Recovery happens at
//! definition boundaries (skip to the next `query` / `mutation` /
//! `fragment` / `{`), which lets a single parse pass report several
//! independent errors.

use crate::ParseError;
use crate::ParseErrorKind;
use crate::ParseResult;
use crate::SourcePosition;
use crate::SourceSpan;
use crate::TokenStream;
use crate::ast;
use crate::token::Token;
use crate::token::TokenKind;
use smallvec::SmallVec;

/// Parses an executable document from source text.
///
/// Convenience wrapper around [`Parser::new`] + [`Parser::parse`].
pub fn parse_document(source: &str) -> ParseResult<ast::Document> {
    Parser::new(source).parse()
}

// =============================================================================
// Delimiter tracking for error recovery
// =============================================================================

/// Context in which a delimiter was opened, for error messages.
#[derive(Clone, Copy, Debug)]
enum DelimiterContext {
    /// `{ field ... }`
    SelectionSet,
    /// `(arg: value)` on a field
    FieldArguments,
    /// `@directive(arg: value)`
    DirectiveArguments,
    /// `($var: Type)`
    VariableDefinitions,
    /// `[value, ...]`
    ListValue,
    /// `{ field: value }`
    ObjectValue,
    /// `[Type]`
    ListType,
}

impl DelimiterContext {
    fn description(&self) -> &'static str {
        match self {
            DelimiterContext::SelectionSet => "selection set",
            DelimiterContext::FieldArguments => "field arguments",
            DelimiterContext::DirectiveArguments => "directive arguments",
            DelimiterContext::VariableDefinitions => "variable definitions",
            DelimiterContext::ListValue => "list value",
            DelimiterContext::ObjectValue => "object value",
            DelimiterContext::ListType => "list type annotation",
        }
    }
}

/// An open delimiter awaiting its closing partner.
#[derive(Clone, Debug)]
struct OpenDelimiter {
    span: SourceSpan,
    context: DelimiterContext,
}

/// Context for value parsing, determining whether variable references
/// are allowed and, when they are not, what to call the context in
/// error messages.
#[derive(Clone, Copy, Debug)]
enum ConstContext {
    /// Variables are allowed (field/directive arguments in operations).
    AllowVariables,
    /// Parsing a default value for a variable definition.
    VariableDefaultValue,
}

// =============================================================================
// Parser
// =============================================================================

/// A recursive descent parser for executable GraphQL documents.
///
/// # Usage
///
/// ```
/// use gqlwave_parser::Parser;
///
/// let result = Parser::new("{ user { name } }").parse();
/// assert!(result.is_ok());
/// ```
pub struct Parser<'src> {
    /// The underlying token stream with lookahead support.
    token_stream: TokenStream<'src>,

    /// Accumulated parse errors.
    errors: Vec<ParseError>,

    /// Stack of open delimiters for error recovery. Inline-allocated:
    /// real documents rarely nest more than 8 delimiters deep.
    delimiter_stack: SmallVec<[OpenDelimiter; 8]>,

    /// Shared recursion depth counter for nested values, selection
    /// sets, and type annotations. Prevents stack overflow on
    /// adversarial inputs like `[[[[...`.
    recursion_depth: usize,

    /// End position of the most recently consumed token; anchors EOF
    /// errors and node end positions.
    last_end_position: Option<SourcePosition>,
}

impl<'src> Parser<'src> {
    /// Maximum nesting depth for recursive parsing. Far beyond any
    /// realistic document while staying safe in debug builds.
    const MAX_RECURSION_DEPTH: usize = 64;

    /// Creates a new parser over source text.
    pub fn new<S: AsRef<str> + ?Sized>(source: &'src S) -> Self {
        Self {
            token_stream: TokenStream::new(source.as_ref()),
            errors: Vec::new(),
            delimiter_stack: SmallVec::new(),
            recursion_depth: 0,
            last_end_position: None,
        }
    }

    /// Parses an executable document.
    pub fn parse(mut self) -> ParseResult<ast::Document> {
        let start = SourcePosition::new(0, 0, 0);
        let mut definitions = Vec::new();

        loop {
            if self.token_stream.is_at_end() {
                break;
            }
            match self.parse_definition() {
                Ok(definition) => definitions.push(definition),
                Err(()) => self.recover_to_next_definition(),
            }
        }

        if definitions.is_empty() && self.errors.is_empty() {
            self.record_error(ParseError::new(
                "document must contain at least one definition",
                self.eof_span(),
                ParseErrorKind::InvalidEmptyConstruct {
                    construct: "document".to_string(),
                },
            ));
        }

        let document = ast::Document {
            span: self.span_from(start),
            definitions,
        };

        if self.errors.is_empty() {
            ParseResult::ok(document)
        } else {
            ParseResult::recovered(Some(document), self.errors)
        }
    }

    // =========================================================================
    // Error recording and recovery
    // =========================================================================

    /// Records a parse error.
    fn record_error(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    fn push_delimiter(&mut self, span: SourceSpan, context: DelimiterContext) {
        self.delimiter_stack.push(OpenDelimiter { span, context });
    }

    fn pop_delimiter(&mut self) -> Option<OpenDelimiter> {
        self.delimiter_stack.pop()
    }

    /// Skips tokens until something that can start a definition:
    /// `query`, `mutation`, `subscription`, `fragment`, or `{`.
    fn recover_to_next_definition(&mut self) {
        loop {
            let stop = match self.token_stream.peek() {
                None => true,
                Some(token) => match &token.kind {
                    TokenKind::Eof | TokenKind::CurlyBraceOpen => true,
                    TokenKind::Name(name) => {
                        matches!(name.as_ref(), "query" | "mutation" | "subscription" | "fragment")
                    }
                    _ => false,
                },
            };
            if stop {
                break;
            }
            self.consume_token();
        }
        // Whatever was open is abandoned.
        self.delimiter_stack.clear();
    }

    /// Skips tokens to find a recovery point within a selection set:
    /// the closing brace or the start of another selection.
    fn skip_to_selection_recovery_point(&mut self) {
        loop {
            match self.token_stream.peek() {
                None => break,
                Some(token) => match &token.kind {
                    TokenKind::CurlyBraceClose | TokenKind::Eof => break,
                    TokenKind::Ellipsis
                    | TokenKind::Name(_)
                    | TokenKind::True
                    | TokenKind::False
                    | TokenKind::Null => break,
                    _ => {
                        self.consume_token();
                    }
                },
            }
        }
    }

    /// Checks recursion depth; on success the caller owes a matching
    /// `exit_recursion()`.
    fn enter_recursion(&mut self) -> Result<(), ()> {
        self.recursion_depth += 1;
        if self.recursion_depth > Self::MAX_RECURSION_DEPTH {
            let span = self.peek_span();
            self.consume_token();
            self.record_error(ParseError::new(
                "maximum nesting depth exceeded",
                span,
                ParseErrorKind::InvalidSyntax,
            ));
            self.recursion_depth -= 1;
            return Err(());
        }
        Ok(())
    }

    fn exit_recursion(&mut self) {
        self.recursion_depth -= 1;
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    /// Consumes the next token, tracking its end position for EOF error
    /// reporting and node span building.
    fn consume_token(&mut self) -> Option<Token<'src>> {
        let token = self.token_stream.consume();
        if let Some(ref t) = token {
            self.last_end_position = Some(t.span.end_exclusive);
        }
        token
    }

    /// Returns a span for EOF errors, anchored to the end of the last
    /// consumed token.
    fn eof_span(&self) -> SourceSpan {
        match self.last_end_position {
            Some(pos) => SourceSpan::empty(pos),
            None => SourceSpan::empty(SourcePosition::new(0, 0, 0)),
        }
    }

    /// Returns the next token's span, or the EOF span.
    fn peek_span(&mut self) -> SourceSpan {
        match self.token_stream.peek() {
            Some(token) => token.span,
            None => self.eof_span(),
        }
    }

    /// Builds a node span from a start position to the end of the last
    /// consumed token.
    fn span_from(&self, start: SourcePosition) -> SourceSpan {
        SourceSpan::new(start, self.last_end_position.unwrap_or(start))
    }

    /// Returns a human-readable display string for a token kind.
    fn token_kind_display(kind: &TokenKind) -> String {
        if let Some(punctuator) = kind.as_punctuator_str() {
            return punctuator.to_string();
        }
        match kind {
            TokenKind::Name(s) => s.to_string(),
            TokenKind::IntValue(s) => s.to_string(),
            TokenKind::FloatValue(s) => s.to_string(),
            TokenKind::StringValue(_) => "string".to_string(),
            TokenKind::True => "true".to_string(),
            TokenKind::False => "false".to_string(),
            TokenKind::Null => "null".to_string(),
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Error { message, .. } => format!("tokenization error: {message}"),
            _ => unreachable!("punctuators handled above"),
        }
    }

    /// Compares token kinds by variant, ignoring payloads.
    fn token_kinds_match(actual: &TokenKind, expected: &TokenKind) -> bool {
        std::mem::discriminant(actual) == std::mem::discriminant(expected)
    }

    /// Records a `ParseError` for a lexer error token.
    fn handle_lexer_error(&mut self, token: &Token<'src>) {
        if let TokenKind::Error { message, notes } = &token.kind {
            self.record_error(ParseError::from_lexer_error(
                message.clone(),
                token.span,
                notes.clone(),
            ));
        }
    }

    /// Checks whether the next token matches a kind without consuming.
    fn peek_is(&mut self, kind: &TokenKind) -> bool {
        match self.token_stream.peek() {
            Some(token) => Self::token_kinds_match(&token.kind, kind),
            None => false,
        }
    }

    /// Checks whether the next token is a specific keyword (a `Name`
    /// token with specific text). Does not match `True`/`False`/`Null`
    /// tokens: those are literals, not structural keywords.
    fn peek_is_keyword(&mut self, keyword: &str) -> bool {
        match self.token_stream.peek() {
            Some(token) => {
                matches!(&token.kind, TokenKind::Name(name) if name.as_ref() == keyword)
            }
            None => false,
        }
    }

    /// Expects a token of the given kind; on mismatch records an error
    /// and does NOT consume the offending token.
    fn expect(&mut self, kind: &TokenKind) -> Result<Token<'src>, ()> {
        let expected_display = kind
            .as_punctuator_str()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{kind:?}"));

        let mismatch = match self.token_stream.peek() {
            None => {
                let span = self.eof_span();
                self.record_error(ParseError::new(
                    format!("expected `{expected_display}`, found end of input"),
                    span,
                    ParseErrorKind::UnexpectedEof {
                        expected: vec![expected_display],
                    },
                ));
                return Err(());
            }
            Some(token) => {
                if token.kind.is_error() {
                    let token = token.clone();
                    self.handle_lexer_error(&token);
                    self.consume_token();
                    return Err(());
                }
                if Self::token_kinds_match(&token.kind, kind) {
                    None
                } else {
                    Some((token.span, Self::token_kind_display(&token.kind)))
                }
            }
        };

        if let Some((span, found)) = mismatch {
            self.record_error(ParseError::new(
                format!("expected `{expected_display}`, found `{found}`"),
                span,
                ParseErrorKind::UnexpectedToken {
                    expected: vec![expected_display],
                    found,
                },
            ));
            return Err(());
        }

        Ok(self.consume_token().unwrap())
    }

    /// Expects a name token and returns it as an [`ast::Name`].
    ///
    /// Per the grammar, `true`, `false`, and `null` are valid names in
    /// most contexts even though the lexer emits them as distinct
    /// kinds; this method accepts them.
    fn expect_name(&mut self) -> Result<ast::Name, ()> {
        let mismatch = match self.token_stream.peek() {
            None => {
                let span = self.eof_span();
                self.record_error(ParseError::new(
                    "expected name, found end of input",
                    span,
                    ParseErrorKind::UnexpectedEof {
                        expected: vec!["name".to_string()],
                    },
                ));
                return Err(());
            }
            Some(token) => match &token.kind {
                TokenKind::Name(_) | TokenKind::True | TokenKind::False | TokenKind::Null => None,
                TokenKind::Error { .. } => {
                    let token = token.clone();
                    self.handle_lexer_error(&token);
                    self.consume_token();
                    return Err(());
                }
                _ => Some((token.span, Self::token_kind_display(&token.kind))),
            },
        };

        if let Some((span, found)) = mismatch {
            self.record_error(ParseError::new(
                format!("expected name, found `{found}`"),
                span,
                ParseErrorKind::UnexpectedToken {
                    expected: vec!["name".to_string()],
                    found,
                },
            ));
            return Err(());
        }

        let token = self.consume_token().unwrap();
        let value = match token.kind {
            TokenKind::Name(s) => s.into_owned(),
            TokenKind::True => "true".to_string(),
            TokenKind::False => "false".to_string(),
            TokenKind::Null => "null".to_string(),
            _ => unreachable!(),
        };
        Ok(ast::Name {
            span: token.span,
            value,
        })
    }

    /// Expects a specific structural keyword and returns its span.
    fn expect_keyword(&mut self, keyword: &str) -> Result<SourceSpan, ()> {
        if self.peek_is_keyword(keyword) {
            return Ok(self.consume_token().unwrap().span);
        }
        let span = self.peek_span();
        let found = self
            .token_stream
            .peek()
            .map(|t| Self::token_kind_display(&t.kind))
            .unwrap_or_else(|| "end of input".to_string());
        self.record_error(ParseError::new(
            format!("expected `{keyword}`, found `{found}`"),
            span,
            ParseErrorKind::UnexpectedToken {
                expected: vec![keyword.to_string()],
                found,
            },
        ));
        Err(())
    }

    // =========================================================================
    // Definitions
    // =========================================================================

    /// Parses one definition.
    fn parse_definition(&mut self) -> Result<ast::Definition, ()> {
        // Shorthand query: a bare selection set.
        if self.peek_is(&TokenKind::CurlyBraceOpen) {
            let start = self.peek_span().start_inclusive;
            let selection_set = self.parse_selection_set()?;
            return Ok(ast::Definition::Operation(ast::OperationDefinition {
                span: self.span_from(start),
                kind: ast::OperationKind::Query,
                name: None,
                variable_definitions: Vec::new(),
                directives: Vec::new(),
                selection_set,
            }));
        }

        if self.peek_is_keyword("query")
            || self.peek_is_keyword("mutation")
            || self.peek_is_keyword("subscription")
        {
            return self
                .parse_operation_definition()
                .map(ast::Definition::Operation);
        }

        if self.peek_is_keyword("fragment") {
            return self
                .parse_fragment_definition()
                .map(ast::Definition::Fragment);
        }

        // Type-system definitions get a dedicated error so that pasting
        // a schema into a query endpoint produces a useful message.
        for keyword in [
            "type",
            "interface",
            "union",
            "enum",
            "scalar",
            "input",
            "directive",
            "schema",
            "extend",
        ] {
            if self.peek_is_keyword(keyword) {
                let span = self.peek_span();
                let mut error = ParseError::new(
                    format!("`{keyword}` definitions are not executable"),
                    span,
                    ParseErrorKind::NotExecutable,
                );
                error.add_help(
                    "executable documents may only contain operations and fragment definitions",
                );
                self.record_error(error);
                return Err(());
            }
        }

        // Lexer errors surface here for tokens that can't start anything.
        if let Some(token) = self.token_stream.peek()
            && token.kind.is_error()
        {
            let token = token.clone();
            self.handle_lexer_error(&token);
            self.consume_token();
            return Err(());
        }

        let span = self.peek_span();
        let found = self
            .token_stream
            .peek()
            .map(|t| Self::token_kind_display(&t.kind))
            .unwrap_or_else(|| "end of input".to_string());
        self.record_error(ParseError::new(
            format!(
                "expected an operation (`query`, `mutation`, `subscription`, or `{{`) or a \
                 fragment definition, found `{found}`"
            ),
            span,
            ParseErrorKind::UnexpectedToken {
                expected: vec![
                    "query".to_string(),
                    "mutation".to_string(),
                    "subscription".to_string(),
                    "fragment".to_string(),
                    "{".to_string(),
                ],
                found,
            },
        ));
        Err(())
    }

    /// Parses a non-shorthand operation definition:
    /// `query Name($v: T = d) @dir { ... }`.
    fn parse_operation_definition(&mut self) -> Result<ast::OperationDefinition, ()> {
        let (kind, keyword_span) = if self.peek_is_keyword("query") {
            (ast::OperationKind::Query, self.expect_keyword("query")?)
        } else if self.peek_is_keyword("mutation") {
            (ast::OperationKind::Mutation, self.expect_keyword("mutation")?)
        } else {
            (
                ast::OperationKind::Subscription,
                self.expect_keyword("subscription")?,
            )
        };
        let start = keyword_span.start_inclusive;

        // Optional operation name.
        let name = match self.token_stream.peek() {
            Some(token) => match &token.kind {
                TokenKind::Name(_) | TokenKind::True | TokenKind::False | TokenKind::Null => {
                    Some(self.expect_name()?)
                }
                _ => None,
            },
            None => None,
        };

        let variable_definitions = if self.peek_is(&TokenKind::ParenOpen) {
            self.parse_variable_definitions()?
        } else {
            Vec::new()
        };

        let directives = self.parse_directives(ConstContext::AllowVariables)?;
        let selection_set = self.parse_selection_set()?;

        Ok(ast::OperationDefinition {
            span: self.span_from(start),
            kind,
            name,
            variable_definitions,
            directives,
            selection_set,
        })
    }

    /// Parses a fragment definition:
    /// `fragment Name on Type @dir { ... }`.
    fn parse_fragment_definition(&mut self) -> Result<ast::FragmentDefinition, ()> {
        let keyword_span = self.expect_keyword("fragment")?;
        let start = keyword_span.start_inclusive;

        let name = self.expect_name()?;
        if name.value == "on" {
            self.record_error(ParseError::new(
                "fragment name cannot be `on`",
                name.span,
                ParseErrorKind::ReservedName {
                    name: "on".to_string(),
                },
            ));
            return Err(());
        }

        let type_condition = self.parse_type_condition()?;
        let directives = self.parse_directives(ConstContext::AllowVariables)?;
        let selection_set = self.parse_selection_set()?;

        Ok(ast::FragmentDefinition {
            span: self.span_from(start),
            name,
            type_condition,
            directives,
            selection_set,
        })
    }

    /// Parses `on TypeName`.
    fn parse_type_condition(&mut self) -> Result<ast::TypeCondition, ()> {
        let on_span = self.expect_keyword("on")?;
        let on = self.expect_name()?;
        Ok(ast::TypeCondition {
            span: self.span_from(on_span.start_inclusive),
            on,
        })
    }

    // =========================================================================
    // Variable definitions
    // =========================================================================

    /// Parses `($var: Type = default @dir, ...)`.
    fn parse_variable_definitions(&mut self) -> Result<Vec<ast::VariableDefinition>, ()> {
        let open_token = self.expect(&TokenKind::ParenOpen)?;
        self.push_delimiter(open_token.span, DelimiterContext::VariableDefinitions);

        let mut definitions = Vec::new();

        if self.peek_is(&TokenKind::ParenClose) {
            self.record_error(ParseError::new(
                "variable definitions cannot be empty; omit the parentheses instead",
                open_token.span,
                ParseErrorKind::InvalidEmptyConstruct {
                    construct: "variable definitions".to_string(),
                },
            ));
        }

        loop {
            if self.peek_is(&TokenKind::ParenClose) {
                break;
            }
            if self.token_stream.is_at_end() {
                self.handle_unclosed_delimiter("(");
                return Err(());
            }
            definitions.push(self.parse_variable_definition()?);
        }

        self.expect(&TokenKind::ParenClose)?;
        self.pop_delimiter();

        Ok(definitions)
    }

    /// Parses `$name: Type = default @dir`.
    fn parse_variable_definition(&mut self) -> Result<ast::VariableDefinition, ()> {
        let dollar = self.expect(&TokenKind::Dollar)?;
        let start = dollar.span.start_inclusive;

        let name = self.expect_name()?;
        self.expect(&TokenKind::Colon)?;
        let var_type = self.parse_type_annotation()?;

        let default_value = if self.peek_is(&TokenKind::Equals) {
            self.consume_token();
            Some(self.parse_value(ConstContext::VariableDefaultValue)?)
        } else {
            None
        };

        let directives = self.parse_directives(ConstContext::VariableDefaultValue)?;

        Ok(ast::VariableDefinition {
            span: self.span_from(start),
            name,
            var_type,
            default_value,
            directives,
        })
    }

    /// Parses a type annotation: `Name`, `[Type]`, either with `!`.
    fn parse_type_annotation(&mut self) -> Result<ast::TypeAnnotation, ()> {
        self.enter_recursion()?;
        let result = self.parse_type_annotation_impl();
        self.exit_recursion();
        result
    }

    fn parse_type_annotation_impl(&mut self) -> Result<ast::TypeAnnotation, ()> {
        let start = self.peek_span().start_inclusive;

        let inner = if self.peek_is(&TokenKind::SquareBracketOpen) {
            let open_token = self.expect(&TokenKind::SquareBracketOpen)?;
            self.push_delimiter(open_token.span, DelimiterContext::ListType);
            let item = self.parse_type_annotation()?;
            if self.token_stream.is_at_end() {
                self.handle_unclosed_delimiter("[");
                return Err(());
            }
            self.expect(&TokenKind::SquareBracketClose)?;
            self.pop_delimiter();
            ast::TypeAnnotation::List {
                span: self.span_from(start),
                inner: Box::new(item),
            }
        } else {
            let name = self.expect_name()?;
            ast::TypeAnnotation::Named {
                span: name.span,
                name,
            }
        };

        if self.peek_is(&TokenKind::Bang) {
            self.consume_token();
            return Ok(ast::TypeAnnotation::NonNull {
                span: self.span_from(start),
                inner: Box::new(inner),
            });
        }

        Ok(inner)
    }

    // =========================================================================
    // Selection sets
    // =========================================================================

    /// Parses a selection set: `{ selection... }`.
    fn parse_selection_set(&mut self) -> Result<ast::SelectionSet, ()> {
        self.enter_recursion()?;
        let result = self.parse_selection_set_impl();
        self.exit_recursion();
        result
    }

    fn parse_selection_set_impl(&mut self) -> Result<ast::SelectionSet, ()> {
        let open_token = self.expect(&TokenKind::CurlyBraceOpen)?;
        let start = open_token.span.start_inclusive;
        self.push_delimiter(open_token.span, DelimiterContext::SelectionSet);

        let mut selections = Vec::new();

        if self.peek_is(&TokenKind::CurlyBraceClose) {
            self.record_error(ParseError::new(
                "selection set cannot be empty",
                open_token.span,
                ParseErrorKind::InvalidEmptyConstruct {
                    construct: "selection set".to_string(),
                },
            ));
        }

        loop {
            if self.peek_is(&TokenKind::CurlyBraceClose) {
                break;
            }
            if self.token_stream.is_at_end() {
                self.handle_unclosed_delimiter("{");
                return Err(());
            }

            match self.parse_selection() {
                Ok(selection) => selections.push(selection),
                Err(()) => self.skip_to_selection_recovery_point(),
            }
        }

        self.expect(&TokenKind::CurlyBraceClose)?;
        self.pop_delimiter();

        Ok(ast::SelectionSet {
            span: self.span_from(start),
            selections,
        })
    }

    /// Parses one selection: a field, fragment spread, or inline
    /// fragment.
    fn parse_selection(&mut self) -> Result<ast::Selection, ()> {
        if !self.peek_is(&TokenKind::Ellipsis) {
            return self.parse_field().map(ast::Selection::Field);
        }

        let ellipsis = self.expect(&TokenKind::Ellipsis)?;
        let start = ellipsis.span.start_inclusive;

        if self.peek_is_keyword("on")
            || self.peek_is(&TokenKind::At)
            || self.peek_is(&TokenKind::CurlyBraceOpen)
        {
            // Inline fragment.
            let type_condition = if self.peek_is_keyword("on") {
                Some(self.parse_type_condition()?)
            } else {
                None
            };
            let directives = self.parse_directives(ConstContext::AllowVariables)?;
            let selection_set = self.parse_selection_set()?;
            Ok(ast::Selection::InlineFragment(ast::InlineFragment {
                span: self.span_from(start),
                type_condition,
                directives,
                selection_set,
            }))
        } else {
            // Fragment spread.
            let name = self.expect_name()?;
            let directives = self.parse_directives(ConstContext::AllowVariables)?;
            Ok(ast::Selection::FragmentSpread(ast::FragmentSpread {
                span: self.span_from(start),
                name,
                directives,
            }))
        }
    }

    /// Parses a field: `alias: name(args) @dir { selections }`.
    fn parse_field(&mut self) -> Result<ast::Field, ()> {
        let first_name = self.expect_name()?;
        let start = first_name.span.start_inclusive;

        let (alias, name) = if self.peek_is(&TokenKind::Colon) {
            self.consume_token();
            let field_name = self.expect_name()?;
            (Some(first_name), field_name)
        } else {
            (None, first_name)
        };

        let arguments = if self.peek_is(&TokenKind::ParenOpen) {
            self.parse_arguments(DelimiterContext::FieldArguments, ConstContext::AllowVariables)?
        } else {
            Vec::new()
        };

        let directives = self.parse_directives(ConstContext::AllowVariables)?;

        let selection_set = if self.peek_is(&TokenKind::CurlyBraceOpen) {
            Some(self.parse_selection_set()?)
        } else {
            None
        };

        Ok(ast::Field {
            span: self.span_from(start),
            alias,
            name,
            arguments,
            directives,
            selection_set,
        })
    }

    // =========================================================================
    // Arguments and directives
    // =========================================================================

    /// Parses `(name: value, ...)`.
    fn parse_arguments(
        &mut self,
        context: DelimiterContext,
        const_context: ConstContext,
    ) -> Result<Vec<ast::Argument>, ()> {
        let open_token = self.expect(&TokenKind::ParenOpen)?;
        self.push_delimiter(open_token.span, context);

        let mut arguments = Vec::new();

        if self.peek_is(&TokenKind::ParenClose) {
            self.record_error(ParseError::new(
                "argument list cannot be empty; omit the parentheses instead",
                open_token.span,
                ParseErrorKind::InvalidEmptyConstruct {
                    construct: "argument list".to_string(),
                },
            ));
        }

        loop {
            if self.peek_is(&TokenKind::ParenClose) {
                break;
            }
            if self.token_stream.is_at_end() {
                self.handle_unclosed_delimiter("(");
                return Err(());
            }

            let name = self.expect_name()?;
            let arg_start = name.span.start_inclusive;
            self.expect(&TokenKind::Colon)?;
            let value = self.parse_value(const_context)?;

            arguments.push(ast::Argument {
                span: self.span_from(arg_start),
                name,
                value,
            });
        }

        self.expect(&TokenKind::ParenClose)?;
        self.pop_delimiter();

        Ok(arguments)
    }

    /// Parses zero or more `@name(args)` annotations.
    fn parse_directives(&mut self, const_context: ConstContext) -> Result<Vec<ast::Directive>, ()> {
        let mut directives = Vec::new();
        while self.peek_is(&TokenKind::At) {
            let at = self.expect(&TokenKind::At)?;
            let start = at.span.start_inclusive;
            let name = self.expect_name()?;
            let arguments = if self.peek_is(&TokenKind::ParenOpen) {
                self.parse_arguments(DelimiterContext::DirectiveArguments, const_context)?
            } else {
                Vec::new()
            };
            directives.push(ast::Directive {
                span: self.span_from(start),
                name,
                arguments,
            });
        }
        Ok(directives)
    }

    // =========================================================================
    // Values
    // =========================================================================

    /// Parses a value (literal or variable reference).
    fn parse_value(&mut self, context: ConstContext) -> Result<ast::Value, ()> {
        self.enter_recursion()?;
        let result = self.parse_value_impl(context);
        self.exit_recursion();
        result
    }

    fn parse_value_impl(&mut self, context: ConstContext) -> Result<ast::Value, ()> {
        let Some(token) = self.token_stream.peek() else {
            let span = self.eof_span();
            self.record_error(ParseError::new(
                "expected value, found end of input",
                span,
                ParseErrorKind::UnexpectedEof {
                    expected: vec!["value".to_string()],
                },
            ));
            return Err(());
        };
        let span = token.span;

        match &token.kind {
            TokenKind::Dollar => {
                if matches!(context, ConstContext::VariableDefaultValue) {
                    self.consume_token();
                    self.record_error(ParseError::new(
                        "variables are not allowed in variable default values",
                        span,
                        ParseErrorKind::InvalidSyntax,
                    ));
                    return Err(());
                }
                let dollar = self.consume_token().unwrap();
                let name = self.expect_name()?;
                Ok(ast::Value::Variable(ast::VariableValue {
                    span: self.span_from(dollar.span.start_inclusive),
                    name,
                }))
            }

            TokenKind::IntValue(_) => {
                let token = self.consume_token().unwrap();
                match token.kind.parse_int_value().unwrap() {
                    Ok(value) => Ok(ast::Value::Int(ast::IntValue { span, value })),
                    Err(_) => {
                        self.record_error(ParseError::new(
                            "integer literal out of range",
                            span,
                            ParseErrorKind::InvalidLiteral,
                        ));
                        Err(())
                    }
                }
            }

            TokenKind::FloatValue(_) => {
                let token = self.consume_token().unwrap();
                match token.kind.parse_float_value().unwrap() {
                    Ok(value) => Ok(ast::Value::Float(ast::FloatValue { span, value })),
                    Err(_) => {
                        self.record_error(ParseError::new(
                            "invalid float literal",
                            span,
                            ParseErrorKind::InvalidLiteral,
                        ));
                        Err(())
                    }
                }
            }

            TokenKind::StringValue(_) => {
                let token = self.consume_token().unwrap();
                let block = matches!(
                    &token.kind,
                    TokenKind::StringValue(raw) if raw.starts_with("\"\"\"")
                );
                match token.kind.parse_string_value().unwrap() {
                    Ok(value) => Ok(ast::Value::String(ast::StringValue { span, value, block })),
                    Err(string_error) => {
                        self.record_error(ParseError::new(
                            string_error.to_string(),
                            span,
                            ParseErrorKind::InvalidLiteral,
                        ));
                        Err(())
                    }
                }
            }

            TokenKind::True => {
                self.consume_token();
                Ok(ast::Value::Boolean(ast::BooleanValue { span, value: true }))
            }
            TokenKind::False => {
                self.consume_token();
                Ok(ast::Value::Boolean(ast::BooleanValue { span, value: false }))
            }
            TokenKind::Null => {
                self.consume_token();
                Ok(ast::Value::Null(ast::NullValue { span }))
            }

            TokenKind::Name(_) => {
                let name = self.expect_name()?;
                Ok(ast::Value::Enum(ast::EnumValue {
                    span,
                    value: name.value,
                }))
            }

            TokenKind::SquareBracketOpen => self.parse_list_value(context),
            TokenKind::CurlyBraceOpen => self.parse_object_value(context),

            TokenKind::Error { .. } => {
                let token = token.clone();
                self.handle_lexer_error(&token);
                self.consume_token();
                Err(())
            }

            _ => {
                let found = Self::token_kind_display(&token.kind);
                self.record_error(ParseError::new(
                    format!("expected value, found `{found}`"),
                    span,
                    ParseErrorKind::UnexpectedToken {
                        expected: vec!["value".to_string()],
                        found,
                    },
                ));
                Err(())
            }
        }
    }

    /// Parses `[value, ...]`.
    fn parse_list_value(&mut self, context: ConstContext) -> Result<ast::Value, ()> {
        let open_token = self.expect(&TokenKind::SquareBracketOpen)?;
        let start = open_token.span.start_inclusive;
        self.push_delimiter(open_token.span, DelimiterContext::ListValue);

        let mut items = Vec::new();
        loop {
            if self.peek_is(&TokenKind::SquareBracketClose) {
                break;
            }
            if self.token_stream.is_at_end() {
                self.handle_unclosed_delimiter("[");
                return Err(());
            }
            items.push(self.parse_value(context)?);
        }

        self.expect(&TokenKind::SquareBracketClose)?;
        self.pop_delimiter();

        Ok(ast::Value::List(ast::ListValue {
            span: self.span_from(start),
            items,
        }))
    }

    /// Parses `{ name: value, ... }`.
    fn parse_object_value(&mut self, context: ConstContext) -> Result<ast::Value, ()> {
        let open_token = self.expect(&TokenKind::CurlyBraceOpen)?;
        let start = open_token.span.start_inclusive;
        self.push_delimiter(open_token.span, DelimiterContext::ObjectValue);

        let mut fields = Vec::new();
        loop {
            if self.peek_is(&TokenKind::CurlyBraceClose) {
                break;
            }
            if self.token_stream.is_at_end() {
                self.handle_unclosed_delimiter("{");
                return Err(());
            }

            let name = self.expect_name()?;
            let field_start = name.span.start_inclusive;
            self.expect(&TokenKind::Colon)?;
            let value = self.parse_value(context)?;
            fields.push(ast::ObjectField {
                span: self.span_from(field_start),
                name,
                value,
            });
        }

        self.expect(&TokenKind::CurlyBraceClose)?;
        self.pop_delimiter();

        Ok(ast::Value::Object(ast::ObjectValue {
            span: self.span_from(start),
            fields,
        }))
    }

    // =========================================================================
    // Delimiter errors
    // =========================================================================

    /// Records an unclosed-delimiter error at EOF, noting where the
    /// delimiter was opened.
    fn handle_unclosed_delimiter(&mut self, delimiter: &str) {
        let span = self.eof_span();
        let open_delim = self.pop_delimiter();
        let mut error = ParseError::new(
            format!("unclosed `{delimiter}`"),
            span,
            ParseErrorKind::UnclosedDelimiter {
                delimiter: delimiter.to_string(),
            },
        );
        if let Some(delim) = open_delim {
            error.add_note_with_span(
                format!("opening `{delimiter}` in {} here", delim.context.description()),
                delim.span,
            );
        }
        self.record_error(error);
    }
}
