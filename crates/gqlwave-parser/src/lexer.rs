//! A single-pass, zero-copy lexer for GraphQL source text.
//!
//! Token values borrow directly from the source string via
//! `Cow::Borrowed`, so lexing names, numbers, and strings never
//! allocates. Comments and commas are captured as trivia and attached to
//! the following significant token. Invalid input produces `Error`
//! tokens rather than aborting, which lets the parser report several
//! problems in one pass.

use crate::ErrorNote;
use crate::SourcePosition;
use crate::SourceSpan;
use crate::smallvec;
use crate::token::Token;
use crate::token::TokenKind;
use crate::token::TriviaToken;
use crate::token::TriviaTokenVec;
use std::borrow::Cow;

/// A streaming lexer over a `&str`.
///
/// Implements `Iterator<Item = Token<'src>>`; the final item is always a
/// token of kind [`TokenKind::Eof`], after which the iterator is
/// exhausted.
pub struct Lexer<'src> {
    /// The full source text being lexed.
    source: &'src str,

    /// Current byte offset from the start of `source`. The remaining
    /// text to lex is `&source[curr_byte_offset..]`.
    curr_byte_offset: usize,

    /// Current 0-based line number.
    curr_line: usize,

    /// Current 0-based character column. Counts characters, not bytes.
    curr_column: usize,

    /// Whether the previous character was `\r`, so that `\r\n` counts as
    /// a single line terminator.
    last_char_was_cr: bool,

    /// Trivia (comments, commas) accumulated before the next token.
    pending_trivia: TriviaTokenVec<'src>,

    /// Whether the EOF token has been emitted.
    finished: bool,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer over a string slice.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            curr_byte_offset: 0,
            curr_line: 0,
            curr_column: 0,
            last_char_was_cr: false,
            pending_trivia: smallvec![],
            finished: false,
        }
    }

    // =========================================================================
    // Position and scanning helpers
    // =========================================================================

    /// Returns the remaining source text to be lexed.
    fn remaining(&self) -> &'src str {
        &self.source[self.curr_byte_offset..]
    }

    /// Returns the current source position.
    fn curr_position(&self) -> SourcePosition {
        SourcePosition::new(self.curr_line, self.curr_column, self.curr_byte_offset)
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Peeks at the nth character ahead without consuming.
    fn peek_char_nth(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    /// Consumes the next character, updating line/column/offset tracking.
    ///
    /// `\n`, `\r`, and `\r\n` each count as one line terminator.
    fn consume(&mut self) -> Option<char> {
        let ch = self.peek_char()?;

        if ch == '\n' {
            if self.last_char_was_cr {
                // The \n of a \r\n pair; the line was already advanced.
                self.last_char_was_cr = false;
            } else {
                self.curr_line += 1;
                self.curr_column = 0;
            }
        } else if ch == '\r' {
            self.curr_line += 1;
            self.curr_column = 0;
            self.last_char_was_cr = true;
        } else {
            self.curr_column += 1;
            self.last_char_was_cr = false;
        }

        self.curr_byte_offset += ch.len_utf8();
        Some(ch)
    }

    /// Creates a span from `start` to the current position.
    fn make_span(&self, start: SourcePosition) -> SourceSpan {
        SourceSpan::new(start, self.curr_position())
    }

    /// Creates a token carrying the accumulated trivia.
    fn make_token(&mut self, kind: TokenKind<'src>, span: SourceSpan) -> Token<'src> {
        Token {
            kind,
            preceding_trivia: std::mem::take(&mut self.pending_trivia),
            span,
        }
    }

    // =========================================================================
    // Lexer main loop
    // =========================================================================

    /// Advances to the next token, skipping whitespace and collecting
    /// trivia.
    fn next_token(&mut self) -> Token<'src> {
        loop {
            self.skip_whitespace();

            let start = self.curr_position();

            match self.peek_char() {
                None => {
                    let span = self.make_span(start);
                    return self.make_token(TokenKind::Eof, span);
                }

                Some('#') => {
                    self.lex_comment(start);
                    continue;
                }

                Some(',') => {
                    self.consume();
                    let span = self.make_span(start);
                    self.pending_trivia.push(TriviaToken::Comma { span });
                    continue;
                }

                Some('!') => return self.lex_punctuator(TokenKind::Bang, start),
                Some('$') => return self.lex_punctuator(TokenKind::Dollar, start),
                Some('&') => return self.lex_punctuator(TokenKind::Ampersand, start),
                Some('(') => return self.lex_punctuator(TokenKind::ParenOpen, start),
                Some(')') => return self.lex_punctuator(TokenKind::ParenClose, start),
                Some(':') => return self.lex_punctuator(TokenKind::Colon, start),
                Some('=') => return self.lex_punctuator(TokenKind::Equals, start),
                Some('@') => return self.lex_punctuator(TokenKind::At, start),
                Some('[') => return self.lex_punctuator(TokenKind::SquareBracketOpen, start),
                Some(']') => return self.lex_punctuator(TokenKind::SquareBracketClose, start),
                Some('{') => return self.lex_punctuator(TokenKind::CurlyBraceOpen, start),
                Some('}') => return self.lex_punctuator(TokenKind::CurlyBraceClose, start),
                Some('|') => return self.lex_punctuator(TokenKind::Pipe, start),

                Some('.') => return self.lex_ellipsis(start),

                Some('"') => return self.lex_string(start),

                Some(c) if is_name_start(c) => return self.lex_name(start),

                Some(c) if c == '-' || c.is_ascii_digit() => {
                    return self.lex_number(start);
                }

                Some(_) => return self.lex_invalid_character(start),
            }
        }
    }

    /// Consumes a single-character punctuator.
    fn lex_punctuator(&mut self, kind: TokenKind<'src>, start: SourcePosition) -> Token<'src> {
        self.consume();
        let span = self.make_span(start);
        self.make_token(kind, span)
    }

    // =========================================================================
    // Whitespace and comments
    // =========================================================================

    /// Skips insignificant whitespace: space, tab, line terminators, and
    /// the Unicode BOM. Commas are whitespace in GraphQL too, but they
    /// are handled separately so they can be preserved as trivia.
    ///
    /// See: <https://spec.graphql.org/September2025/#sec-Language.Source-Text.Ignored-Tokens>
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            match ch {
                ' ' | '\t' | '\n' | '\r' | '\u{FEFF}' => {
                    self.consume();
                }
                _ => break,
            }
        }
    }

    /// Lexes a `# ...` comment into pending trivia.
    fn lex_comment(&mut self, start: SourcePosition) {
        // Consume the '#'
        self.consume();

        // Comments run to the end of the line; memchr finds the nearest
        // line terminator without walking char boundaries.
        let rest = self.remaining();
        let content_len = memchr::memchr2(b'\n', b'\r', rest.as_bytes()).unwrap_or(rest.len());
        let content = &rest[..content_len];
        for _ in content.chars() {
            self.consume();
        }

        let span = self.make_span(start);

        self.pending_trivia.push(TriviaToken::Comment {
            value: Cow::Borrowed(content),
            span,
        });
    }

    // =========================================================================
    // Ellipsis
    // =========================================================================

    /// Lexes `...`, or produces an error token for stray dots.
    fn lex_ellipsis(&mut self, start: SourcePosition) -> Token<'src> {
        if self.remaining().starts_with("...") {
            self.consume();
            self.consume();
            self.consume();
            let span = self.make_span(start);
            return self.make_token(TokenKind::Ellipsis, span);
        }

        // Consume the run of dots so we don't report one error per dot.
        let mut dots = 0;
        while self.peek_char() == Some('.') {
            self.consume();
            dots += 1;
        }
        let span = self.make_span(start);
        let kind = TokenKind::Error {
            message: format!("unexpected `{}`", ".".repeat(dots)),
            notes: smallvec![ErrorNote::help(
                "a fragment spread is written with exactly three dots: `...`"
            )],
        };
        self.make_token(kind, span)
    }

    // =========================================================================
    // Names
    // =========================================================================

    /// Lexes a name. The keywords `true`, `false`, and `null` are
    /// emitted as distinct token kinds.
    fn lex_name(&mut self, start: SourcePosition) -> Token<'src> {
        let name_start = self.curr_byte_offset;

        self.consume();
        while let Some(ch) = self.peek_char() {
            if is_name_continue(ch) {
                self.consume();
            } else {
                break;
            }
        }

        let name = &self.source[name_start..self.curr_byte_offset];
        let span = self.make_span(start);

        let kind = match name {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            _ => TokenKind::Name(Cow::Borrowed(name)),
        };

        self.make_token(kind, span)
    }

    // =========================================================================
    // Numbers
    // =========================================================================

    /// Lexes an integer or float literal: an optional `-`, an integer
    /// part (`0` or `[1-9][0-9]*`), an optional fraction, and an
    /// optional exponent.
    fn lex_number(&mut self, start: SourcePosition) -> Token<'src> {
        let num_start = self.curr_byte_offset;
        let mut is_float = false;

        if self.peek_char() == Some('-') {
            self.consume();
        }

        match self.peek_char() {
            Some('0') => {
                self.consume();
                if let Some(ch) = self.peek_char()
                    && ch.is_ascii_digit()
                {
                    return self.lex_number_error(
                        start,
                        num_start,
                        "invalid number: leading zeros are not allowed",
                    );
                }
            }
            Some(ch) if ch.is_ascii_digit() => {
                self.consume();
                while let Some(ch) = self.peek_char() {
                    if ch.is_ascii_digit() {
                        self.consume();
                    } else {
                        break;
                    }
                }
            }
            Some(_) | None => {
                // A lone `-` with no digits.
                let span = self.make_span(start);
                let kind = TokenKind::Error {
                    message: "unexpected `-`".to_string(),
                    notes: smallvec![],
                };
                return self.make_token(kind, span);
            }
        }

        // Optional fraction. A `.` followed by a non-digit is left for
        // the next token (it may be a stray dot or part of `...`).
        if self.peek_char() == Some('.')
            && let Some(ch) = self.peek_char_nth(1)
            && ch.is_ascii_digit()
        {
            is_float = true;
            self.consume();
            while let Some(ch) = self.peek_char() {
                if ch.is_ascii_digit() {
                    self.consume();
                } else {
                    break;
                }
            }
        }

        // Optional exponent.
        if let Some(ch) = self.peek_char()
            && (ch == 'e' || ch == 'E')
        {
            is_float = true;
            self.consume();

            if let Some(ch) = self.peek_char()
                && (ch == '+' || ch == '-')
            {
                self.consume();
            }

            let has_exponent_digits = matches!(self.peek_char(), Some(ch) if ch.is_ascii_digit());
            if !has_exponent_digits {
                return self.lex_number_error(
                    start,
                    num_start,
                    "invalid number: exponent must have at least one digit",
                );
            }

            while let Some(ch) = self.peek_char() {
                if ch.is_ascii_digit() {
                    self.consume();
                } else {
                    break;
                }
            }
        }

        let num_text = &self.source[num_start..self.curr_byte_offset];
        let span = self.make_span(start);

        let kind = if is_float {
            TokenKind::FloatValue(Cow::Borrowed(num_text))
        } else {
            TokenKind::IntValue(Cow::Borrowed(num_text))
        };

        self.make_token(kind, span)
    }

    /// Creates an error token for an invalid number, consuming the rest
    /// of the number-like run for better recovery.
    fn lex_number_error(
        &mut self,
        start: SourcePosition,
        num_start: usize,
        message: &str,
    ) -> Token<'src> {
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_digit() || matches!(ch, '.' | 'e' | 'E' | '+' | '-') {
                self.consume();
            } else {
                break;
            }
        }

        let invalid_text = &self.source[num_start..self.curr_byte_offset];
        let span = self.make_span(start);

        let kind = TokenKind::Error {
            message: format!("{message}: `{invalid_text}`"),
            notes: smallvec![],
        };
        self.make_token(kind, span)
    }

    // =========================================================================
    // Strings
    // =========================================================================

    /// Lexes a string literal (single-line or block).
    fn lex_string(&mut self, start: SourcePosition) -> Token<'src> {
        let str_start = self.curr_byte_offset;

        if self.remaining().starts_with("\"\"\"") {
            return self.lex_block_string(start, str_start);
        }

        self.consume(); // opening "

        loop {
            match self.peek_char() {
                None => {
                    let span = self.make_span(start);
                    let kind = TokenKind::Error {
                        message: "unterminated string literal".to_string(),
                        notes: smallvec![
                            ErrorNote::general_with_span("string started here", span),
                            ErrorNote::help("add a closing `\"`"),
                        ],
                    };
                    return self.make_token(kind, span);
                }
                Some('\n') | Some('\r') => {
                    // Consume the line terminator so the span covers it.
                    self.consume();
                    if self.last_char_was_cr && self.peek_char() == Some('\n') {
                        self.consume();
                    }
                    let span = self.make_span(start);
                    let kind = TokenKind::Error {
                        message: "unterminated string literal".to_string(),
                        notes: smallvec![
                            ErrorNote::general(
                                "single-line strings cannot contain unescaped line terminators"
                            ),
                            ErrorNote::help(
                                "use a block string (`\"\"\"`) for multi-line text, or escape \
                                 the line terminator with `\\n`"
                            ),
                        ],
                    };
                    return self.make_token(kind, span);
                }
                Some('"') => {
                    self.consume();
                    break;
                }
                Some('\\') => {
                    // Escape sequence; validity is checked when the value
                    // is extracted.
                    self.consume();
                    if self.peek_char().is_some() {
                        self.consume();
                    }
                }
                Some(_) => {
                    self.consume();
                }
            }
        }

        let text = &self.source[str_start..self.curr_byte_offset];
        let span = self.make_span(start);
        self.make_token(TokenKind::StringValue(Cow::Borrowed(text)), span)
    }

    /// Lexes a block string literal.
    fn lex_block_string(&mut self, start: SourcePosition, str_start: usize) -> Token<'src> {
        self.consume();
        self.consume();
        self.consume();

        loop {
            match self.peek_char() {
                None => {
                    let span = self.make_span(start);
                    let kind = TokenKind::Error {
                        message: "unterminated block string".to_string(),
                        notes: smallvec![
                            ErrorNote::general_with_span("block string started here", span),
                            ErrorNote::help("add a closing `\"\"\"`"),
                        ],
                    };
                    return self.make_token(kind, span);
                }
                Some('\\') => {
                    if self.remaining().starts_with("\\\"\"\"") {
                        self.consume();
                        self.consume();
                        self.consume();
                        self.consume();
                    } else {
                        self.consume();
                    }
                }
                Some('"') => {
                    if self.remaining().starts_with("\"\"\"") {
                        self.consume();
                        self.consume();
                        self.consume();
                        break;
                    } else {
                        self.consume();
                    }
                }
                Some(_) => {
                    self.consume();
                }
            }
        }

        let text = &self.source[str_start..self.curr_byte_offset];
        let span = self.make_span(start);
        self.make_token(TokenKind::StringValue(Cow::Borrowed(text)), span)
    }

    // =========================================================================
    // Invalid characters
    // =========================================================================

    /// Consumes one invalid character and produces an error token.
    fn lex_invalid_character(&mut self, start: SourcePosition) -> Token<'src> {
        let ch = self.consume().unwrap();
        let span = self.make_span(start);

        let kind = TokenKind::Error {
            message: format!("unexpected character {}", describe_char(ch)),
            notes: smallvec![],
        };
        self.make_token(kind, span)
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let token = self.next_token();
        if matches!(token.kind, TokenKind::Eof) {
            self.finished = true;
        }
        Some(token)
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Returns `true` if `ch` can start a name (`[_A-Za-z]`).
fn is_name_start(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphabetic()
}

/// Returns `true` if `ch` can continue a name (`[_0-9A-Za-z]`).
fn is_name_continue(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphanumeric()
}

/// Human-readable description of a character for error messages.
/// Control and invisible characters are shown with their code point.
fn describe_char(ch: char) -> String {
    if ch.is_control() || (ch.is_whitespace() && ch != ' ') {
        format!("`{}` (U+{:04X})", ch.escape_default(), ch as u32)
    } else {
        format!("`{ch}`")
    }
}
