use crate::ErrorNotes;
use crate::StringValueError;
use std::borrow::Cow;
use std::num::ParseFloatError;
use std::num::ParseIntError;

/// The kind of a lexed token.
///
/// Literal kinds (`IntValue`, `FloatValue`, `StringValue`) store only the
/// raw source text; use the `parse_*_value` methods to interpret it.
/// Values borrow from the source text (`Cow::Borrowed`) so that lexing
/// ASCII names and literals never allocates.
///
/// Negative numbers like `-123` are lexed as single tokens, matching the
/// grammar for `IntValue`/`FloatValue`.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind<'src> {
    // =====================================================================
    // Punctuators
    // =====================================================================
    /// `&`
    Ampersand,
    /// `@`
    At,
    /// `!`
    Bang,
    /// `:`
    Colon,
    /// `}`
    CurlyBraceClose,
    /// `{`
    CurlyBraceOpen,
    /// `$`
    Dollar,
    /// `...`
    Ellipsis,
    /// `=`
    Equals,
    /// `)`
    ParenClose,
    /// `(`
    ParenOpen,
    /// `|`
    Pipe,
    /// `]`
    SquareBracketClose,
    /// `[`
    SquareBracketOpen,

    // =====================================================================
    // Literals (raw source text)
    // =====================================================================
    /// A name/identifier.
    Name(Cow<'src, str>),

    /// Raw text of an integer literal, including an optional sign
    /// (e.g. `"-123"`).
    IntValue(Cow<'src, str>),

    /// Raw text of a float literal (e.g. `"-1.23e-4"`).
    FloatValue(Cow<'src, str>),

    /// Raw text of a string literal, including its quotes
    /// (e.g. `"\"hi\""`, `"\"\"\"block\"\"\""`).
    StringValue(Cow<'src, str>),

    // =====================================================================
    // Keyword literals (distinct from Name for type safety)
    // =====================================================================
    /// The `true` literal.
    True,
    /// The `false` literal.
    False,
    /// The `null` literal.
    Null,

    /// End of input.
    Eof,

    /// A lexer error. Emitting errors as tokens lets the parser keep
    /// going and collect multiple errors in a single pass.
    Error {
        message: String,
        notes: ErrorNotes,
    },
}

impl<'src> TokenKind<'src> {
    /// Returns `true` if this token represents a lexer error.
    pub fn is_error(&self) -> bool {
        matches!(self, TokenKind::Error { .. })
    }

    /// Returns the punctuator text for punctuator kinds.
    pub fn as_punctuator_str(&self) -> Option<&'static str> {
        match self {
            TokenKind::Ampersand => Some("&"),
            TokenKind::At => Some("@"),
            TokenKind::Bang => Some("!"),
            TokenKind::Colon => Some(":"),
            TokenKind::CurlyBraceClose => Some("}"),
            TokenKind::CurlyBraceOpen => Some("{"),
            TokenKind::Dollar => Some("$"),
            TokenKind::Ellipsis => Some("..."),
            TokenKind::Equals => Some("="),
            TokenKind::ParenClose => Some(")"),
            TokenKind::ParenOpen => Some("("),
            TokenKind::Pipe => Some("|"),
            TokenKind::SquareBracketClose => Some("]"),
            TokenKind::SquareBracketOpen => Some("["),
            _ => None,
        }
    }

    /// Parse an `IntValue`'s raw text to `i64`.
    ///
    /// Returns `None` if this is not an `IntValue`.
    pub fn parse_int_value(&self) -> Option<Result<i64, ParseIntError>> {
        match self {
            TokenKind::IntValue(raw) => Some(raw.parse()),
            _ => None,
        }
    }

    /// Parse a `FloatValue`'s raw text to `f64`.
    ///
    /// Returns `None` if this is not a `FloatValue`.
    pub fn parse_float_value(&self) -> Option<Result<f64, ParseFloatError>> {
        match self {
            TokenKind::FloatValue(raw) => Some(raw.parse()),
            _ => None,
        }
    }

    /// Parse a `StringValue`'s raw text to its unescaped content.
    ///
    /// Single-line strings (`"..."`) have their escape sequences
    /// processed: `\n`, `\r`, `\t`, `\\`, `\"`, `\/`, `\b`, `\f`,
    /// `\uXXXX`, and `\u{X...}`. Block strings (`"""..."""`) go through
    /// the indentation-stripping algorithm from the language spec and
    /// only the `\"""` escape is processed.
    ///
    /// Returns `None` if this is not a `StringValue`.
    pub fn parse_string_value(&self) -> Option<Result<String, StringValueError>> {
        match self {
            TokenKind::StringValue(raw) => Some(parse_string_literal(raw)),
            _ => None,
        }
    }
}

/// Parse a raw string literal (either form) into its unescaped content.
fn parse_string_literal(raw: &str) -> Result<String, StringValueError> {
    if raw.starts_with("\"\"\"") {
        parse_block_string(raw)
    } else {
        parse_single_line_string(raw)
    }
}

fn parse_single_line_string(raw: &str) -> Result<String, StringValueError> {
    if !raw.starts_with('"') || !raw.ends_with('"') || raw.len() < 2 {
        return Err(StringValueError::Unterminated);
    }
    let content = &raw[1..raw.len() - 1];

    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('/') => result.push('/'),
            Some('b') => result.push('\u{0008}'),
            Some('f') => result.push('\u{000C}'),
            Some('u') => result.push(parse_unicode_escape(&mut chars)?),
            Some(other) => {
                return Err(StringValueError::InvalidEscape(format!("\\{other}")));
            }
            None => {
                return Err(StringValueError::InvalidEscape("\\".to_string()));
            }
        }
    }

    Ok(result)
}

/// Parse a unicode escape after the leading `\u` has been consumed.
///
/// Supports both the fixed 4-digit form `\uXXXX` and the variable-length
/// form `\u{X...}`.
fn parse_unicode_escape(
    chars: &mut std::iter::Peekable<std::str::Chars>,
) -> Result<char, StringValueError> {
    if chars.peek() == Some(&'{') {
        chars.next(); // consume '{'
        let mut hex = String::new();
        loop {
            match chars.next() {
                Some('}') => break,
                Some(c) if c.is_ascii_hexdigit() => hex.push(c),
                Some(c) => {
                    return Err(StringValueError::InvalidUnicodeEscape(format!(
                        "\\u{{{hex}{c}"
                    )));
                }
                None => {
                    return Err(StringValueError::InvalidUnicodeEscape(format!("\\u{{{hex}")));
                }
            }
        }
        if hex.is_empty() {
            return Err(StringValueError::InvalidUnicodeEscape("\\u{}".to_string()));
        }
        let code_point = u32::from_str_radix(&hex, 16)
            .map_err(|_| StringValueError::InvalidUnicodeEscape(format!("\\u{{{hex}}}")))?;
        char::from_u32(code_point)
            .ok_or_else(|| StringValueError::InvalidUnicodeEscape(format!("\\u{{{hex}}}")))
    } else {
        let mut hex = String::with_capacity(4);
        for _ in 0..4 {
            match chars.next() {
                Some(c) if c.is_ascii_hexdigit() => hex.push(c),
                Some(c) => {
                    return Err(StringValueError::InvalidUnicodeEscape(format!("\\u{hex}{c}")));
                }
                None => {
                    return Err(StringValueError::InvalidUnicodeEscape(format!("\\u{hex}")));
                }
            }
        }
        let code_point = u32::from_str_radix(&hex, 16)
            .map_err(|_| StringValueError::InvalidUnicodeEscape(format!("\\u{hex}")))?;
        char::from_u32(code_point)
            .ok_or_else(|| StringValueError::InvalidUnicodeEscape(format!("\\u{hex}")))
    }
}

/// Parse a block string literal per the language's block-string
/// algorithm: strip the minimal common indentation of all non-first
/// lines, then drop fully-blank leading and trailing lines.
///
/// See: <https://spec.graphql.org/September2025/#BlockStringValue()>
fn parse_block_string(raw: &str) -> Result<String, StringValueError> {
    if !raw.starts_with("\"\"\"") || !raw.ends_with("\"\"\"") || raw.len() < 6 {
        return Err(StringValueError::Unterminated);
    }
    let content = &raw[3..raw.len() - 3];
    let content = content.replace("\\\"\"\"", "\"\"\"");

    let lines: Vec<&str> = content.lines().collect();

    let common_indent = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut result_lines: Vec<&str> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        if i == 0 || line.len() < common_indent {
            result_lines.push(line);
        } else {
            result_lines.push(&line[common_indent..]);
        }
    }

    while result_lines.first().is_some_and(|l| l.trim().is_empty()) {
        result_lines.remove(0);
    }
    while result_lines.last().is_some_and(|l| l.trim().is_empty()) {
        result_lines.pop();
    }

    Ok(result_lines.join("\n"))
}
