//! Tests for the lexer: token kinds, positions, trivia, and error
//! tokens.

use crate::Lexer;
use crate::token::Token;
use crate::token::TokenKind;
use crate::token::TriviaToken;
use std::borrow::Cow;

/// Lexes source text to a vector of tokens (including the final Eof).
fn lex(source: &str) -> Vec<Token<'_>> {
    Lexer::new(source).collect()
}

/// Lexes source text to a vector of token kinds, dropping the Eof.
fn lex_kinds(source: &str) -> Vec<TokenKind<'_>> {
    let mut kinds: Vec<_> = lex(source).into_iter().map(|t| t.kind).collect();
    assert_eq!(kinds.pop(), Some(TokenKind::Eof));
    kinds
}

#[test]
fn lexes_punctuators_and_names() {
    let kinds = lex_kinds("{ user(id: $id) @skip ... }");
    assert_eq!(
        kinds,
        vec![
            TokenKind::CurlyBraceOpen,
            TokenKind::Name(Cow::Borrowed("user")),
            TokenKind::ParenOpen,
            TokenKind::Name(Cow::Borrowed("id")),
            TokenKind::Colon,
            TokenKind::Dollar,
            TokenKind::Name(Cow::Borrowed("id")),
            TokenKind::ParenClose,
            TokenKind::At,
            TokenKind::Name(Cow::Borrowed("skip")),
            TokenKind::Ellipsis,
            TokenKind::CurlyBraceClose,
        ]
    );
}

#[test]
fn keywords_true_false_null_are_distinct_kinds() {
    let kinds = lex_kinds("true false null truthy");
    assert_eq!(
        kinds,
        vec![
            TokenKind::True,
            TokenKind::False,
            TokenKind::Null,
            TokenKind::Name(Cow::Borrowed("truthy")),
        ]
    );
}

#[test]
fn lexes_int_and_float_literals() {
    let kinds = lex_kinds("0 -123 4.5 -0.5 1e10 6.02e-23");
    assert_eq!(
        kinds,
        vec![
            TokenKind::IntValue(Cow::Borrowed("0")),
            TokenKind::IntValue(Cow::Borrowed("-123")),
            TokenKind::FloatValue(Cow::Borrowed("4.5")),
            TokenKind::FloatValue(Cow::Borrowed("-0.5")),
            TokenKind::FloatValue(Cow::Borrowed("1e10")),
            TokenKind::FloatValue(Cow::Borrowed("6.02e-23")),
        ]
    );
}

#[test]
fn rejects_leading_zeros() {
    let kinds = lex_kinds("007");
    assert_eq!(kinds.len(), 1);
    assert!(kinds[0].is_error());
}

#[test]
fn rejects_exponent_without_digits() {
    let kinds = lex_kinds("1e");
    assert_eq!(kinds.len(), 1);
    assert!(kinds[0].is_error());
}

#[test]
fn lexes_string_literals_with_escapes() {
    let kinds = lex_kinds(r#""hello \"world\"\n""#);
    assert_eq!(kinds.len(), 1);
    let value = kinds[0].parse_string_value().unwrap().unwrap();
    assert_eq!(value, "hello \"world\"\n");
}

#[test]
fn lexes_unicode_escapes() {
    let kinds = lex_kinds(r#""A\u{1F389}""#);
    let value = kinds[0].parse_string_value().unwrap().unwrap();
    assert_eq!(value, "A\u{1F389}");
}

#[test]
fn unterminated_string_is_an_error_token() {
    let kinds = lex_kinds("\"oops");
    assert_eq!(kinds.len(), 1);
    assert!(kinds[0].is_error());
}

#[test]
fn newline_in_single_line_string_is_an_error_token() {
    let kinds = lex_kinds("\"a\nb\"");
    assert!(kinds[0].is_error());
}

#[test]
fn comments_and_commas_become_trivia_on_next_token() {
    let tokens = lex("# leading comment\nfoo, bar");
    assert_eq!(tokens[0].kind, TokenKind::Name(Cow::Borrowed("foo")));
    assert_eq!(tokens[0].preceding_trivia.len(), 1);
    match &tokens[0].preceding_trivia[0] {
        TriviaToken::Comment { value, .. } => {
            assert_eq!(value.as_ref(), " leading comment");
        }
        other => panic!("expected comment trivia, got {other:?}"),
    }

    // The comma between foo and bar attaches to bar.
    assert_eq!(tokens[1].kind, TokenKind::Name(Cow::Borrowed("bar")));
    assert_eq!(tokens[1].preceding_trivia.len(), 1);
    assert!(matches!(
        tokens[1].preceding_trivia[0],
        TriviaToken::Comma { .. }
    ));
}

#[test]
fn trivia_does_not_shift_token_positions() {
    let tokens = lex("# note\n  field");
    let field = &tokens[0];
    assert_eq!(field.span.start_inclusive.line(), 1);
    assert_eq!(field.span.start_inclusive.column(), 2);
}

#[test]
fn tracks_lines_across_crlf() {
    let tokens = lex("a\r\nb\rc\nd");
    let lines: Vec<_> = tokens
        .iter()
        .take(4)
        .map(|t| t.span.start_inclusive.line())
        .collect();
    assert_eq!(lines, vec![0, 1, 2, 3]);
}

#[test]
fn skips_byte_order_mark() {
    let kinds = lex_kinds("\u{FEFF}query");
    assert_eq!(kinds, vec![TokenKind::Name(Cow::Borrowed("query"))]);
}

#[test]
fn invalid_character_is_an_error_token_and_lexing_continues() {
    let kinds = lex_kinds("a ; b");
    assert_eq!(kinds.len(), 3);
    assert_eq!(kinds[0], TokenKind::Name(Cow::Borrowed("a")));
    assert!(kinds[1].is_error());
    assert_eq!(kinds[2], TokenKind::Name(Cow::Borrowed("b")));
}

#[test]
fn two_dots_are_a_single_error_token() {
    let kinds = lex_kinds("..");
    assert_eq!(kinds.len(), 1);
    assert!(kinds[0].is_error());
}

#[test]
fn eof_token_has_empty_span_at_end() {
    let tokens = lex("ab");
    let eof = tokens.last().unwrap();
    assert_eq!(eof.kind, TokenKind::Eof);
    assert_eq!(eof.span.start_inclusive.byte_offset(), 2);
    assert_eq!(eof.span.end_exclusive.byte_offset(), 2);
}
