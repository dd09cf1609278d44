//! Buffered token stream with bounded lookahead.

use crate::Lexer;
use crate::token::Token;
use crate::token::TokenKind;
use std::collections::VecDeque;

/// A streaming token source with lookahead support.
///
/// Tokens are buffered in a [`VecDeque`] ring buffer: unconsumed tokens
/// are pushed at the back by `ensure_buffer_has()`, and `consume()` pops
/// from the front in O(1). Since trivia is already attached to tokens by
/// the lexer, the parser only needs `peek()` and `consume()`.
pub struct TokenStream<'src> {
    lexer: Lexer<'src>,
    buffer: VecDeque<Token<'src>>,
}

impl<'src> TokenStream<'src> {
    /// Creates a token stream over source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            lexer: Lexer::new(source),
            buffer: VecDeque::new(),
        }
    }

    /// Advances to the next token and returns it as an owned value.
    ///
    /// Returns `None` once the stream is exhausted (past EOF).
    pub fn consume(&mut self) -> Option<Token<'src>> {
        self.ensure_buffer_has(1);
        self.buffer.pop_front()
    }

    /// Peeks at the next token without consuming it.
    #[inline]
    pub fn peek(&mut self) -> Option<&Token<'src>> {
        self.peek_nth(0)
    }

    /// Peeks at the nth token ahead (0-indexed from the next unconsumed
    /// token). Fills the buffer up to `n + 1` elements if needed.
    pub fn peek_nth(&mut self, n: usize) -> Option<&Token<'src>> {
        self.ensure_buffer_has(n + 1);
        self.buffer.get(n)
    }

    /// Returns `true` if there are no more tokens to consume, or the
    /// next token is `Eof`.
    pub fn is_at_end(&mut self) -> bool {
        match self.peek() {
            None => true,
            Some(token) => matches!(token.kind, TokenKind::Eof),
        }
    }

    /// Fills the buffer to at least `count` unconsumed tokens.
    fn ensure_buffer_has(&mut self, count: usize) {
        while self.buffer.len() < count {
            if let Some(token) = self.lexer.next() {
                self.buffer.push_back(token);
            } else {
                break;
            }
        }
    }
}
