use crate::SourceSpan;
use crate::token::TokenKind;
use crate::token::TriviaTokenVec;

/// A single lexed token.
///
/// Tokens are ephemeral: they are produced by the lexer, consumed by the
/// parser, and never retained after parsing. Comments and commas that
/// precede a token are attached to it as trivia rather than emitted as
/// separate tokens, so trivia never affects the positions of real tokens.
#[derive(Clone, Debug, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind<'src>,

    /// Trivia (comments, commas) lexed immediately before this token.
    pub preceding_trivia: TriviaTokenVec<'src>,

    pub span: SourceSpan,
}
