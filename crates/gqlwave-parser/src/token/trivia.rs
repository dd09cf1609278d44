use crate::SmallVec;
use crate::SourceSpan;
use std::borrow::Cow;

/// An "ignored token" preserved for diagnostics and tooling.
///
/// GraphQL treats comments and commas as insignificant, but both are
/// worth keeping around: comments for documentation tooling, commas for
/// lossless reconstruction. The lexer accumulates them and attaches them
/// to the next significant token.
#[derive(Clone, Debug, PartialEq)]
pub enum TriviaToken<'src> {
    /// A `# ...` comment. `value` is the text after the `#`, without the
    /// line terminator.
    Comment {
        value: Cow<'src, str>,
        span: SourceSpan,
    },

    /// A `,` separator.
    Comma { span: SourceSpan },
}

/// Trivia preceding a token, inline-allocated for the common case of a
/// token with no trivia at all.
pub type TriviaTokenVec<'src> = SmallVec<[TriviaToken<'src>; 1]>;
