use crate::SmallVec;
use crate::SourceSpan;

/// The kind of an [`ErrorNote`], which determines its rendering prefix.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorNoteKind {
    /// Explanatory context about the error.
    General,
    /// An actionable suggestion for fixing the error.
    Help,
}

/// A note providing additional context about an error.
///
/// Notes augment the primary error message with explanatory context,
/// actionable suggestions, and related source locations (e.g. where an
/// unclosed delimiter was opened).
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorNote {
    pub kind: ErrorNoteKind,
    pub message: String,

    /// Optional span pointing to a related location.
    pub span: Option<SourceSpan>,
}

impl ErrorNote {
    /// Creates a general note without a span.
    pub fn general(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorNoteKind::General,
            message: message.into(),
            span: None,
        }
    }

    /// Creates a general note pointing to a related location.
    pub fn general_with_span(message: impl Into<String>, span: SourceSpan) -> Self {
        Self {
            kind: ErrorNoteKind::General,
            message: message.into(),
            span: Some(span),
        }
    }

    /// Creates a help note without a span.
    pub fn help(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorNoteKind::Help,
            message: message.into(),
            span: None,
        }
    }
}

/// Error notes, inline-allocated for the common 0-2 note case.
pub type ErrorNotes = SmallVec<[ErrorNote; 2]>;
