use crate::ErrorNote;
use crate::ErrorNoteKind;
use crate::ErrorNotes;
use crate::ParseErrorKind;
use crate::SourceSpan;

/// A parse error with location information and contextual notes.
///
/// Carries everything needed for both human-readable CLI output and
/// programmatic handling: a primary message, the span where the error
/// was detected, a categorized [`ParseErrorKind`], and optional notes
/// pointing at related locations.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{}", self.format_oneline())]
pub struct ParseError {
    message: String,
    span: SourceSpan,
    kind: ParseErrorKind,
    notes: ErrorNotes,
}

impl ParseError {
    /// Creates a new parse error with no notes.
    pub fn new(message: impl Into<String>, span: SourceSpan, kind: ParseErrorKind) -> Self {
        Self {
            message: message.into(),
            span,
            kind,
            notes: ErrorNotes::new(),
        }
    }

    /// Creates a parse error from a lexer error token, preserving the
    /// lexer's message and notes.
    pub fn from_lexer_error(message: impl Into<String>, span: SourceSpan, notes: ErrorNotes) -> Self {
        Self {
            message: message.into(),
            span,
            kind: ParseErrorKind::LexicalError,
            notes,
        }
    }

    /// Returns the human-readable error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the primary span where the error was detected.
    pub fn span(&self) -> &SourceSpan {
        &self.span
    }

    /// Returns the categorized error kind.
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// Returns the additional notes for this error.
    pub fn notes(&self) -> &ErrorNotes {
        &self.notes
    }

    /// Adds a general note pointing to a related location.
    pub fn add_note_with_span(&mut self, message: impl Into<String>, span: SourceSpan) {
        self.notes.push(ErrorNote::general_with_span(message, span));
    }

    /// Adds a help note.
    pub fn add_help(&mut self, message: impl Into<String>) {
        self.notes.push(ErrorNote::help(message));
    }

    /// Formats this error as a single-line summary, e.g.
    /// `3:7: error: expected `:`, found `}``. Positions are displayed
    /// 1-based.
    pub fn format_oneline(&self) -> String {
        let line = self.span.start_inclusive.line() + 1;
        let column = self.span.start_inclusive.column() + 1;
        format!("{line}:{column}: error: {}", self.message)
    }

    /// Formats this error as a multi-line diagnostic with a source
    /// snippet and caret underline:
    ///
    /// ```text
    /// error: expected `:`, found `}`
    ///   --> 3:7
    ///    |
    ///  3 | { user }
    ///    |        ^
    ///    = help: ...
    /// ```
    pub fn format_detailed(&self, source: Option<&str>) -> String {
        let mut output = String::new();

        output.push_str("error: ");
        output.push_str(&self.message);
        output.push('\n');

        let line = self.span.start_inclusive.line() + 1;
        let column = self.span.start_inclusive.column() + 1;
        output.push_str(&format!("  --> {line}:{column}\n"));

        if let Some(src) = source
            && let Some(snippet) = format_snippet(src, &self.span)
        {
            output.push_str(&snippet);
        }

        for note in &self.notes {
            let prefix = match note.kind {
                ErrorNoteKind::General => "note",
                ErrorNoteKind::Help => "help",
            };
            output.push_str(&format!("   = {prefix}: {}\n", note.message));
        }

        output
    }
}

/// Formats a source line with a caret underline for a span.
fn format_snippet(source: &str, span: &SourceSpan) -> Option<String> {
    let line_num = span.start_inclusive.line();
    let line_content = source.lines().nth(line_num)?;

    let display_line_num = line_num + 1;
    let line_num_width = display_line_num.to_string().len().max(2);

    let col_start = span.start_inclusive.column();
    let col_end = if span.end_exclusive.line() == line_num {
        span.end_exclusive.column()
    } else {
        line_content.chars().count()
    };
    let underline_len = col_end.saturating_sub(col_start).max(1);

    let mut output = String::new();
    output.push_str(&format!("{:>width$} |\n", "", width = line_num_width));
    output.push_str(&format!(
        "{display_line_num:>line_num_width$} | {line_content}\n"
    ));
    output.push_str(&format!(
        "{:>width$} | {:>padding$}{}\n",
        "",
        "",
        "^".repeat(underline_len),
        width = line_num_width,
        padding = col_start
    ));
    Some(output)
}
