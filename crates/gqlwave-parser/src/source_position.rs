/// A position within a source document.
///
/// All values are 0-based:
/// - `line`: 0 = first line of the document
/// - `column`: character offset within the current line (counts
///   characters, not bytes — a 4-byte emoji advances it by 1)
/// - `byte_offset`: byte offset from the start of the document
///
/// Display-facing consumers (error formatting, the response `locations`
/// list) add 1 to `line` and `column`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SourcePosition {
    line: usize,
    column: usize,
    byte_offset: usize,
}

impl SourcePosition {
    /// Creates a new position from 0-based line, column, and byte offset.
    pub fn new(line: usize, column: usize, byte_offset: usize) -> Self {
        Self {
            line,
            column,
            byte_offset,
        }
    }

    /// Returns the 0-based line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the 0-based character column within the current line.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Returns the 0-based byte offset from the start of the document.
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }
}
