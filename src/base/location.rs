use std::fmt;

/// A position of a token within a source document (0-indexed).
///
/// `span` is the column width of the token on its starting line;
/// `position` is the absolute byte offset from the start of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    pub position: usize,
    pub span: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize, position: usize, span: usize) -> Self {
        Self {
            line,
            column,
            position,
            span,
        }
    }

    /// The 1-based line number, for user-facing output.
    pub fn display_line(&self) -> usize {
        self.line + 1
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.line, self.column, self.position, self.span
        )
    }
}
