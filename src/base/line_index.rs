/// Byte offset to line/column conversion for a source text.
///
/// Built once per scanned document; columns are byte columns, which matches
/// the spans the scanner produces.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset + 1);
            }
        }
        Self { line_starts }
    }

    /// Convert an absolute byte offset into a (line, column) pair, 0-indexed.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next_line) => next_line - 1,
        };
        (line, offset - self.line_starts[line])
    }

    /// The byte offset at which the given 0-indexed line starts.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_map_to_lines_and_columns() {
        let index = LineIndex::new("schema:\n  name: Point\n");
        assert_eq!(index.line_col(0), (0, 0));
        assert_eq!(index.line_col(7), (0, 7));
        assert_eq!(index.line_col(8), (1, 0));
        assert_eq!(index.line_col(10), (1, 2));
        assert_eq!(index.line_count(), 3);
    }

    #[test]
    fn empty_text_has_a_single_line() {
        let index = LineIndex::new("");
        assert_eq!(index.line_col(0), (0, 0));
        assert_eq!(index.line_count(), 1);
    }
}
