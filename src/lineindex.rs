use tower_lsp::lsp_types::Position;

/// Maps byte offsets of a document to LSP positions and back. Characters are
/// counted in UTF-16 code units, the LSP default encoding.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        for (idx, ch) in text.char_indices() {
            if ch == '\n' {
                let next = idx + ch.len_utf8();
                line_starts.push(next);
            }
        }
        Self { text, line_starts }
    }

    pub fn position_at(&self, offset: usize) -> Position {
        let offset = self.floor_char_boundary(offset.min(self.text.len()));
        let line = match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index.saturating_sub(1),
        };
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        let character = utf16_len(&self.text[line_start..offset]);
        Position::new(line as u32, character as u32)
    }

    /// Byte offset of `position`, or `None` when it lies outside the document
    /// or past the end of its line.
    pub fn offset_at(&self, position: &Position) -> Option<usize> {
        let line = position.line as usize;
        let line_start = *self.line_starts.get(line)?;
        let line_end = self
            .line_starts
            .get(line + 1)
            .copied()
            .unwrap_or(self.text.len());

        let target = position.character as usize;
        let mut units = 0;
        for (idx, ch) in self.text[line_start..line_end].char_indices() {
            if units == target {
                return Some(line_start + idx);
            }
            if units > target {
                return None;
            }
            units += ch.len_utf16();
        }
        (units == target).then_some(line_end)
    }

    pub fn end_position(&self) -> Position {
        self.position_at(self.text.len())
    }

    fn floor_char_boundary(&self, mut offset: usize) -> usize {
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }
}

fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_round_trip() {
        let text = "ab\ncd\n";
        let index = LineIndex::new(text);

        assert_eq!(index.position_at(4), Position::new(1, 1));
        assert_eq!(index.offset_at(&Position::new(1, 1)), Some(4));
        assert_eq!(index.end_position(), Position::new(2, 0));
    }

    #[test]
    fn test_utf16_columns() {
        // `计` is 3 bytes in UTF-8 and one UTF-16 unit, `😀` is 4 bytes and two units
        let text = "<p>计数</p>\n😀x";
        let index = LineIndex::new(text);
        let close = text.find("</p>").unwrap();

        assert_eq!(index.position_at(close), Position::new(0, 5));
        assert_eq!(index.offset_at(&Position::new(0, 5)), Some(close));
        assert_eq!(index.offset_at(&Position::new(1, 2)), Some(text.len() - 1));
        assert_eq!(index.end_position(), Position::new(1, 3));
    }

    #[test]
    fn test_out_of_range_positions() {
        let index = LineIndex::new("abc\nd");

        assert_eq!(index.offset_at(&Position::new(0, 4)), Some(4));
        assert_eq!(index.offset_at(&Position::new(0, 5)), None);
        assert_eq!(index.offset_at(&Position::new(5, 0)), None);
    }

    #[test]
    fn test_position_inside_surrogate_pair() {
        let index = LineIndex::new("😀x");
        assert_eq!(index.offset_at(&Position::new(0, 1)), None);
    }
}
