//! Offset ↔ point conversion for one document text.
//!
//! The engine works in byte offsets; editor protocols speak in
//! line/column pairs with columns counted in UTF-16 code units. A
//! `LineMap` is built per text and does the conversion both ways.

use crate::model::Point;

pub struct LineMap {
    line_starts: Vec<usize>,
}

impl LineMap {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, c) in text.char_indices() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    pub fn offset_to_point(&self, text: &str, offset: usize) -> Point {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => Point { line, col: 0 },
            Err(next_line_idx) => {
                let line = next_line_idx - 1;
                let line_start = self.line_starts[line];
                let col = text[line_start..offset].encode_utf16().count();
                Point { line, col }
            }
        }
    }

    /// `None` when the line does not exist or the column overshoots the
    /// line. A column exactly at the line's end resolves to the offset of
    /// the line break (or the text end on the last line).
    pub fn point_to_offset(&self, text: &str, point: Point) -> Option<usize> {
        let line_start = *self.line_starts.get(point.line)?;
        let line_end = self
            .line_starts
            .get(point.line + 1)
            .map(|next| next - 1)
            .unwrap_or(text.len());

        let mut col = 0;
        for (i, c) in text[line_start..line_end].char_indices() {
            if col == point.col {
                return Some(line_start + i);
            }
            col += c.len_utf16();
        }
        (col == point.col).then_some(line_end)
    }
}
