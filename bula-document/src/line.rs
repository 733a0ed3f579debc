use bula_text::display_normalize;
use serde::{Deserialize, Serialize};

/// Font size recorded for lines from sources without reliable font metadata.
pub const PLACEHOLDER_FONT_SIZE: f32 = 10.0;

/// One visually distinct line of extracted text.
///
/// Lines come from an external extractor in reading order (pages and columns
/// already flattened). Text is cleaned on construction: invisible characters
/// are stripped and whitespace is collapsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredLine {
    pub text: String,
    /// Nominal font size, or [`PLACEHOLDER_FONT_SIZE`].
    pub font_size: f32,
    pub is_bold: bool,
    /// Monotonic within a page and column. Only used to decide whether a
    /// hyphenated line may be joined with the next one.
    pub vertical_position: f32,
    /// Column index on the page (0 for single-column layouts).
    #[serde(default)]
    pub column: u16,
}

impl StructuredLine {
    pub fn new(text: &str, font_size: f32, is_bold: bool, vertical_position: f32) -> Self {
        Self {
            text: display_normalize(text).replace('\n', " "),
            font_size,
            is_bold,
            vertical_position,
            column: 0,
        }
    }

    /// A line without layout metadata.
    pub fn plain(text: &str, vertical_position: f32) -> Self {
        Self::new(text, PLACEHOLDER_FONT_SIZE, false, vertical_position)
    }

    pub fn in_column(mut self, column: u16) -> Self {
        self.column = column;
        self
    }

    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_cleans_text() {
        let line = StructuredLine::new("  4.\u{00A0}O QUE\u{200B} DEVO\nSABER ", 11.0, true, 120.0);
        assert_eq!(line.text, "4. O QUE DEVO SABER");
        assert_eq!(line.word_count(), 5);
        assert!(line.is_bold);
    }

    #[test]
    fn plain_lines_use_placeholder_font() {
        let line = StructuredLine::plain("Uso oral", 3.0).in_column(1);
        assert_eq!(line.font_size, PLACEHOLDER_FONT_SIZE);
        assert!(!line.is_bold);
        assert_eq!(line.column, 1);
        assert_eq!(line.char_count(), 8);
    }
}
