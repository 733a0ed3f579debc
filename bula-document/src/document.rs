//! Line-sequence documents.
//!
//! A `BulaDocument` is the coordinate system of one analysis run: every other
//! component refers to lines by their index here, and nothing reorders or
//! renumbers them after construction.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::line::StructuredLine;
use crate::stamp::{find_approval_date, is_approval_stamp, ApprovalDate};
use crate::DocumentError;

/// Which of the two compared documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentSide {
    /// The reference (approved) document.
    Reference,
    /// The document being audited.
    Target,
}

impl fmt::Display for DocumentSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSide::Reference => f.write_str("reference"),
            DocumentSide::Target => f.write_str("target"),
        }
    }
}

/// A half-open range of line positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSpan {
    pub start: usize,
    /// Exclusive.
    pub end: usize,
}

impl LineSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, position: usize) -> bool {
        position >= self.start && position < self.end
    }
}

/// A document as a sequence of non-blank structured lines.
pub struct BulaDocument {
    /// Non-blank lines up to and including the approval stamp
    lines: Vec<StructuredLine>,
    /// Maps internal line index to the extractor's line index
    line_to_source: Vec<usize>,
    /// Text of every non-blank line before truncation, one per line
    full_text: String,
    approval_date: ApprovalDate,
    /// Lines discarded after the approval stamp
    truncated_lines: usize,
}

impl fmt::Debug for BulaDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulaDocument")
            .field("line_count", &self.lines.len())
            .field("truncated_lines", &self.truncated_lines)
            .field("approval_date", &self.approval_date)
            .finish()
    }
}

impl BulaDocument {
    /// Build a document from extractor output.
    ///
    /// Blank lines are dropped but remembered through
    /// [`source_line_number`](Self::source_line_number). The approval date is
    /// read from the whole text; then every line after the first stamp line
    /// is discarded.
    pub fn from_lines(lines: Vec<StructuredLine>) -> Self {
        let mut kept = Vec::new();
        let mut line_to_source = Vec::new();

        for (source_idx, line) in lines.into_iter().enumerate() {
            if !line.is_blank() {
                kept.push(line);
                line_to_source.push(source_idx);
            }
        }

        let full_text = kept
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let approval_date = find_approval_date(&full_text);

        let mut truncated_lines = 0;
        if let Some(stamp_idx) = kept.iter().position(|l| is_approval_stamp(&l.text)) {
            truncated_lines = kept.len() - stamp_idx - 1;
            kept.truncate(stamp_idx + 1);
            line_to_source.truncate(stamp_idx + 1);
            if truncated_lines > 0 {
                log::debug!("discarded {} lines after approval stamp", truncated_lines);
            }
        }

        Self {
            lines: kept,
            line_to_source,
            full_text,
            approval_date,
            truncated_lines,
        }
    }

    /// Like [`from_lines`](Self::from_lines), but an input without any
    /// non-blank line is an error for `side`.
    pub fn try_from_lines(
        side: DocumentSide,
        lines: Vec<StructuredLine>,
    ) -> Result<Self, DocumentError> {
        let document = Self::from_lines(lines);
        if document.lines.is_empty() {
            return Err(DocumentError::Empty { side });
        }
        Ok(document)
    }

    /// Build a document from plain text, one [`StructuredLine::plain`] per
    /// source line.
    pub fn from_text(text: &str) -> Self {
        let lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| StructuredLine::plain(line, i as f32))
            .collect();
        Self::from_lines(lines)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get_line(&self, index: usize) -> Option<&StructuredLine> {
        self.lines.get(index)
    }

    pub fn lines(&self) -> &[StructuredLine] {
        &self.lines
    }

    pub fn lines_enumerated(&self) -> impl Iterator<Item = (usize, &StructuredLine)> {
        self.lines.iter().enumerate()
    }

    /// Lines in `span`, clamped to the document.
    pub fn lines_in(&self, span: LineSpan) -> &[StructuredLine] {
        let end = span.end.min(self.lines.len());
        let start = span.start.min(end);
        &self.lines[start..end]
    }

    /// Extractor line index (0-based) of an internal line.
    pub fn source_line_number(&self, internal_index: usize) -> Option<usize> {
        self.line_to_source.get(internal_index).copied()
    }

    pub fn line_mapping(&self) -> &[usize] {
        &self.line_to_source
    }

    /// Whether blank lines separated `index` from the line before it in the
    /// extractor output.
    pub fn follows_blank_line(&self, index: usize) -> bool {
        match (
            index.checked_sub(1).and_then(|p| self.source_line_number(p)),
            self.source_line_number(index),
        ) {
            (Some(prev), Some(current)) => current > prev + 1,
            _ => false,
        }
    }

    /// All non-blank text, before footer truncation.
    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn approval_date(&self) -> &ApprovalDate {
        &self.approval_date
    }

    pub fn truncated_lines(&self) -> usize {
        self.truncated_lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_span() {
        let span = LineSpan::new(2, 5);
        assert_eq!(span.len(), 3);
        assert!(span.contains(2));
        assert!(!span.contains(5));
        assert!(LineSpan::new(4, 1).is_empty());
    }

    #[test]
    fn test_document_from_text() {
        let doc = BulaDocument::from_text("APRESENTAÇÕES\nComprimidos.\n\nUSO ORAL");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.approval_date(), &ApprovalDate::NotFound);
    }

    #[test]
    fn test_source_line_numbers() {
        let doc = BulaDocument::from_text("Linha 1\nLinha 2\n\n\nLinha 5\nLinha 6");
        assert_eq!(doc.line_count(), 4);
        assert_eq!(doc.source_line_number(0), Some(0));
        assert_eq!(doc.source_line_number(2), Some(4));
        assert_eq!(doc.source_line_number(4), None);
        assert!(doc.follows_blank_line(2));
        assert!(!doc.follows_blank_line(1));
        assert!(!doc.follows_blank_line(0));
    }

    #[test]
    fn test_footer_truncation() {
        let doc = BulaDocument::from_text(
            "DIZERES LEGAIS\nFarm. Resp.: Fulano\nAprovado pela Anvisa em 12/03/2024\nCódigo 123\nLayout v2",
        );
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.truncated_lines(), 2);
        assert_eq!(doc.approval_date().to_string(), "12/03/2024");
        assert!(doc.full_text().contains("Layout v2"));
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let err = BulaDocument::try_from_lines(
            DocumentSide::Target,
            vec![StructuredLine::plain("   ", 0.0)],
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "target document has no text lines");
    }

    #[test]
    fn test_lines_in_clamps() {
        let doc = BulaDocument::from_text("a\nb\nc");
        assert_eq!(doc.lines_in(LineSpan::new(1, 10)).len(), 2);
        assert!(doc.lines_in(LineSpan::new(7, 9)).is_empty());
    }
}
