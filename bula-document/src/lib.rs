//! Document-level abstractions for bula auditing.
//!
//! `bula-text` works on strings. This crate provides the line sequence every
//! later stage indexes into:
//!
//! ## Core Types
//!
//! - [`StructuredLine`] - one extracted line with font size, boldness,
//!   vertical position and column
//! - [`BulaDocument`] - the ordered, footer-truncated line sequence
//! - [`ApprovalDate`] - the regulatory approval stamp date, if any
//! - [`LineExtractor`] - contract for the external text extractors
//!
//! ## Example
//!
//! ```
//! use bula_document::BulaDocument;
//!
//! let doc = BulaDocument::from_text("DIZERES LEGAIS\nAprovado pela Anvisa em 12/03/2024\nrodapé");
//! assert_eq!(doc.line_count(), 2);
//! assert_eq!(doc.approval_date().to_string(), "12/03/2024");
//! ```

mod document;
mod error;
mod line;
mod stamp;

pub use document::{BulaDocument, DocumentSide, LineSpan};
pub use error::DocumentError;
pub use line::{StructuredLine, PLACEHOLDER_FONT_SIZE};
pub use stamp::{find_approval_date, is_approval_stamp, ApprovalDate, NOT_FOUND};

/// Produces structured lines from a binary document (PDF, word processor,
/// OCR). Implementations live outside this workspace.
///
/// Lines must be in reading order. Font and bold metadata must be accurate
/// or the documented placeholder ([`PLACEHOLDER_FONT_SIZE`], not bold).
pub trait LineExtractor {
    type Document: ?Sized;

    fn extract_lines(
        &self,
        document: &Self::Document,
        side: DocumentSide,
    ) -> Result<Vec<StructuredLine>, DocumentError>;
}
