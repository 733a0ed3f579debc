//! Error types for document construction.

use thiserror::Error;

use crate::document::DocumentSide;

/// Failures that halt analysis of a document pair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The external extractor could not produce text.
    #[error("failed to extract {side} document: {message}")]
    Extraction { side: DocumentSide, message: String },

    /// Extraction succeeded but produced no text lines.
    #[error("{side} document has no text lines")]
    Empty { side: DocumentSide },
}

impl DocumentError {
    pub fn side(&self) -> DocumentSide {
        match self {
            DocumentError::Extraction { side, .. } | DocumentError::Empty { side } => *side,
        }
    }
}
