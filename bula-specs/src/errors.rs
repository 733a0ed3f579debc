//! Error types for the fixture harness.

use bula_sections::AuditError;
use thiserror::Error;

/// Errors that can occur while loading or running fixtures.
#[derive(Debug, Error)]
pub enum SpecError {
    /// The fixture file is not valid fixture TOML.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The fixture file could not be read.
    #[error("failed to load fixture: {path}: {message}")]
    Load { path: String, message: String },

    /// The audit itself failed on the fixture's documents.
    #[error("audit failed: {0}")]
    Audit(#[from] AuditError),

    /// An expectation did not hold.
    #[error("assertion failed: {message}")]
    Assertion { message: String },
}

/// Result type for spec operations.
pub type SpecResult<T> = Result<T, SpecError>;

impl SpecError {
    /// Parse error from a TOML error, locating the line within `content`.
    pub(crate) fn from_toml(content: &str, err: toml::de::Error) -> Self {
        let line = err
            .span()
            .and_then(|span| content.get(..span.start))
            .map_or(0, |before| before.matches('\n').count() + 1);
        SpecError::Parse {
            line,
            message: err.message().to_string(),
        }
    }
}
