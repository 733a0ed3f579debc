//! Error types for section analysis.

use bula_document::DocumentError;
use thiserror::Error;

/// Errors that halt an analysis run.
#[derive(Debug, Error)]
pub enum AuditError {
    /// A document could not be extracted or had no lines.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The caller's cancel flag was raised.
    #[error("analysis cancelled")]
    Cancelled,

    /// The caller's deadline passed before the run finished.
    #[error("analysis deadline exceeded")]
    DeadlineExceeded,

    /// Configuration could not be parsed or is out of range.
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// A configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A section schema violates its invariants.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Result type for analysis operations.
pub type AuditResult<T> = Result<T, AuditError>;

/// Violations of the section schema invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("canonical section '{0}' appears more than once")]
    DuplicateCanonical(String),

    #[error("alias '{alias}' points to unknown section '{canonical}'")]
    UnknownAliasTarget { alias: String, canonical: String },

    #[error("alias '{alias}' resolves to both '{first}' and '{second}'")]
    ConflictingAlias {
        alias: String,
        first: String,
        second: String,
    },
}

/// Failures of the external spelling collaborator.
///
/// These never abort a run: the pipeline logs them and reports no
/// misspellings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpellCheckError {
    #[error("spell checker unavailable: {0}")]
    Unavailable(String),

    #[error("spell check failed: {0}")]
    Failed(String),
}
