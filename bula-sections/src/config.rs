//! Analysis configuration.
//!
//! `AuditConfig` holds every tunable of a run. A TOML file may override any
//! subset of fields:
//!
//! ```toml
//! document_type = "profissional"
//! target_source = "plain-text"
//! plain_threshold = 88.0
//! ```

use std::fs;
use std::path::Path;

use bula_document::{DocumentSide, NOT_FOUND};
use serde::{Deserialize, Serialize};

use crate::error::{AuditError, AuditResult};
use crate::schema::{deserialize_document_type, DocumentType, SchemaRegistry, SectionSchema};

/// How a document's lines were produced, which selects the title detection
/// strategy for that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineSource {
    /// Font size and bold flags are accurate (PDF or word processor).
    FontMetadata,
    /// Only text is reliable: OCR output, or a layout whose columns were
    /// flattened by force.
    PlainText,
}

impl Default for LineSource {
    fn default() -> Self {
        LineSource::FontMetadata
    }
}

/// Configuration for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Selects the section schema. Unknown names fall back to the patient
    /// schema.
    #[serde(deserialize_with = "deserialize_document_type")]
    pub document_type: DocumentType,
    pub reference_source: LineSource,
    pub target_source: LineSource,
    /// Minimum title score with font metadata
    pub font_threshold: f64,
    /// Minimum title score for plain text
    pub plain_threshold: f64,
    /// Most lines a plain-text title may span
    pub title_window: usize,
    /// Lines shorter than this are never title candidates
    pub min_title_chars: usize,
    /// Candidates must have fewer words than this
    pub max_title_words: usize,
    /// Longer candidates must have more words than this
    pub min_shape_words: usize,
    /// Lines longer than this count toward the body font size
    pub long_line_chars: usize,
    pub default_body_font_size: f32,
    /// Share of a title's tokens a line must contain to match it
    pub min_title_coverage: f64,
    /// Share of a line's tokens a shape-only candidate must explain
    pub min_line_coverage: f64,
    /// Rendered in place of an approval date that was not found
    pub not_found_sentinel: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            document_type: DocumentType::Patient,
            reference_source: LineSource::FontMetadata,
            target_source: LineSource::FontMetadata,
            font_threshold: 98.0,
            plain_threshold: 85.0,
            title_window: 5,
            min_title_chars: 4,
            max_title_words: 20,
            min_shape_words: 3,
            long_line_chars: 50,
            default_body_font_size: 10.0,
            min_title_coverage: 0.5,
            min_line_coverage: 0.6,
            not_found_sentinel: NOT_FOUND.to_string(),
        }
    }
}

impl AuditConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document_type(mut self, document_type: DocumentType) -> Self {
        self.document_type = document_type;
        self
    }

    pub fn with_reference_source(mut self, source: LineSource) -> Self {
        self.reference_source = source;
        self
    }

    pub fn with_target_source(mut self, source: LineSource) -> Self {
        self.target_source = source;
        self
    }

    /// Use `source` for both documents.
    pub fn with_sources(self, source: LineSource) -> Self {
        self.with_reference_source(source).with_target_source(source)
    }

    pub fn with_thresholds(mut self, font: f64, plain: f64) -> Self {
        self.font_threshold = font;
        self.plain_threshold = plain;
        self
    }

    pub fn with_title_window(mut self, lines: usize) -> Self {
        self.title_window = lines;
        self
    }

    pub fn with_not_found_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.not_found_sentinel = sentinel.into();
        self
    }

    pub fn schema(&self) -> &'static SectionSchema {
        SchemaRegistry::get(self.document_type)
    }

    pub fn source_for(&self, side: DocumentSide) -> LineSource {
        match side {
            DocumentSide::Reference => self.reference_source,
            DocumentSide::Target => self.target_source,
        }
    }

    /// Parse a TOML document. Missing fields keep their defaults.
    pub fn from_toml_str(content: &str) -> AuditResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| AuditError::Config {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> AuditResult<Self> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| AuditError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> AuditResult<()> {
        let invalid = |message: String| Err(AuditError::Config { message });

        for (name, value) in [
            ("font_threshold", self.font_threshold),
            ("plain_threshold", self.plain_threshold),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return invalid(format!("{} must be within 0..=100, got {}", name, value));
            }
        }
        for (name, value) in [
            ("min_title_coverage", self.min_title_coverage),
            ("min_line_coverage", self.min_line_coverage),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return invalid(format!("{} must be within 0..=1, got {}", name, value));
            }
        }
        if self.title_window == 0 {
            return invalid("title_window must be at least 1".to_string());
        }
        if self.default_body_font_size <= 0.0 {
            return invalid("default_body_font_size must be positive".to_string());
        }
        Ok(())
    }
}
