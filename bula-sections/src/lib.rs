//! Section analysis for pharmaceutical package inserts.
//!
//! This crate turns two [`BulaDocument`](bula_document::BulaDocument)s (an
//! approved reference and a target under review) into an [`AuditReport`]:
//!
//! ## Section Schemas
//!
//! - [`SchemaRegistry`] - built-in canonical sections and alias titles for
//!   patient and professional leaflets
//! - [`AuditConfig`] - thresholds, line sources and the document type,
//!   loadable from TOML
//!
//! ## Mapping and Extraction
//!
//! - [`SectionMapper`] - locates canonical titles, using font metadata or
//!   line shape through a [`LineClassifier`]
//! - [`SectionExtractor`] - bounds and reflows section bodies
//!
//! ## Comparison
//!
//! - [`SectionComparator`] - per-section status and the conformity score
//! - [`WordDiff`] - word-level marks for divergent sections
//! - [`SpellChecker`] - collaborator contract plus a word-list implementation
//!
//! ## Pipeline
//!
//! [`AuditPipeline`] runs everything in order. Presets choose how far to go:
//! `structure_only()`, `standard()` or `full()`.
//!
//! ## Example
//!
//! ```
//! use bula_sections::{AuditConfig, AuditPipeline, LineSource, SectionStatus};
//!
//! let reference = "COMPOSIÇÃO\nParacetamol 500 mg\nDIZERES LEGAIS\nFarm. Resp.: Dr. Fulano";
//! let target = "COMPOSIÇÃO\nParacetamol 750 mg\nDIZERES LEGAIS\nFarm. Resp.: Dr. Beltrano";
//!
//! let report = AuditPipeline::standard()
//!     .with_config(AuditConfig::new().with_sources(LineSource::PlainText))
//!     .audit_texts(reference, target)
//!     .unwrap();
//!
//! assert_eq!(report.status_of("COMPOSIÇÃO"), Some(SectionStatus::Divergent));
//! assert_eq!(report.status_of("DIZERES LEGAIS"), Some(SectionStatus::Ignored));
//! ```

mod classify;
mod comparator;
mod config;
mod control;
mod error;
mod extractor;
mod mapper;
mod patterns;
mod report;
mod schema;
mod spelling;
mod word_diff;

// Pipeline presets for running an audit end to end
pub mod pipeline;

pub use classify::{
    LineClassifier, ShapeClassifier, ShapeRule, StructuralClassifier, TitleSignal, TitleWindow,
};
pub use comparator::{
    ComparisonRecord, ComparisonResult, ConformityScore, SectionComparator, SectionStatus,
    TitleMismatch,
};
pub use config::{AuditConfig, LineSource};
pub use control::RunControl;
pub use error::{AuditError, AuditResult, SchemaError, SpellCheckError};
pub use extractor::{SectionContent, SectionExtractor};
pub use mapper::{
    body_font_size, CoverageGuard, MapperConfig, SectionMapper, SectionMatch, TitleHit,
    TitleIndex,
};
pub use patterns::{is_domain_term, is_layout_noise, NoisePattern, DOMAIN_TERMS, LAYOUT_NOISE};
pub use pipeline::AuditPipeline;
pub use report::{AuditReport, DocumentSummary};
pub use schema::{AliasTitle, DocumentType, SchemaRegistry, SectionSchema, SectionSchemaEntry};
pub use spelling::{
    check_spelling, entity_like_tokens, DictionarySpellChecker, SpellChecker, Vocabulary,
};
pub use word_diff::{diff_divergent_sections, highlight_differences, SectionDiff, WordDiff};
