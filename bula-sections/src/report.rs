//! Audit report: everything one analysis run produces.

use bula_document::BulaDocument;
use serde::{Deserialize, Serialize};

use crate::comparator::{ComparisonRecord, ConformityScore, SectionStatus, TitleMismatch};
use crate::config::LineSource;
use crate::mapper::SectionMatch;
use crate::schema::DocumentType;
use crate::word_diff::SectionDiff;

/// What was found in one of the two documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub source: LineSource,
    /// The approval stamp date, or the configured sentinel
    pub approval_date: String,
    pub line_count: usize,
    /// Lines discarded after the approval stamp
    pub truncated_lines: usize,
    /// Mapped section titles in document order
    pub outline: Vec<SectionMatch>,
}

impl DocumentSummary {
    pub fn new(
        document: &BulaDocument,
        source: LineSource,
        outline: Vec<SectionMatch>,
        not_found_sentinel: &str,
    ) -> Self {
        Self {
            source,
            approval_date: document
                .approval_date()
                .as_str_or(not_found_sentinel)
                .to_string(),
            line_count: document.line_count(),
            truncated_lines: document.truncated_lines(),
            outline,
        }
    }
}

/// Complete result of comparing a target leaflet against its reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub document_type: DocumentType,
    pub reference: DocumentSummary,
    pub target: DocumentSummary,
    /// One record per canonical section, in schema order
    pub records: Vec<ComparisonRecord>,
    pub conformity: ConformityScore,
    pub missing_sections: Vec<String>,
    pub title_mismatches: Vec<TitleMismatch>,
    /// Word-level diffs of divergent sections
    pub diffs: Vec<SectionDiff>,
    pub misspelled_words: Vec<String>,
    /// Non-fatal problems met during the run
    pub warnings: Vec<String>,
}

impl AuditReport {
    pub fn record(&self, canonical_name: &str) -> Option<&ComparisonRecord> {
        self.records.iter().find(|r| r.canonical_name == canonical_name)
    }

    pub fn status_of(&self, canonical_name: &str) -> Option<SectionStatus> {
        self.record(canonical_name).map(|r| r.status)
    }

    pub fn divergent_sections(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| r.is_divergent())
            .map(|r| r.canonical_name.as_str())
            .collect()
    }

    pub fn diff(&self, canonical_name: &str) -> Option<&SectionDiff> {
        self.diffs.iter().find(|d| d.canonical_name == canonical_name)
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
