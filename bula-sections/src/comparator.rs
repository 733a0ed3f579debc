//! Cross-document section comparison.
//!
//! For every canonical section in schema order the comparator decides whether
//! it is missing from the target, ignored, identical or divergent, and derives
//! the conformity score from the sections that could be scored.

use bula_text::{content_normalize, title_normalize};
use serde::{Deserialize, Serialize};

use crate::extractor::{SectionContent, SectionExtractor};
use crate::schema::{SectionSchema, SectionSchemaEntry};

/// Outcome for one canonical section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionStatus {
    /// Bodies agree after content normalization.
    Identical,
    /// Bodies differ after content normalization.
    Divergent,
    /// Present on both sides; content comparison is disabled for the section.
    Ignored,
    /// Absent from the target.
    Missing,
    /// Absent from the target, but the section is exempt from the missing check.
    NotRequired,
    /// Present in the target only. Not scored.
    TargetOnly,
    /// Absent from both documents and exempt from the missing check.
    Absent,
}

impl SectionStatus {
    /// Contribution to the conformity score, or `None` when not scored.
    pub fn score(self) -> Option<f64> {
        match self {
            SectionStatus::Identical | SectionStatus::Ignored => Some(100.0),
            SectionStatus::Divergent => Some(0.0),
            _ => None,
        }
    }
}

/// Per-section comparison record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub canonical_name: String,
    pub status: SectionStatus,
    pub found_in_reference: bool,
    pub found_in_target: bool,
    pub reference_title: Option<String>,
    pub target_title: Option<String>,
    pub reference_content: String,
    pub target_content: String,
    /// Present on both sides, and the target's title differs from the
    /// canonical title after title normalization.
    pub title_mismatch: bool,
}

impl ComparisonRecord {
    pub fn is_divergent(&self) -> bool {
        self.status == SectionStatus::Divergent
    }

    pub fn is_missing(&self) -> bool {
        self.status == SectionStatus::Missing
    }
}

/// Share of scored sections that conform, 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConformityScore {
    pub value: f64,
    pub scored_sections: usize,
    /// No section could be scored; `value` is 100 by convention.
    pub vacuous: bool,
}

impl ConformityScore {
    pub fn from_records(records: &[ComparisonRecord]) -> Self {
        let scores: Vec<f64> = records.iter().filter_map(|r| r.status.score()).collect();
        if scores.is_empty() {
            return Self {
                value: 100.0,
                scored_sections: 0,
                vacuous: true,
            };
        }
        Self {
            value: scores.iter().sum::<f64>() / scores.len() as f64,
            scored_sections: scores.len(),
            vacuous: false,
        }
    }
}

/// A section whose target title is not the canonical wording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleMismatch {
    pub canonical_name: String,
    pub found_title: String,
}

/// Result of comparing two mapped documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub records: Vec<ComparisonRecord>,
    pub conformity: ConformityScore,
    pub missing_sections: Vec<String>,
    pub title_mismatches: Vec<TitleMismatch>,
}

impl ComparisonResult {
    pub fn record(&self, canonical_name: &str) -> Option<&ComparisonRecord> {
        self.records.iter().find(|r| r.canonical_name == canonical_name)
    }

    pub fn divergent(&self) -> impl Iterator<Item = &ComparisonRecord> {
        self.records.iter().filter(|r| r.is_divergent())
    }
}

/// Compares the sections of a reference and a target document.
#[derive(Debug, Clone, Copy)]
pub struct SectionComparator<'s> {
    schema: &'s SectionSchema,
}

impl<'s> SectionComparator<'s> {
    pub fn new(schema: &'s SectionSchema) -> Self {
        Self { schema }
    }

    pub fn compare(
        &self,
        reference: &SectionExtractor<'_>,
        target: &SectionExtractor<'_>,
    ) -> ComparisonResult {
        let records: Vec<ComparisonRecord> = self
            .schema
            .sections
            .iter()
            .map(|entry| {
                self.compare_section(
                    entry,
                    reference.extract(&entry.canonical_name),
                    target.extract(&entry.canonical_name),
                )
            })
            .collect();

        let missing_sections = records
            .iter()
            .filter(|r| r.is_missing())
            .map(|r| r.canonical_name.clone())
            .collect();
        let title_mismatches = records
            .iter()
            .filter(|r| r.title_mismatch)
            .filter_map(|r| {
                r.target_title.as_ref().map(|title| TitleMismatch {
                    canonical_name: r.canonical_name.clone(),
                    found_title: title.clone(),
                })
            })
            .collect();

        ComparisonResult {
            conformity: ConformityScore::from_records(&records),
            records,
            missing_sections,
            title_mismatches,
        }
    }

    /// Decide the status of one section from its extracted contents.
    pub fn compare_section(
        &self,
        entry: &SectionSchemaEntry,
        reference: Option<SectionContent>,
        target: Option<SectionContent>,
    ) -> ComparisonRecord {
        let status = match (&reference, &target) {
            (_, None) if entry.ignore_missing_check => {
                if reference.is_some() {
                    SectionStatus::NotRequired
                } else {
                    SectionStatus::Absent
                }
            }
            (_, None) => SectionStatus::Missing,
            (None, Some(_)) => SectionStatus::TargetOnly,
            (Some(_), Some(_)) if entry.ignore_content_comparison => SectionStatus::Ignored,
            (Some(a), Some(b)) => {
                if content_normalize(&a.body_text) == content_normalize(&b.body_text) {
                    SectionStatus::Identical
                } else {
                    SectionStatus::Divergent
                }
            }
        };

        let title_mismatch = match (&reference, &target) {
            (Some(_), Some(b)) => {
                title_normalize(&b.matched_title) != title_normalize(&entry.canonical_name)
            }
            _ => false,
        };

        if status == SectionStatus::Missing {
            log::debug!("section '{}' missing from target", entry.canonical_name);
        }

        ComparisonRecord {
            canonical_name: entry.canonical_name.clone(),
            status,
            found_in_reference: reference.is_some(),
            found_in_target: target.is_some(),
            title_mismatch,
            reference_title: reference.as_ref().map(|c| c.matched_title.clone()),
            target_title: target.as_ref().map(|c| c.matched_title.clone()),
            reference_content: reference.map(|c| c.body_text).unwrap_or_default(),
            target_content: target.map(|c| c.body_text).unwrap_or_default(),
        }
    }
}
