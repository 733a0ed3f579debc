//! Core types for `.toml` leaflet fixtures.
//!
//! A fixture holds two documents and the expectations about their audit:
//!
//! ```toml
//! title = "Changed dosage"
//!
//! [reference]
//! text = """
//! # 6. COMO DEVO USAR ESTE MEDICAMENTO?
//! Tome 1 comprimido a cada 6 horas.
//! """
//!
//! [[expect]]
//! check = "status"
//! section = "6. COMO DEVO USAR ESTE MEDICAMENTO?"
//! status = "divergent"
//! ```
//!
//! Document lines starting with `# ` are typeset as bold headings; every other
//! line is regular body text. Blank lines are kept as blank extractor lines.

use std::fmt;

use bula_document::{DocumentSide, StructuredLine};
use bula_sections::{AuditConfig, SectionStatus};
use serde::{Deserialize, Serialize};

use crate::config::FixturePreset;

/// Font size of `# ` heading lines.
pub const HEADING_FONT_SIZE: f32 = 11.0;
/// Font size of body lines.
pub const BODY_FONT_SIZE: f32 = 9.0;
/// Vertical distance between consecutive lines.
const LINE_HEIGHT: f32 = 12.0;

/// A parsed fixture file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulaFixture {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub preset: FixturePreset,
    /// Overrides of the default audit configuration
    #[serde(default)]
    pub config: AuditConfig,
    /// Word list for the spell checker; spelling is skipped when empty
    #[serde(default)]
    pub dictionary: Vec<String>,
    pub reference: FixtureDocument,
    pub target: FixtureDocument,
    #[serde(default)]
    pub expect: Vec<Expectation>,
}

/// One side of a fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureDocument {
    pub text: String,
}

impl FixtureDocument {
    /// Lines as a PDF extractor would report them.
    pub fn lines(&self) -> Vec<StructuredLine> {
        self.text
            .lines()
            .enumerate()
            .map(|(i, line)| {
                let position = i as f32 * LINE_HEIGHT;
                match line.strip_prefix("# ") {
                    Some(heading) => StructuredLine::new(heading, HEADING_FONT_SIZE, true, position),
                    None => StructuredLine::new(line, BODY_FONT_SIZE, false, position),
                }
            })
            .collect()
    }
}

/// A single check against the audit report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "kebab-case")]
pub enum Expectation {
    /// The section's comparison status.
    Status {
        section: String,
        status: SectionStatus,
    },
    /// The target's title for the section is reported as non-canonical.
    TitleMismatch { section: String, found: String },
    /// The target body of the section contains `contains`.
    TargetBody { section: String, contains: String },
    /// Conformity score, to one decimal.
    Conformity { value: f64 },
    /// Every listed section is reported missing.
    Missing { sections: Vec<String> },
    /// No listed section is reported missing.
    Present { sections: Vec<String> },
    /// Target-side changed segments of the section's word diff.
    ChangedWords { section: String, words: Vec<String> },
    /// Approval date (or sentinel) reported for one side.
    ApprovalDate { side: DocumentSide, date: String },
    /// Misspelled words reported for the target, in order.
    Misspelled { words: Vec<String> },
}

impl Expectation {
    /// The section an expectation is about, if any.
    pub fn section(&self) -> Option<&str> {
        match self {
            Expectation::Status { section, .. }
            | Expectation::TitleMismatch { section, .. }
            | Expectation::TargetBody { section, .. }
            | Expectation::ChangedWords { section, .. } => Some(section),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Expectation::Status { .. } => "status",
            Expectation::TitleMismatch { .. } => "title-mismatch",
            Expectation::TargetBody { .. } => "target-body",
            Expectation::Conformity { .. } => "conformity",
            Expectation::Missing { .. } => "missing",
            Expectation::Present { .. } => "present",
            Expectation::ChangedWords { .. } => "changed-words",
            Expectation::ApprovalDate { .. } => "approval-date",
            Expectation::Misspelled { .. } => "misspelled",
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Status { section, status } => {
                write!(f, "status({}) = {:?}", section, status)
            }
            Expectation::TitleMismatch { section, found } => {
                write!(f, "title-mismatch({}) = \"{}\"", section, found)
            }
            Expectation::TargetBody { section, contains } => {
                write!(f, "target-body({}) ~= \"{}\"", section, contains)
            }
            Expectation::Conformity { value } => write!(f, "conformity = {:.1}", value),
            Expectation::Missing { sections } => write!(f, "missing ⊇ {:?}", sections),
            Expectation::Present { sections } => write!(f, "present ⊇ {:?}", sections),
            Expectation::ChangedWords { section, words } => {
                write!(f, "changed-words({}) = {:?}", section, words)
            }
            Expectation::ApprovalDate { side, date } => {
                write!(f, "approval-date({}) = \"{}\"", side, date)
            }
            Expectation::Misspelled { words } => write!(f, "misspelled = {:?}", words),
        }
    }
}

impl BulaFixture {
    /// Reference used in expected-failure entries: `E<index>`.
    pub fn expectation_ref(index: usize) -> String {
        format!("E{}", index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_markers_become_bold_lines() {
        let doc = FixtureDocument {
            text: "# COMPOSIÇÃO\nCada comprimido contém 500 mg.\n\nExcipientes.".to_string(),
        };
        let lines = doc.lines();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].text, "COMPOSIÇÃO");
        assert!(lines[0].is_bold);
        assert_eq!(lines[0].font_size, HEADING_FONT_SIZE);
        assert!(!lines[1].is_bold);
        assert!(lines[2].is_blank());
        assert!(lines[3].vertical_position > lines[1].vertical_position);
    }

    #[test]
    fn expectation_display() {
        let expectation = Expectation::Status {
            section: "COMPOSIÇÃO".to_string(),
            status: SectionStatus::Divergent,
        };
        assert_eq!(expectation.to_string(), "status(COMPOSIÇÃO) = Divergent");
        assert_eq!(expectation.section(), Some("COMPOSIÇÃO"));
        assert_eq!(BulaFixture::expectation_ref(3), "E3");
    }
}
