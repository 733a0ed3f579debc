//! Word-level differences between two section bodies.

use bula_text::{tokenize, AlignmentStats, MarkedText, Side, Token, TokenAligner, TokenAlignment};
use serde::{Deserialize, Serialize};

use crate::comparator::ComparisonRecord;
use crate::control::RunControl;
use crate::error::AuditResult;

/// One LCS alignment of two texts, renderable from either side.
///
/// Tokens are compared by their content-normal form, so case and accent
/// changes alone are never marked.
#[derive(Debug, Clone)]
pub struct WordDiff {
    reference: Vec<Token>,
    target: Vec<Token>,
    alignment: TokenAlignment,
}

impl WordDiff {
    pub fn new(reference: &str, target: &str) -> Self {
        let reference = tokenize(reference);
        let target = tokenize(target);
        let alignment = TokenAligner::align(&reference, &target);
        Self {
            reference,
            target,
            alignment,
        }
    }

    /// The text of `side` with tokens missing from the other side marked.
    pub fn render(&self, side: Side) -> MarkedText {
        let tokens = match side {
            Side::Left => &self.reference,
            Side::Right => &self.target,
        };
        MarkedText::from_tokens(tokens, &self.alignment.changed_mask(side))
    }

    pub fn stats(&self) -> &AlignmentStats {
        &self.alignment.stats
    }

    pub fn similarity(&self) -> f64 {
        self.alignment.similarity()
    }
}

/// Mark the tokens of `side` that are outside the common subsequence of
/// `reference` and `target`.
pub fn highlight_differences(reference: &str, target: &str, side: Side) -> MarkedText {
    WordDiff::new(reference, target).render(side)
}

/// Both renderings of a divergent section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDiff {
    pub canonical_name: String,
    pub reference: MarkedText,
    pub target: MarkedText,
    pub stats: AlignmentStats,
}

impl SectionDiff {
    pub fn from_record(record: &ComparisonRecord) -> Self {
        let diff = WordDiff::new(&record.reference_content, &record.target_content);
        Self {
            canonical_name: record.canonical_name.clone(),
            reference: diff.render(Side::Left),
            target: diff.render(Side::Right),
            stats: diff.stats().clone(),
        }
    }
}

/// Diff every divergent record, checking `control` before each section.
pub fn diff_divergent_sections(
    records: &[ComparisonRecord],
    control: &RunControl,
) -> AuditResult<Vec<SectionDiff>> {
    let mut diffs = Vec::new();
    for record in records.iter().filter(|r| r.is_divergent()) {
        control.check()?;
        diffs.push(SectionDiff::from_record(record));
    }
    Ok(diffs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bula_text::MarkedTextDisplay;

    #[test]
    fn identical_texts_have_no_marks() {
        let diff = WordDiff::new("Uso oral. Uso adulto.", "USO ORAL.  Uso adulto.");
        assert!(!diff.render(Side::Left).has_changes());
        assert!(!diff.render(Side::Right).has_changes());
        assert_eq!(diff.similarity(), 1.0);
    }

    #[test]
    fn renders_both_sides() {
        let diff = WordDiff::new("Tome 1 comprimido ao dia.", "Tome 2 comprimidos ao dia.");

        insta::assert_snapshot!(
            MarkedTextDisplay::new(&diff.render(Side::Left)).with_label("removed").to_string(),
            @r###"
        Tome 1 comprimido ao dia.
             ╰──────────╯removed
        "###
        );
        insta::assert_snapshot!(
            MarkedTextDisplay::new(&diff.render(Side::Right)).with_label("added").to_string(),
            @r###"
        Tome 2 comprimidos ao dia.
             ╰───────────╯added
        "###
        );
    }

    #[test]
    fn marks_are_symmetric() {
        let a = "Não use em caso de gravidez.";
        let b = "Não use em caso de suspeita de gravidez ou amamentação.";

        let forward = highlight_differences(a, b, Side::Right);
        let backward = highlight_differences(b, a, Side::Left);
        assert_eq!(forward, backward);
        assert_eq!(
            forward.render_with("[", "]"),
            "Não use em caso de [suspeita de] gravidez [ou amamentação]."
        );
        assert!(!highlight_differences(a, b, Side::Left).has_changes());
    }

    #[test]
    fn line_breaks_survive() {
        let marked = highlight_differences("Dor.\nFebre.", "Dor.\nFebre alta.", Side::Right);
        assert_eq!(marked.render_with("<", ">"), "Dor.\nFebre <alta>.");
    }
}
