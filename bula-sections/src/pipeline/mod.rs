//! Pipeline presets for running a leaflet audit end to end.
//!
//! Every preset maps both documents and extracts their sections; presets
//! differ in what they do with the sections afterwards.

use std::fmt;
use std::sync::Arc;

use bula_document::{BulaDocument, DocumentSide, LineExtractor, StructuredLine};

use crate::comparator::{ComparisonResult, ConformityScore, SectionComparator};
use crate::config::AuditConfig;
use crate::control::RunControl;
use crate::error::AuditResult;
use crate::extractor::SectionExtractor;
use crate::mapper::{MapperConfig, SectionMapper, SectionMatch};
use crate::report::{AuditReport, DocumentSummary};
use crate::schema::SectionSchema;
use crate::spelling::{check_spelling, SpellChecker, Vocabulary};
use crate::word_diff::diff_divergent_sections;

/// Pipeline preset for auditing a target leaflet against its reference.
///
/// - `structure_only()` - section outlines and missing sections
/// - `standard()` - adds content comparison, conformity and word diffs
/// - `full()` - adds spell checking of the target
#[derive(Clone)]
pub struct AuditPipeline {
    /// Stages to run after mapping (in order)
    stages: Vec<Stage>,
    config: AuditConfig,
    spell_checker: Option<Arc<dyn SpellChecker>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Compare,
    Diff,
    Spelling,
}

impl fmt::Debug for AuditPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditPipeline")
            .field("stages", &self.stages)
            .field("config", &self.config)
            .field("spell_checker", &self.spell_checker.is_some())
            .finish()
    }
}

impl Default for AuditPipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl AuditPipeline {
    /// Section mapping only - fastest preset.
    pub fn structure_only() -> Self {
        Self::with_stages(Vec::new())
    }

    /// Mapping, content comparison and word-level diffs.
    pub fn standard() -> Self {
        Self::with_stages(vec![Stage::Compare, Stage::Diff])
    }

    /// Everything, including spell checking when a checker is set.
    pub fn full() -> Self {
        Self::with_stages(vec![Stage::Compare, Stage::Diff, Stage::Spelling])
    }

    fn with_stages(stages: Vec<Stage>) -> Self {
        Self {
            stages,
            config: AuditConfig::default(),
            spell_checker: None,
        }
    }

    pub fn with_config(mut self, config: AuditConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_spell_checker(mut self, checker: Arc<dyn SpellChecker>) -> Self {
        self.spell_checker = Some(checker);
        self
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    fn runs(&self, stage: Stage) -> bool {
        self.stages.contains(&stage)
    }

    /// Audit two documents with an external extractor.
    pub fn audit_documents<E: LineExtractor>(
        &self,
        extractor: &E,
        reference: &E::Document,
        target: &E::Document,
    ) -> AuditResult<AuditReport> {
        let reference = extractor.extract_lines(reference, DocumentSide::Reference)?;
        let target = extractor.extract_lines(target, DocumentSide::Target)?;
        self.audit_lines(reference, target)
    }

    pub fn audit_lines(
        &self,
        reference: Vec<StructuredLine>,
        target: Vec<StructuredLine>,
    ) -> AuditResult<AuditReport> {
        self.audit_lines_with_control(reference, target, &RunControl::default())
    }

    pub fn audit_lines_with_control(
        &self,
        reference: Vec<StructuredLine>,
        target: Vec<StructuredLine>,
        control: &RunControl,
    ) -> AuditResult<AuditReport> {
        let reference = BulaDocument::try_from_lines(DocumentSide::Reference, reference)?;
        let target = BulaDocument::try_from_lines(DocumentSide::Target, target)?;
        self.audit(&reference, &target, control)
    }

    /// Audit two plain texts, one line per source line.
    pub fn audit_texts(&self, reference: &str, target: &str) -> AuditResult<AuditReport> {
        let lines = |text: &str| -> Vec<StructuredLine> {
            text.lines()
                .enumerate()
                .map(|(i, line)| StructuredLine::plain(line, i as f32))
                .collect()
        };
        self.audit_lines(lines(reference), lines(target))
    }

    /// Audit two already constructed documents.
    pub fn audit(
        &self,
        reference: &BulaDocument,
        target: &BulaDocument,
        control: &RunControl,
    ) -> AuditResult<AuditReport> {
        self.config.validate()?;
        let schema = self.config.schema();
        let mut warnings = Vec::new();

        let reference_mapper = SectionMapper::new(
            schema,
            MapperConfig::for_source(self.config.reference_source, &self.config),
        );
        let target_mapper = SectionMapper::new(
            schema,
            MapperConfig::for_source(self.config.target_source, &self.config),
        );

        let reference_matches = reference_mapper.map_with_control(reference, control)?;
        let target_matches = target_mapper.map_with_control(target, control)?;

        for (side, matches) in [
            (DocumentSide::Reference, &reference_matches),
            (DocumentSide::Target, &target_matches),
        ] {
            if matches.is_empty() {
                let warning = format!("no section titles found in the {} document", side);
                log::warn!("{}", warning);
                warnings.push(warning);
            }
        }

        let reference_sections =
            SectionExtractor::new(&reference_mapper, reference, &reference_matches);
        let target_sections = SectionExtractor::new(&target_mapper, target, &target_matches);

        let comparison = if self.runs(Stage::Compare) {
            SectionComparator::new(schema).compare(&reference_sections, &target_sections)
        } else {
            ComparisonResult {
                records: Vec::new(),
                conformity: ConformityScore::from_records(&[]),
                missing_sections: missing_from_outline(schema, &target_matches),
                title_mismatches: Vec::new(),
            }
        };

        let diffs = if self.runs(Stage::Diff) {
            diff_divergent_sections(&comparison.records, control)?
        } else {
            Vec::new()
        };

        let misspelled_words = if self.runs(Stage::Spelling) {
            self.spell_check(schema, reference, &target_sections, &mut warnings)
        } else {
            Vec::new()
        };

        if comparison.conformity.vacuous && self.runs(Stage::Compare) {
            warnings.push("no section could be scored; conformity defaults to 100".to_string());
        }

        log::info!(
            "audit finished: conformity {:.1} over {} sections, {} missing",
            comparison.conformity.value,
            comparison.conformity.scored_sections,
            comparison.missing_sections.len()
        );

        let sentinel = &self.config.not_found_sentinel;
        Ok(AuditReport {
            document_type: schema.document_type,
            reference: DocumentSummary::new(
                reference,
                self.config.reference_source,
                reference_matches,
                sentinel,
            ),
            target: DocumentSummary::new(
                target,
                self.config.target_source,
                target_matches,
                sentinel,
            ),
            records: comparison.records,
            conformity: comparison.conformity,
            missing_sections: comparison.missing_sections,
            title_mismatches: comparison.title_mismatches,
            diffs,
            misspelled_words,
            warnings,
        })
    }

    fn spell_check(
        &self,
        schema: &SectionSchema,
        reference: &BulaDocument,
        target: &SectionExtractor<'_>,
        warnings: &mut Vec<String>,
    ) -> Vec<String> {
        let checker = match &self.spell_checker {
            Some(checker) => checker,
            None => {
                warnings.push("spell checking requested without a spell checker".to_string());
                return Vec::new();
            }
        };

        let text = schema
            .sections
            .iter()
            .filter(|entry| !entry.ignore_spell_check)
            .filter_map(|entry| target.extract(&entry.canonical_name))
            .map(|content| content.body_text)
            .collect::<Vec<_>>()
            .join("\n");

        let vocabulary = Vocabulary::assemble(reference.full_text(), &text);
        check_spelling(checker.as_ref(), &text, &vocabulary)
    }
}

/// Required sections absent from a target outline.
fn missing_from_outline(schema: &SectionSchema, outline: &[SectionMatch]) -> Vec<String> {
    schema
        .sections
        .iter()
        .filter(|entry| !entry.ignore_missing_check)
        .filter(|entry| !outline.iter().any(|m| m.canonical_name == entry.canonical_name))
        .map(|entry| entry.canonical_name.clone())
        .collect()
}
