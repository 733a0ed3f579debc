//! Pipeline configuration.

use std::sync::Arc;

use bula_sections::{AuditConfig, AuditPipeline, DictionarySpellChecker};
use serde::{Deserialize, Serialize};

/// Which audit preset a fixture runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixturePreset {
    StructureOnly,
    Standard,
    Full,
}

impl Default for FixturePreset {
    fn default() -> Self {
        FixturePreset::Standard
    }
}

impl FixturePreset {
    /// Build the pipeline, attaching a word-list spell checker when
    /// `dictionary` is non-empty.
    pub fn pipeline(self, config: AuditConfig, dictionary: &[String]) -> AuditPipeline {
        let pipeline = match self {
            FixturePreset::StructureOnly => AuditPipeline::structure_only(),
            FixturePreset::Standard => AuditPipeline::standard(),
            FixturePreset::Full => AuditPipeline::full(),
        }
        .with_config(config);

        if dictionary.is_empty() {
            pipeline
        } else {
            pipeline.with_spell_checker(Arc::new(DictionarySpellChecker::new(dictionary)))
        }
    }
}
