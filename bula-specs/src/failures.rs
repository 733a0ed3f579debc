//! Expected failures tracking via TOML file.
//!
//! ```toml
//! [[pending]]
//! fixture = "ocr-plain-target.toml"
//! expectation = "E2"
//! reason = "Two-letter OCR substitutions fall below the plain-text threshold"
//! added = "2024-05-02"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{SpecError, SpecResult};

/// Loaded expected failures configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpectedFailures {
    /// Known limitations of the mapper, not scheduled for a fix.
    #[serde(default)]
    pub known: Vec<FailureEntry>,
    /// Failures awaiting a fix.
    #[serde(default)]
    pub pending: Vec<FailureEntry>,
}

/// A single expected failure entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureEntry {
    /// Fixture path relative to the fixtures directory.
    pub fixture: String,
    /// Expectation reference, `E<index>`.
    pub expectation: String,
    #[serde(default)]
    pub reason: Option<String>,
    /// Date added (YYYY-MM-DD).
    #[serde(default)]
    pub added: Option<String>,
}

/// Failure lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureState {
    Known,
    Pending,
    /// Expected to pass; the failure is a regression.
    Regression,
}

impl ExpectedFailures {
    /// Load from a TOML file. A missing file means no expected failures.
    pub fn load(path: &Path) -> SpecResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| SpecError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| SpecError::from_toml(&content, e))
    }

    pub fn is_expected(&self, fixture: &str, expectation_ref: &str) -> FailureState {
        let matches = |e: &FailureEntry| e.fixture == fixture && e.expectation == expectation_ref;

        if self.known.iter().any(|e| matches(e)) {
            FailureState::Known
        } else if self.pending.iter().any(|e| matches(e)) {
            FailureState::Pending
        } else {
            FailureState::Regression
        }
    }

    pub fn count(&self) -> usize {
        self.known.len() + self.pending.len()
    }

    /// Entry for a specific failure, if it is expected.
    pub fn get_entry(&self, fixture: &str, expectation_ref: &str) -> Option<&FailureEntry> {
        self.known
            .iter()
            .chain(self.pending.iter())
            .find(|e| e.fixture == fixture && e.expectation == expectation_ref)
    }
}

/// Result of running the harness.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarnessResult {
    /// Total expectations checked.
    pub total: usize,
    pub passed: usize,
    /// Failures listed as known or pending.
    pub expected_failures: usize,
    /// Unexpected failures.
    pub regressions: usize,
}

impl HarnessResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// 0 without regressions, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.regressions > 0 {
            1
        } else {
            0
        }
    }

    pub fn success(&self) -> bool {
        self.regressions == 0
    }

    pub fn record_pass(&mut self) {
        self.total += 1;
        self.passed += 1;
    }

    pub fn record_failure(&mut self, state: FailureState) {
        self.total += 1;
        match state {
            FailureState::Known | FailureState::Pending => self.expected_failures += 1,
            FailureState::Regression => self.regressions += 1,
        }
    }
}
