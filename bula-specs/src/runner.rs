//! Runs fixtures through the audit pipeline and checks their expectations.

use std::path::Path;

use bula_document::DocumentSide;
use bula_sections::AuditReport;

use crate::failures::{ExpectedFailures, FailureState, HarnessResult};
use crate::fixture::{BulaFixture, Expectation};
use crate::formatter::{format_failure, format_summary};
use crate::loader::load_all_fixtures;
use crate::SpecResult;

/// Outcome of checking a single expectation.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpectationOutcome {
    Passed,
    Failed { expected: String, actual: String },
}

impl ExpectationOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, ExpectationOutcome::Passed)
    }
}

/// One checked expectation of a fixture.
#[derive(Debug, Clone)]
pub struct ExpectationResult {
    /// Position in the fixture's `expect` list
    pub index: usize,
    pub expectation: Expectation,
    pub outcome: ExpectationOutcome,
}

/// Audit the fixture's two documents with its preset and configuration.
pub fn run_fixture(fixture: &BulaFixture) -> SpecResult<AuditReport> {
    let pipeline = fixture
        .preset
        .pipeline(fixture.config.clone(), &fixture.dictionary);
    let report = pipeline.audit_lines(fixture.reference.lines(), fixture.target.lines())?;
    Ok(report)
}

/// Check every expectation of `fixture` against its report.
pub fn check_fixture_expectations(
    fixture: &BulaFixture,
    report: &AuditReport,
) -> Vec<ExpectationResult> {
    fixture
        .expect
        .iter()
        .enumerate()
        .map(|(index, expectation)| ExpectationResult {
            index,
            expectation: expectation.clone(),
            outcome: check_expectation(report, expectation),
        })
        .collect()
}

/// Check one expectation against an audit report.
pub fn check_expectation(report: &AuditReport, expectation: &Expectation) -> ExpectationOutcome {
    match expectation {
        Expectation::Status { section, status } => {
            let actual = report.status_of(section);
            compare(
                format!("{:?}", status),
                actual.map_or_else(|| "no record".to_string(), |s| format!("{:?}", s)),
            )
        }
        Expectation::TitleMismatch { section, found } => {
            let titles: Vec<&str> = report
                .title_mismatches
                .iter()
                .filter(|m| &m.canonical_name == section)
                .map(|m| m.found_title.as_str())
                .collect();
            if titles.contains(&found.as_str()) {
                ExpectationOutcome::Passed
            } else {
                ExpectationOutcome::Failed {
                    expected: format!("\"{}\"", found),
                    actual: format!("{:?}", titles),
                }
            }
        }
        Expectation::TargetBody { section, contains } => match report.record(section) {
            Some(record) if record.target_content.contains(contains.as_str()) => {
                ExpectationOutcome::Passed
            }
            Some(record) => ExpectationOutcome::Failed {
                expected: format!("body containing \"{}\"", contains),
                actual: format!("\"{}\"", record.target_content),
            },
            None => ExpectationOutcome::Failed {
                expected: format!("body containing \"{}\"", contains),
                actual: "no record".to_string(),
            },
        },
        Expectation::Conformity { value } => compare(
            format!("{:.1}", value),
            format!("{:.1}", report.conformity.value),
        ),
        Expectation::Missing { sections } => {
            let absent: Vec<&String> = sections
                .iter()
                .filter(|s| !report.missing_sections.contains(s))
                .collect();
            if absent.is_empty() {
                ExpectationOutcome::Passed
            } else {
                ExpectationOutcome::Failed {
                    expected: format!("{:?} missing", absent),
                    actual: format!("{:?}", report.missing_sections),
                }
            }
        }
        Expectation::Present { sections } => {
            let missing: Vec<&String> = sections
                .iter()
                .filter(|s| report.missing_sections.contains(s))
                .collect();
            if missing.is_empty() {
                ExpectationOutcome::Passed
            } else {
                ExpectationOutcome::Failed {
                    expected: format!("{:?} present", sections),
                    actual: format!("{:?} missing", missing),
                }
            }
        }
        Expectation::ChangedWords { section, words } => {
            let actual = report
                .diff(section)
                .map(|diff| diff.target.changed_texts())
                .unwrap_or_default();
            compare(format!("{:?}", words), format!("{:?}", actual))
        }
        Expectation::ApprovalDate { side, date } => {
            let summary = match side {
                DocumentSide::Reference => &report.reference,
                DocumentSide::Target => &report.target,
            };
            compare(date.clone(), summary.approval_date.clone())
        }
        Expectation::Misspelled { words } => compare(
            format!("{:?}", words),
            format!("{:?}", report.misspelled_words),
        ),
    }
}

fn compare(expected: String, actual: String) -> ExpectationOutcome {
    if expected == actual {
        ExpectationOutcome::Passed
    } else {
        ExpectationOutcome::Failed { expected, actual }
    }
}

/// Counts and formatted output of a harness run.
#[derive(Debug, Clone, Default)]
pub struct HarnessRun {
    pub result: HarnessResult,
    pub output: String,
}

/// Run every fixture under `dir`, classifying failures with `expected`.
pub fn run_harness(dir: &Path, expected: &ExpectedFailures) -> SpecResult<HarnessRun> {
    let mut run = HarnessRun::default();

    for (name, fixture) in load_all_fixtures(dir)? {
        let report = run_fixture(&fixture)?;
        let mut passed = 0;
        let mut failed = 0;
        let mut expected_failures = 0;
        let mut regressions = 0;

        for result in check_fixture_expectations(&fixture, &report) {
            if result.outcome.is_passed() {
                run.result.record_pass();
                passed += 1;
                continue;
            }

            let reference = BulaFixture::expectation_ref(result.index);
            let state = expected.is_expected(&name, &reference);
            run.result.record_failure(state);
            failed += 1;
            match state {
                FailureState::Known | FailureState::Pending => expected_failures += 1,
                FailureState::Regression => regressions += 1,
            }

            run.output.push_str(&format_failure(
                &name,
                &result,
                expected.get_entry(&name, &reference),
            ));
        }

        log::debug!("fixture {}: {} passed, {} failed", name, passed, failed);
        run.output.push_str(&format_summary(
            &name,
            passed,
            failed,
            expected_failures,
            regressions,
        ));
    }

    Ok(run)
}
