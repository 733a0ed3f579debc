//! Failure and summary formatting for harness output.

use std::fmt::Write;

use crate::failures::FailureEntry;
use crate::fixture::{BulaFixture, Expectation};
use crate::runner::{ExpectationOutcome, ExpectationResult};

/// Format a failed expectation with its expected and actual values.
pub fn format_failure(
    fixture_name: &str,
    result: &ExpectationResult,
    entry: Option<&FailureEntry>,
) -> String {
    let mut output = String::new();
    let reference = BulaFixture::expectation_ref(result.index);

    writeln!(output, "\nFAIL: {}:{}", fixture_name, reference).unwrap();
    writeln!(output, "  {}", result.expectation).unwrap();

    match &result.outcome {
        ExpectationOutcome::Failed { expected, actual } => {
            writeln!(output, "    expected: {}", expected).unwrap();
            writeln!(output, "    found:    {}", actual).unwrap();
        }
        ExpectationOutcome::Passed => {
            writeln!(output, "  (passed)").unwrap();
        }
    }

    if let Some(entry) = entry {
        let reason = entry.reason.as_deref().unwrap_or("no reason given");
        writeln!(output, "  expected failure: {}", reason).unwrap();
    } else if let Some(hint) = generate_hint(result) {
        writeln!(output, "  hint: {}", hint).unwrap();
    }

    output
}

/// Format the per-fixture summary line.
pub fn format_summary(
    fixture_name: &str,
    passed: usize,
    failed: usize,
    expected_failures: usize,
    regressions: usize,
) -> String {
    let mut output = String::new();
    let status = if regressions > 0 { "FAIL" } else { "PASS" };

    writeln!(output, "\n{}: {}", status, fixture_name).unwrap();
    writeln!(
        output,
        "  {} passed, {} failed ({} expected, {} regressions)",
        passed, failed, expected_failures, regressions
    )
    .unwrap();

    output
}

fn generate_hint(result: &ExpectationResult) -> Option<String> {
    let actual = match &result.outcome {
        ExpectationOutcome::Failed { actual, .. } => actual,
        ExpectationOutcome::Passed => return None,
    };

    match &result.expectation {
        Expectation::Status { .. } if actual == "Missing" => Some(
            "the target title did not reach the threshold; OCR text needs target_source = \"plain-text\""
                .to_string(),
        ),
        Expectation::Status { .. } | Expectation::TargetBody { .. } if actual == "no record" => {
            Some("the section name is not a canonical name of the selected schema".to_string())
        }
        Expectation::ChangedWords { .. } if actual == "[]" => {
            Some("only divergent sections have a word diff".to_string())
        }
        _ => None,
    }
}
