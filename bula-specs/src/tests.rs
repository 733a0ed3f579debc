use std::path::{Path, PathBuf};

use bula_document::DocumentSide;
use bula_sections::SectionStatus;

use crate::{
    check_fixture_expectations, load_fixture, run_fixture, run_harness, BulaFixture,
    ExpectedFailures, Expectation, FixturePreset,
};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

fn fixture(name: &str) -> BulaFixture {
    let path = fixtures_dir().join(name);
    load_fixture(&path).unwrap_or_else(|e| panic!("failed to load {}: {}", name, e))
}

fn assert_all_pass(name: &str) {
    let fixture = fixture(name);
    let report = run_fixture(&fixture).unwrap();
    for result in check_fixture_expectations(&fixture, &report) {
        assert!(
            result.outcome.is_passed(),
            "{} E{}: {} -> {:?}",
            name,
            result.index,
            result.expectation,
            result.outcome
        );
    }
}

#[test]
fn test_identical_patient_fixture() {
    let fixture = fixture("patient/identical-patient.toml");

    assert_eq!(fixture.title.as_deref(), Some("Identical patient leaflets"));
    assert_eq!(fixture.preset, FixturePreset::Standard);
    assert_eq!(fixture.reference.text, fixture.target.text);
    assert_eq!(fixture.expect.len(), 6);
    assert_eq!(
        fixture.expect[4],
        Expectation::ApprovalDate {
            side: DocumentSide::Target,
            date: "12/03/2024".to_string(),
        }
    );

    let lines = fixture.reference.lines();
    assert_eq!(lines[0].text, "APRESENTAÇÕES");
    assert!(lines[0].is_bold);
    assert!(!lines[1].is_bold);

    assert_all_pass("patient/identical-patient.toml");
}

#[test]
fn test_divergent_dosage_fixture() {
    assert_all_pass("patient/divergent-dosage.toml");
}

#[test]
fn test_missing_legal_fixture() {
    let fixture = fixture("patient/missing-legal.toml");
    assert!(!fixture.target.text.contains("DIZERES LEGAIS"));
    assert_all_pass("patient/missing-legal.toml");
}

#[test]
fn test_ocr_plain_target_fixture() {
    let fixture = fixture("patient/ocr-plain-target.toml");
    assert_eq!(
        fixture.config.target_source,
        bula_sections::LineSource::PlainText
    );
    assert_all_pass("patient/ocr-plain-target.toml");
}

#[test]
fn test_misspelled_full_fixture() {
    let fixture = fixture("patient/misspelled-full.toml");
    assert_eq!(fixture.preset, FixturePreset::Full);
    assert_eq!(fixture.dictionary, vec!["tome", "comprimido"]);
    assert_all_pass("patient/misspelled-full.toml");
}

#[test]
fn test_professional_fixture() {
    let fixture = fixture("professional/efficacy-not-required.toml");
    assert_eq!(
        fixture.expect[0],
        Expectation::Status {
            section: "2. RESULTADOS DE EFICÁCIA".to_string(),
            status: SectionStatus::NotRequired,
        }
    );
    assert_all_pass("professional/efficacy-not-required.toml");
}

// ============================================================================
// Harness
// ============================================================================

#[test]
fn test_harness_has_no_regressions() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("expected-failures.toml");
    let expected = ExpectedFailures::load(&path).unwrap();
    let run = run_harness(&fixtures_dir(), &expected).unwrap();

    assert!(run.result.success(), "{}", run.output);
    assert_eq!(run.result.total, run.result.passed + run.result.expected_failures);
    assert!(run.result.total >= 29);
    assert!(run.output.contains("PASS: patient/identical-patient.toml"));
    assert!(!run.output.contains("FAIL:"));
}

#[test]
fn test_harness_classifies_failures() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("broken.toml"),
        r#"
[reference]
text = """
# COMPOSIÇÃO
Cada comprimido revestido contém 500 mg de paracetamol.
"""

[target]
text = """
# COMPOSIÇÃO
Cada comprimido revestido contém 750 mg de paracetamol.
"""

[[expect]]
check = "status"
section = "COMPOSIÇÃO"
status = "identical"

[[expect]]
check = "changed-words"
section = "COMPOSIÇÃO"
words = ["500"]
"#,
    )
    .unwrap();

    let expected: ExpectedFailures = toml::from_str(
        r#"
[[known]]
fixture = "broken.toml"
expectation = "E1"
reason = "Checks the wrong side"
"#,
    )
    .unwrap();

    let run = run_harness(dir.path(), &expected).unwrap();
    assert_eq!(run.result.total, 2);
    assert_eq!(run.result.expected_failures, 1);
    assert_eq!(run.result.regressions, 1);
    assert_eq!(run.result.exit_code(), 1);
    assert!(run.output.contains("FAIL: broken.toml:E0"));
    assert!(run.output.contains("expected failure: Checks the wrong side"));
    assert!(run.output.contains("FAIL: broken.toml\n"));
}
