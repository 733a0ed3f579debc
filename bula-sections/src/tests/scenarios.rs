use bula_text::MarkedTextDisplay;

use super::fixtures::{
    patient_leaflet, plain_lines, professional_leaflet, remove_section, set_body, set_title,
    typeset,
};
use crate::{
    AuditConfig, AuditPipeline, DocumentType, LineSource, SectionStatus, TitleMismatch,
};

const DOSAGE: &str = "6. COMO DEVO USAR ESTE MEDICAMENTO?";
const INDICATION: &str = "1. PARA QUE ESTE MEDICAMENTO É INDICADO?";

fn statuses(report: &crate::AuditReport) -> Vec<(&str, SectionStatus)> {
    report
        .records
        .iter()
        .map(|r| (r.canonical_name.as_str(), r.status))
        .collect()
}

// ============ Identical Documents ============

#[test]
fn identical_leaflets_conform_fully() {
    let leaflet = patient_leaflet();
    let report = AuditPipeline::standard()
        .audit_lines(typeset(&leaflet), typeset(&leaflet))
        .unwrap();

    assert_eq!(report.document_type, DocumentType::Patient);
    assert_eq!(report.records.len(), 12);
    assert!(report
        .records
        .iter()
        .all(|r| r.status == SectionStatus::Identical || r.status == SectionStatus::Ignored));
    assert_eq!(report.status_of("DIZERES LEGAIS"), Some(SectionStatus::Ignored));

    assert_eq!(report.conformity.value, 100.0);
    assert_eq!(report.conformity.scored_sections, 12);
    assert!(!report.conformity.vacuous);
    assert!(report.missing_sections.is_empty());
    assert!(report.title_mismatches.is_empty());
    assert!(report.diffs.is_empty());
    assert!(report.warnings.is_empty());

    assert_eq!(report.target.outline.len(), 12);
    assert_eq!(report.target.approval_date, "12/03/2024");
    assert_eq!(report.target.truncated_lines, 1);
}

#[test]
fn section_bodies_are_extracted() {
    let leaflet = patient_leaflet();
    let report = AuditPipeline::standard()
        .audit_lines(typeset(&leaflet), typeset(&leaflet))
        .unwrap();

    let composition = report.record("COMPOSIÇÃO").unwrap();
    assert_eq!(composition.target_title.as_deref(), Some("COMPOSIÇÃO"));
    assert_eq!(
        composition.target_content,
        "Cada comprimido revestido contém 500 mg de paracetamol.\nExcipientes: amido, povidona e estearato de magnésio."
    );

    // The print mark after the approval stamp is not part of any section
    let legal = report.record("DIZERES LEGAIS").unwrap();
    assert_eq!(
        legal.reference_content,
        "Farm. Resp.: Dra. Maria Souza - CRF-SP 12.345\nAprovado pela Anvisa em 12/03/2024"
    );
}

// ============ Divergent Content ============

#[test]
fn changed_dosage_is_divergent() {
    let reference = patient_leaflet();
    let mut target = patient_leaflet();
    set_body(
        &mut target,
        "6.",
        &["Adultos: tome 1 comprimido a cada 8 horas, sem exceder 3 comprimidos ao dia."],
    );

    let report = AuditPipeline::standard()
        .audit_lines(typeset(&reference), typeset(&target))
        .unwrap();

    assert_eq!(report.status_of(DOSAGE), Some(SectionStatus::Divergent));
    assert_eq!(report.divergent_sections(), vec![DOSAGE]);
    assert_eq!(report.conformity.scored_sections, 12);
    assert!((report.conformity.value - 1100.0 / 12.0).abs() < 1e-9);

    let diff = report.diff(DOSAGE).unwrap();
    assert_eq!(
        diff.reference.render_with("[", "]"),
        "Adultos: tome 1 comprimido a cada [6] horas, sem exceder [4] comprimidos ao dia."
    );
    assert_eq!(
        diff.target.render_with("[", "]"),
        "Adultos: tome 1 comprimido a cada [8] horas, sem exceder [3] comprimidos ao dia."
    );
    assert_eq!((diff.stats.added, diff.stats.removed), (2, 2));
}

#[test]
fn divergent_section_display() {
    let reference = patient_leaflet();
    let mut target = patient_leaflet();
    set_body(
        &mut target,
        "2.",
        &["O paracetamol age no sistema nervoso central reduzindo a sensação de dor intensa."],
    );

    let report = AuditPipeline::standard()
        .audit_lines(typeset(&reference), typeset(&target))
        .unwrap();
    let diff = report.diff("2. COMO ESTE MEDICAMENTO FUNCIONA?").unwrap();

    insta::assert_snapshot!(
        MarkedTextDisplay::new(&diff.target).with_label("added").to_string(),
        @r###"
    O paracetamol age no sistema nervoso central reduzindo a sensação de dor intensa.
                                                                             ╰─────╯added
    "###
    );
}

// ============ Missing Sections ============

#[test]
fn missing_legal_section_is_reported() {
    let reference = patient_leaflet();
    let mut target = patient_leaflet();
    remove_section(&mut target, "DIZERES LEGAIS");

    let report = AuditPipeline::standard()
        .audit_lines(typeset(&reference), typeset(&target))
        .unwrap();

    assert_eq!(report.missing_sections, vec!["DIZERES LEGAIS".to_string()]);
    let legal = report.record("DIZERES LEGAIS").unwrap();
    assert_eq!(legal.status, SectionStatus::Missing);
    assert!(legal.found_in_reference);
    assert!(!legal.found_in_target);

    // Missing sections are not scored
    assert_eq!(report.conformity.scored_sections, 11);
    assert_eq!(report.conformity.value, 100.0);

    // The stamp went with the section
    assert_eq!(report.target.approval_date, "Não encontrada");
    assert_eq!(report.reference.approval_date, "12/03/2024");
}

#[test]
fn efficacy_results_are_not_required() {
    let reference = professional_leaflet();
    let mut target = professional_leaflet();
    remove_section(&mut target, "2.");

    let config = AuditConfig::new().with_document_type(DocumentType::Professional);
    let report = AuditPipeline::standard()
        .with_config(config)
        .audit_lines(typeset(&reference), typeset(&target))
        .unwrap();

    assert_eq!(
        statuses(&report),
        vec![
            ("APRESENTAÇÕES", SectionStatus::Missing),
            ("COMPOSIÇÃO", SectionStatus::Missing),
            ("1. INDICAÇÕES", SectionStatus::Identical),
            ("2. RESULTADOS DE EFICÁCIA", SectionStatus::NotRequired),
            ("3. CARACTERÍSTICAS FARMACOLÓGICAS", SectionStatus::Missing),
            ("4. CONTRAINDICAÇÕES", SectionStatus::Identical),
            ("5. ADVERTÊNCIAS E PRECAUÇÕES", SectionStatus::Missing),
            ("6. INTERAÇÕES MEDICAMENTOSAS", SectionStatus::Missing),
            ("7. CUIDADOS DE ARMAZENAMENTO DO MEDICAMENTO", SectionStatus::Missing),
            ("8. POSOLOGIA E MODO DE USAR", SectionStatus::Missing),
            ("9. REAÇÕES ADVERSAS", SectionStatus::Missing),
            ("10. SUPERDOSE", SectionStatus::Missing),
            ("DIZERES LEGAIS", SectionStatus::Ignored),
        ]
    );
    assert!(!report
        .missing_sections
        .contains(&"2. RESULTADOS DE EFICÁCIA".to_string()));
    assert_eq!(report.missing_sections.len(), 9);
    assert_eq!(report.conformity.scored_sections, 3);
    assert_eq!(report.conformity.value, 100.0);
}

// ============ Titles ============

#[test]
fn alias_titles_are_mapped_and_flagged() {
    let reference = patient_leaflet();
    let mut target = patient_leaflet();
    set_title(&mut target, "1.", "INDICAÇÕES");
    set_title(&mut target, "3.", "3. Quando não devo usar este medicamento?");

    let report = AuditPipeline::standard()
        .audit_lines(typeset(&reference), typeset(&target))
        .unwrap();

    assert_eq!(report.status_of(INDICATION), Some(SectionStatus::Identical));
    assert_eq!(
        report.title_mismatches,
        vec![TitleMismatch {
            canonical_name: INDICATION.to_string(),
            found_title: "INDICAÇÕES".to_string(),
        }]
    );
    assert!(!report
        .record("3. QUANDO NÃO DEVO USAR ESTE MEDICAMENTO?")
        .unwrap()
        .title_mismatch);
    assert_eq!(report.conformity.value, 100.0);
}

// ============ OCR Targets ============

fn ocr_target() -> super::fixtures::Outline {
    let mut target = patient_leaflet();
    set_title(&mut target, "COMPOSIÇÃO", "COMPOSlÇÃO");
    set_title(&mut target, "6.", "6. COMO DEVO UZAR ESTE MEDICAMENTO?");
    target
}

#[test]
fn ocr_target_is_mapped_with_plain_text_strategy() {
    let reference = patient_leaflet();
    let config = AuditConfig::new().with_target_source(LineSource::PlainText);

    let report = AuditPipeline::standard()
        .with_config(config)
        .audit_lines(typeset(&reference), plain_lines(&ocr_target()))
        .unwrap();

    assert!(report.missing_sections.is_empty());
    assert_eq!(report.conformity.value, 100.0);
    assert_eq!(
        report.title_mismatches,
        vec![
            TitleMismatch {
                canonical_name: "COMPOSIÇÃO".to_string(),
                found_title: "COMPOSlÇÃO".to_string(),
            },
            TitleMismatch {
                canonical_name: DOSAGE.to_string(),
                found_title: "6. COMO DEVO UZAR ESTE MEDICAMENTO?".to_string(),
            },
        ]
    );

    let composition = report
        .target
        .outline
        .iter()
        .find(|m| m.canonical_name == "COMPOSIÇÃO")
        .unwrap();
    assert!(composition.match_score >= 85.0 && composition.match_score < 100.0);
}

#[test]
fn ocr_typos_need_the_plain_text_strategy() {
    let reference = patient_leaflet();
    let config = AuditConfig::new().with_target_source(LineSource::FontMetadata);

    let report = AuditPipeline::standard()
        .with_config(config)
        .audit_lines(typeset(&reference), plain_lines(&ocr_target()))
        .unwrap();

    assert!(report.missing_sections.contains(&"COMPOSIÇÃO".to_string()));
    assert!(report.missing_sections.contains(&DOSAGE.to_string()));
}
