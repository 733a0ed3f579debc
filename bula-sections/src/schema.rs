//! Section schema registry.
//!
//! Each document type has a fixed, ordered catalogue of canonical section
//! titles plus an alias table of historically seen alternate titles. Alias
//! tables are separate per document type: `SUPERDOSE` is an alias of the
//! patient leaflet's section 9 but the canonical title of the professional
//! leaflet's section 10.

use std::collections::{HashMap, HashSet};
use std::fmt;

use bula_text::{fold_case_and_accents, title_normalize};
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SchemaError;

/// The leaflet audience, which selects the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentType {
    Patient,
    Professional,
}

impl Default for DocumentType {
    fn default() -> Self {
        DocumentType::Patient
    }
}

impl DocumentType {
    /// Parse a document type name (English or Portuguese, any case).
    pub fn parse(name: &str) -> Option<Self> {
        match fold_case_and_accents(name).as_str() {
            "patient" | "paciente" => Some(DocumentType::Patient),
            "professional" | "profissional" => Some(DocumentType::Professional),
            _ => None,
        }
    }

    /// Parse, falling back to the default type for unknown names.
    pub fn parse_or_default(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            log::warn!("unknown document type '{}', using the default schema", name);
            Self::default()
        })
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentType::Patient => f.write_str("patient"),
            DocumentType::Professional => f.write_str("professional"),
        }
    }
}

/// Deserialize a document type, falling back to the default for unknown names.
pub(crate) fn deserialize_document_type<'de, D>(deserializer: D) -> Result<DocumentType, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    Ok(DocumentType::parse_or_default(&name))
}

/// One canonical section definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSchemaEntry {
    pub canonical_name: String,
    /// Numbering as printed (`"4"`), empty for unnumbered sections.
    pub number_prefix: String,
    pub ignore_content_comparison: bool,
    pub ignore_spell_check: bool,
    pub ignore_missing_check: bool,
}

/// An alternate title and the canonical section it stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasTitle {
    pub alias: String,
    pub canonical_name: String,
}

/// The immutable schema of one document type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSchema {
    pub document_type: DocumentType,
    pub sections: Vec<SectionSchemaEntry>,
    pub aliases: Vec<AliasTitle>,
}

impl SectionSchema {
    pub fn entry(&self, canonical_name: &str) -> Option<&SectionSchemaEntry> {
        self.sections
            .iter()
            .find(|e| e.canonical_name == canonical_name)
    }

    pub fn contains(&self, canonical_name: &str) -> bool {
        self.entry(canonical_name).is_some()
    }

    /// Canonical section an alias maps to, compared in title-normal form.
    pub fn resolve_alias(&self, title: &str) -> Option<&str> {
        let normalized = title_normalize(title);
        self.aliases
            .iter()
            .find(|a| title_normalize(&a.alias) == normalized)
            .map(|a| a.canonical_name.as_str())
    }

    /// The canonical title followed by every alias of it, in registry order.
    pub fn known_titles<'a>(
        &'a self,
        canonical_name: &'a str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.entry(canonical_name)
            .map(|e| e.canonical_name.as_str())
            .into_iter()
            .chain(
                self.aliases
                    .iter()
                    .filter(move |a| a.canonical_name == canonical_name)
                    .map(|a| a.alias.as_str()),
            )
    }

    /// Check the registry invariants: unique canonical names, aliases pointing
    /// at existing sections, and no alias resolving to two sections.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        let mut by_normal_form: HashMap<String, &str> = HashMap::new();

        for entry in &self.sections {
            if !seen.insert(entry.canonical_name.as_str()) {
                return Err(SchemaError::DuplicateCanonical(entry.canonical_name.clone()));
            }
            by_normal_form.insert(title_normalize(&entry.canonical_name), &entry.canonical_name);
        }

        for alias in &self.aliases {
            if !seen.contains(alias.canonical_name.as_str()) {
                return Err(SchemaError::UnknownAliasTarget {
                    alias: alias.alias.clone(),
                    canonical: alias.canonical_name.clone(),
                });
            }
            let normalized = title_normalize(&alias.alias);
            match by_normal_form.get(&normalized) {
                Some(existing) if *existing != alias.canonical_name => {
                    return Err(SchemaError::ConflictingAlias {
                        alias: alias.alias.clone(),
                        first: existing.to_string(),
                        second: alias.canonical_name.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    by_normal_form.insert(normalized, &alias.canonical_name);
                }
            }
        }

        Ok(())
    }
}

// ============ STATIC REGISTRY ============

/// (canonical name, number prefix, ignore content, ignore spelling, ignore missing)
type EntryDef = (&'static str, &'static str, bool, bool, bool);

const PATIENT_SECTIONS: &[EntryDef] = &[
    ("APRESENTAÇÕES", "", false, true, false),
    ("COMPOSIÇÃO", "", false, true, false),
    ("1. PARA QUE ESTE MEDICAMENTO É INDICADO?", "1", false, false, false),
    ("2. COMO ESTE MEDICAMENTO FUNCIONA?", "2", false, false, false),
    ("3. QUANDO NÃO DEVO USAR ESTE MEDICAMENTO?", "3", false, false, false),
    ("4. O QUE DEVO SABER ANTES DE USAR ESTE MEDICAMENTO?", "4", false, false, false),
    ("5. ONDE, COMO E POR QUANTO TEMPO POSSO GUARDAR ESTE MEDICAMENTO?", "5", false, false, false),
    ("6. COMO DEVO USAR ESTE MEDICAMENTO?", "6", false, false, false),
    ("7. O QUE DEVO FAZER QUANDO EU ME ESQUECER DE USAR ESTE MEDICAMENTO?", "7", false, false, false),
    ("8. QUAIS OS MALES QUE ESTE MEDICAMENTO PODE ME CAUSAR?", "8", false, false, false),
    (
        "9. O QUE FAZER SE ALGUÉM USAR UMA QUANTIDADE MAIOR DO QUE A INDICADA DESTE MEDICAMENTO?",
        "9",
        false,
        false,
        false,
    ),
    ("DIZERES LEGAIS", "", true, true, false),
];

const PATIENT_ALIASES: &[(&str, &str)] = &[
    ("APRESENTAÇÃO", "APRESENTAÇÕES"),
    ("INDICAÇÕES", "1. PARA QUE ESTE MEDICAMENTO É INDICADO?"),
    ("COMO FUNCIONA ESTE MEDICAMENTO?", "2. COMO ESTE MEDICAMENTO FUNCIONA?"),
    ("CONTRAINDICAÇÕES", "3. QUANDO NÃO DEVO USAR ESTE MEDICAMENTO?"),
    ("ADVERTÊNCIAS E PRECAUÇÕES", "4. O QUE DEVO SABER ANTES DE USAR ESTE MEDICAMENTO?"),
    (
        "CUIDADOS DE ARMAZENAMENTO DO MEDICAMENTO",
        "5. ONDE, COMO E POR QUANTO TEMPO POSSO GUARDAR ESTE MEDICAMENTO?",
    ),
    ("POSOLOGIA E MODO DE USAR", "6. COMO DEVO USAR ESTE MEDICAMENTO?"),
    ("COMO DEVO TOMAR ESTE MEDICAMENTO?", "6. COMO DEVO USAR ESTE MEDICAMENTO?"),
    (
        "O QUE DEVO FAZER QUANDO EU ME ESQUECER DE TOMAR ESTE MEDICAMENTO?",
        "7. O QUE DEVO FAZER QUANDO EU ME ESQUECER DE USAR ESTE MEDICAMENTO?",
    ),
    ("REAÇÕES ADVERSAS", "8. QUAIS OS MALES QUE ESTE MEDICAMENTO PODE ME CAUSAR?"),
    (
        "SUPERDOSE",
        "9. O QUE FAZER SE ALGUÉM USAR UMA QUANTIDADE MAIOR DO QUE A INDICADA DESTE MEDICAMENTO?",
    ),
];

const PROFESSIONAL_SECTIONS: &[EntryDef] = &[
    ("APRESENTAÇÕES", "", false, true, false),
    ("COMPOSIÇÃO", "", false, true, false),
    ("1. INDICAÇÕES", "1", false, false, false),
    ("2. RESULTADOS DE EFICÁCIA", "2", false, true, true),
    ("3. CARACTERÍSTICAS FARMACOLÓGICAS", "3", false, true, false),
    ("4. CONTRAINDICAÇÕES", "4", false, false, false),
    ("5. ADVERTÊNCIAS E PRECAUÇÕES", "5", false, false, false),
    ("6. INTERAÇÕES MEDICAMENTOSAS", "6", false, false, false),
    ("7. CUIDADOS DE ARMAZENAMENTO DO MEDICAMENTO", "7", false, false, false),
    ("8. POSOLOGIA E MODO DE USAR", "8", false, false, false),
    ("9. REAÇÕES ADVERSAS", "9", false, false, false),
    ("10. SUPERDOSE", "10", false, false, false),
    ("DIZERES LEGAIS", "", true, true, false),
];

const PROFESSIONAL_ALIASES: &[(&str, &str)] = &[
    ("APRESENTAÇÃO", "APRESENTAÇÕES"),
    ("PARA QUE ESTE MEDICAMENTO É INDICADO?", "1. INDICAÇÕES"),
    ("PROPRIEDADES FARMACOLÓGICAS", "3. CARACTERÍSTICAS FARMACOLÓGICAS"),
    ("QUANDO NÃO DEVO USAR ESTE MEDICAMENTO?", "4. CONTRAINDICAÇÕES"),
    ("ADVERTÊNCIAS", "5. ADVERTÊNCIAS E PRECAUÇÕES"),
    ("POSOLOGIA", "8. POSOLOGIA E MODO DE USAR"),
    ("EFEITOS ADVERSOS", "9. REAÇÕES ADVERSAS"),
    (
        "O QUE FAZER SE ALGUÉM USAR UMA QUANTIDADE MAIOR DO QUE A INDICADA DESTE MEDICAMENTO?",
        "10. SUPERDOSE",
    ),
    ("SUPERDOSAGEM", "10. SUPERDOSE"),
];

fn build(
    document_type: DocumentType,
    sections: &[EntryDef],
    aliases: &[(&str, &str)],
) -> SectionSchema {
    SectionSchema {
        document_type,
        sections: sections
            .iter()
            .map(
                |&(name, prefix, ignore_content, ignore_spell, ignore_missing)| SectionSchemaEntry {
                    canonical_name: name.to_string(),
                    number_prefix: prefix.to_string(),
                    ignore_content_comparison: ignore_content,
                    ignore_spell_check: ignore_spell,
                    ignore_missing_check: ignore_missing,
                },
            )
            .collect(),
        aliases: aliases
            .iter()
            .map(|&(alias, canonical)| AliasTitle {
                alias: alias.to_string(),
                canonical_name: canonical.to_string(),
            })
            .collect(),
    }
}

static PATIENT_SCHEMA: Lazy<SectionSchema> =
    Lazy::new(|| build(DocumentType::Patient, PATIENT_SECTIONS, PATIENT_ALIASES));

static PROFESSIONAL_SCHEMA: Lazy<SectionSchema> = Lazy::new(|| {
    build(
        DocumentType::Professional,
        PROFESSIONAL_SECTIONS,
        PROFESSIONAL_ALIASES,
    )
});

/// Static lookup of the built-in schemas.
pub struct SchemaRegistry;

impl SchemaRegistry {
    pub fn get(document_type: DocumentType) -> &'static SectionSchema {
        match document_type {
            DocumentType::Patient => &PATIENT_SCHEMA,
            DocumentType::Professional => &PROFESSIONAL_SCHEMA,
        }
    }

    /// Schema for a document type name. Unknown names get the default schema.
    pub fn lookup(name: &str) -> &'static SectionSchema {
        Self::get(DocumentType::parse_or_default(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_schemas_are_valid() {
        assert_eq!(SchemaRegistry::get(DocumentType::Patient).validate(), Ok(()));
        assert_eq!(SchemaRegistry::get(DocumentType::Professional).validate(), Ok(()));
    }

    #[test]
    fn alias_resolution_depends_on_document_type() {
        let patient = SchemaRegistry::get(DocumentType::Patient);
        let professional = SchemaRegistry::get(DocumentType::Professional);

        assert_eq!(
            patient.resolve_alias("Superdose"),
            Some("9. O QUE FAZER SE ALGUÉM USAR UMA QUANTIDADE MAIOR DO QUE A INDICADA DESTE MEDICAMENTO?")
        );
        assert_eq!(professional.resolve_alias("SUPERDOSE"), None);
        assert!(professional.contains("10. SUPERDOSE"));
    }

    #[test]
    fn unknown_type_falls_back_to_default() {
        assert_eq!(
            SchemaRegistry::lookup("veterinária").document_type,
            DocumentType::Patient
        );
        assert_eq!(
            SchemaRegistry::lookup("Profissional").document_type,
            DocumentType::Professional
        );
    }

    #[test]
    fn known_titles_start_with_canonical() {
        let patient = SchemaRegistry::get(DocumentType::Patient);
        let titles: Vec<_> = patient.known_titles("APRESENTAÇÕES").collect();
        assert_eq!(titles, vec!["APRESENTAÇÕES", "APRESENTAÇÃO"]);
    }

    #[test]
    fn validation_catches_conflicts() {
        let mut schema = SchemaRegistry::get(DocumentType::Patient).clone();
        schema.aliases.push(AliasTitle {
            alias: "Indicações".to_string(),
            canonical_name: "DIZERES LEGAIS".to_string(),
        });
        assert!(matches!(
            schema.validate(),
            Err(SchemaError::ConflictingAlias { .. })
        ));

        let mut schema = SchemaRegistry::get(DocumentType::Patient).clone();
        schema.aliases.push(AliasTitle {
            alias: "BULA".to_string(),
            canonical_name: "10. SUPERDOSE".to_string(),
        });
        assert!(matches!(
            schema.validate(),
            Err(SchemaError::UnknownAliasTarget { .. })
        ));

        let mut schema = SchemaRegistry::get(DocumentType::Professional).clone();
        let first = schema.sections[0].clone();
        schema.sections.push(first);
        assert_eq!(
            schema.validate(),
            Err(SchemaError::DuplicateCanonical("APRESENTAÇÕES".to_string()))
        );
    }

    #[test]
    fn ignore_flags() {
        let patient = SchemaRegistry::get(DocumentType::Patient);
        let legal = patient.entry("DIZERES LEGAIS").unwrap();
        assert!(legal.ignore_content_comparison);
        assert!(!legal.ignore_missing_check);

        let professional = SchemaRegistry::get(DocumentType::Professional);
        assert!(professional
            .entry("2. RESULTADOS DE EFICÁCIA")
            .unwrap()
            .ignore_missing_check);
    }
}
