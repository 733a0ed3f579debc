//! Data tables used while extracting and spell checking section bodies.

use std::collections::HashSet;

use bula_text::Normalization;
use once_cell::sync::Lazy;

/// A phrase that marks a line as print-shop or layout metadata.
#[derive(Debug, Clone, Copy)]
pub struct NoisePattern {
    pub keyword: &'static str,
    /// Normalization applied to the line before the substring test.
    pub normalization: Normalization,
}

/// Print-shop, paper and artwork metadata found in leaflet proofs. Keywords
/// are written in the normal form of their normalization.
pub const LAYOUT_NOISE: &[NoisePattern] = &[
    NoisePattern { keyword: "medida da bula", normalization: Normalization::Content },
    NoisePattern { keyword: "dimensoes da bula", normalization: Normalization::Content },
    NoisePattern { keyword: "formato aberto", normalization: Normalization::Content },
    NoisePattern { keyword: "formato fechado", normalization: Normalization::Content },
    NoisePattern { keyword: "papel offset", normalization: Normalization::Content },
    NoisePattern { keyword: "gramatura", normalization: Normalization::Content },
    NoisePattern { keyword: "tipologia", normalization: Normalization::Content },
    NoisePattern { keyword: "times new roman", normalization: Normalization::Content },
    NoisePattern { keyword: "pantone", normalization: Normalization::Content },
    NoisePattern { keyword: "prova de impressao", normalization: Normalization::Content },
    NoisePattern { keyword: "arte final", normalization: Normalization::Content },
    NoisePattern { keyword: "codigo da arte", normalization: Normalization::Content },
    NoisePattern { keyword: "pharmacode", normalization: Normalization::Content },
    NoisePattern { keyword: "laetus", normalization: Normalization::Content },
    NoisePattern { keyword: "sac 0800", normalization: Normalization::Content },
    NoisePattern { keyword: "servico de atendimento ao consumidor", normalization: Normalization::Content },
];

/// Whether a body line is layout metadata rather than leaflet text.
pub fn is_layout_noise(line: &str) -> bool {
    LAYOUT_NOISE
        .iter()
        .any(|pattern| pattern.normalization.apply(line).contains(pattern.keyword))
}

/// Regulatory and pharmaceutical vocabulary that general dictionaries lack.
pub const DOMAIN_TERMS: &[&str] = &[
    "anvisa",
    "bula",
    "bulas",
    "cnpj",
    "crf",
    "farm",
    "resp",
    "ltda",
    "lote",
    "fab",
    "val",
    "mg",
    "mcg",
    "ml",
    "kg",
    "ui",
    "sac",
    "posologia",
    "superdose",
    "superdosagem",
    "contraindicacao",
    "contraindicacoes",
    "farmacocinetica",
    "farmacodinamica",
    "excipientes",
    "hipersensibilidade",
    "revestido",
    "revestidos",
    "comprimido",
    "comprimidos",
    "drageas",
    "blister",
    "blisteres",
];

static DOMAIN_TERM_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| DOMAIN_TERMS.iter().copied().collect());

pub fn is_domain_term(content_normalized: &str) -> bool {
    DOMAIN_TERM_SET.contains(content_normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_in_normal_form() {
        for pattern in LAYOUT_NOISE {
            assert_eq!(pattern.normalization.apply(pattern.keyword), pattern.keyword);
        }
        for term in DOMAIN_TERMS {
            assert_eq!(Normalization::Content.apply(term), *term);
        }
    }

    #[test]
    fn noise_detection() {
        assert!(is_layout_noise("Cor: PANTONE 286 C"));
        assert!(is_layout_noise("Papel Offset 56 g/m²"));
        assert!(is_layout_noise("PROVA DE IMPRESSÃO - versão 3"));
        assert!(!is_layout_noise("Tome um comprimido ao dia."));
        assert!(!is_layout_noise("Mantenha em temperatura ambiente."));
    }
}
