//! Regulatory approval stamp detection.
//!
//! A bula ends with a stamp such as `Aprovado pela Anvisa em 12/03/2024` or
//! `Data de aprovação na ANVISA: 12/03/2024`. Nothing after the stamp belongs
//! to any section, and the stamp's date is reported for both documents.

use std::fmt;

use bula_text::fold_case_and_accents;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Sentinel reported when a document carries no approval stamp.
pub const NOT_FOUND: &str = "Não encontrada";

/// Stamp patterns, matched against the case- and accent-folded text.
const APPROVAL_PATTERNS: &[&str] = &[
    r"aprovad[oa] pela anvisa em:?\s*(\d{2}/\d{2}/\d{4})",
    r"data de aprovacao na anvisa:?\s*(\d{2}/\d{2}/\d{4})",
];

static APPROVAL_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    APPROVAL_PATTERNS
        .iter()
        .map(|p| Regex::new(p).expect("valid approval stamp regex"))
        .collect()
});

/// The approval date found in a document, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApprovalDate {
    /// `DD/MM/YYYY` as written in the stamp.
    Found(String),
    NotFound,
}

impl ApprovalDate {
    pub fn is_found(&self) -> bool {
        matches!(self, ApprovalDate::Found(_))
    }

    /// The date, or `sentinel` when the stamp is absent.
    pub fn as_str_or<'a>(&'a self, sentinel: &'a str) -> &'a str {
        match self {
            ApprovalDate::Found(date) => date,
            ApprovalDate::NotFound => sentinel,
        }
    }
}

impl fmt::Display for ApprovalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str_or(NOT_FOUND))
    }
}

/// First stamp date in `text`, searching every pattern.
///
/// Line breaks are folded into spaces first, so a stamp wrapped over two lines
/// is still found.
pub fn find_approval_date(text: &str) -> ApprovalDate {
    let folded = fold_case_and_accents(text);
    APPROVAL_REGEXES
        .iter()
        .filter_map(|re| re.captures(&folded))
        .filter_map(|caps| {
            let start = caps.get(0).map_or(0, |m| m.start());
            caps.get(1).map(|date| (start, date.as_str()))
        })
        .min_by_key(|(start, _)| *start)
        .map(|(_, date)| ApprovalDate::Found(date.to_string()))
        .unwrap_or(ApprovalDate::NotFound)
}

/// Whether a single line carries a complete approval stamp.
pub fn is_approval_stamp(line: &str) -> bool {
    let folded = fold_case_and_accents(line);
    APPROVAL_REGEXES.iter().any(|re| re.is_match(&folded))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_both_stamp_wordings() {
        assert_eq!(
            find_approval_date("Esta bula foi Aprovada pela Anvisa em 12/03/2024."),
            ApprovalDate::Found("12/03/2024".to_string())
        );
        assert_eq!(
            find_approval_date("Data de aprovação na ANVISA: 01/02/2023"),
            ApprovalDate::Found("01/02/2023".to_string())
        );
    }

    #[test]
    fn earliest_stamp_wins() {
        let text = "Data de aprovação na Anvisa: 05/05/2020\nAprovado pela Anvisa em 12/03/2024";
        assert_eq!(find_approval_date(text).to_string(), "05/05/2020");
    }

    #[test]
    fn wrapped_stamp_is_found() {
        assert!(find_approval_date("Aprovado pela\nAnvisa em 12/03/2024").is_found());
    }

    #[test]
    fn missing_stamp_uses_sentinel() {
        let date = find_approval_date("Sem carimbo.");
        assert_eq!(date, ApprovalDate::NotFound);
        assert_eq!(date.to_string(), "Não encontrada");
        assert_eq!(date.as_str_or("n/a"), "n/a");
    }

    #[test]
    fn stamp_line_detection() {
        assert!(is_approval_stamp("APROVADO PELA ANVISA EM 12/03/2024"));
        assert!(!is_approval_stamp("Aprovado pela Anvisa"));
    }
}
