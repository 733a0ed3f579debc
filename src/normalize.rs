//! Text normalization for the three comparison purposes of the audit.
//!
//! - [`display_normalize`] keeps case, punctuation and accents. Anything shown
//!   to a reviewer goes through it.
//! - [`content_normalize`] is accent-insensitive, punctuation-free and
//!   lowercase. Two bodies are identical iff their content forms are equal.
//! - [`title_normalize`] is the content form with a leading `1.` / `2-` / `3)`
//!   numbering prefix removed, so `"1. INDICAÇÕES"` and `"Indicações"` agree.
//!
//! All functions are total: empty or whitespace-only input yields `""`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static NUMERIC_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\d+\s*[.\-–)](\s+|$)").expect("valid numeric prefix regex")
});

/// Which normalization a pattern table entry is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Normalization {
    Display,
    Content,
    Title,
    /// Lowercase and accent-free, punctuation kept.
    Folded,
}

impl Normalization {
    pub fn apply(self, text: &str) -> String {
        match self {
            Normalization::Display => display_normalize(text),
            Normalization::Content => content_normalize(text),
            Normalization::Title => title_normalize(text),
            Normalization::Folded => fold_case_and_accents(text),
        }
    }
}

/// Characters that extraction leaves behind but that never render.
fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}' | '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{200E}' | '\u{200F}' | '\u{2060}'
            | '\u{FEFF}'
    )
}

/// Strip invisible characters, unify line breaks, collapse horizontal
/// whitespace inside each line and trim.
pub fn display_normalize(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");

    let lines: Vec<String> = unified
        .split('\n')
        .map(|line| {
            line.chars()
                .filter(|c| !is_invisible(*c))
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();

    lines.join("\n").trim().to_string()
}

/// Lowercase, decompose, drop combining marks and punctuation, collapse all
/// whitespace (line breaks included) into single spaces.
///
/// Lowercasing happens before decomposition so that case mappings which
/// introduce combining marks (`İ` -> `i̇`) are stripped in the same pass,
/// which keeps the function idempotent.
pub fn content_normalize(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove a leading numbering prefix (`"4. "`, `"10 - "`, `"2) "`).
pub fn strip_numeric_prefix(text: &str) -> String {
    NUMERIC_PREFIX.replace(text, "").into_owned()
}

/// Content normalization after removing the numbering prefix.
pub fn title_normalize(text: &str) -> String {
    let display = display_normalize(text);
    content_normalize(&strip_numeric_prefix(&display))
}

/// Lowercase and accent-free, with punctuation and single spaces kept.
///
/// Used where a pattern needs the punctuation (dates, `:` separators) but
/// must not care about case or accents.
pub fn fold_case_and_accents(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| !is_invisible(*c))
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}
