//! Marked text: a text block split into changed and unchanged segments.
//!
//! The core only decides which tokens are marked. How a marked segment looks
//! (HTML `<mark>`, ANSI colour, brackets) is the caller's choice through
//! [`MarkedText::render_with`].

use serde::{Deserialize, Serialize};

use crate::token::{Token, TokenTag};

/// A contiguous run of text with a single marked state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkedSegment {
    pub text: String,
    pub changed: bool,
}

/// Text reassembled from tokens with maximal changed runs grouped together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkedText {
    pub segments: Vec<MarkedSegment>,
}

impl MarkedText {
    /// Reassemble `tokens` with `mask[i]` telling whether token `i` is changed.
    ///
    /// Spacing follows the source (`space_before`), except that closing
    /// punctuation never gets a space before it and nothing gets a space after
    /// an opening bracket. A gap between two changed tokens belongs to the
    /// changed run, so adjacent highlights collapse into one segment. Line
    /// breaks are never marked.
    pub fn from_tokens(tokens: &[Token], mask: &[bool]) -> Self {
        let mut marked = MarkedText::default();
        let mut previous: Option<&Token> = None;

        for (i, token) in tokens.iter().enumerate() {
            let changed = token.tag != TokenTag::Newline && mask.get(i).copied().unwrap_or(false);
            let separator = match previous {
                None => "",
                Some(prev) if prev.is_newline() || token.is_newline() => "",
                Some(_) if token.is_closing() => "",
                Some(prev) if prev.is_opening() => "",
                Some(_) if token.space_before => " ",
                Some(_) => "",
            };
            marked.push(separator, &token.text, changed);
            previous = Some(token);
        }

        marked
    }

    fn push(&mut self, separator: &str, text: &str, changed: bool) {
        match self.segments.last_mut() {
            Some(last) if last.changed == changed => {
                last.text.push_str(separator);
                last.text.push_str(text);
            }
            Some(last) if changed => {
                last.text.push_str(separator);
                self.segments.push(MarkedSegment {
                    text: text.to_string(),
                    changed,
                });
            }
            _ => {
                self.segments.push(MarkedSegment {
                    text: format!("{}{}", separator, text),
                    changed,
                });
            }
        }
    }

    /// The text with no markup.
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// The text with every changed segment wrapped in `open` / `close`.
    pub fn render_with(&self, open: &str, close: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            if segment.changed {
                out.push_str(open);
                out.push_str(&segment.text);
                out.push_str(close);
            } else {
                out.push_str(&segment.text);
            }
        }
        out
    }

    /// Texts of the changed segments, in order.
    pub fn changed_texts(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter(|s| s.changed)
            .map(|s| s.text.as_str())
            .collect()
    }

    pub fn has_changes(&self) -> bool {
        self.segments.iter().any(|s| s.changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::tokenize;

    fn mark(text: &str, changed: &[&str]) -> MarkedText {
        let tokens = tokenize(text);
        let mask: Vec<bool> = tokens
            .iter()
            .map(|t| changed.contains(&t.text.as_str()))
            .collect();
        MarkedText::from_tokens(&tokens, &mask)
    }

    #[test]
    fn reassembles_source_spacing() {
        let marked = mark("Dose: 1,5 mg (máx. 3 vezes).\nUso oral.", &[]);
        assert_eq!(marked.plain_text(), "Dose: 1,5 mg (máx. 3 vezes).\nUso oral.");
        assert!(!marked.has_changes());
    }

    #[test]
    fn adjacent_changes_collapse() {
        let marked = mark(
            "Não use se for alérgico ao princípio ativo.",
            &["ao", "princípio", "ativo"],
        );
        assert_eq!(marked.changed_texts(), vec!["ao princípio ativo"]);
        assert_eq!(
            marked.render_with("[", "]"),
            "Não use se for alérgico [ao princípio ativo]."
        );
    }

    #[test]
    fn no_space_before_closing_punctuation() {
        let tokens = tokenize("fim .");
        let marked = MarkedText::from_tokens(&tokens, &[false, true]);
        assert_eq!(marked.render_with("<", ">"), "fim<.>");
    }

    #[test]
    fn newlines_are_never_marked() {
        let tokens = tokenize("um\ndois");
        let marked = MarkedText::from_tokens(&tokens, &[true, true, true]);
        assert_eq!(marked.render_with("<", ">"), "<um>\n<dois>");
    }
}
