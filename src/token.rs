//! Tokenization for word-level comparison.
//!
//! Text is split on Unicode word boundaries. Word runs become single tokens,
//! every punctuation or symbol character becomes its own token, and each line
//! break is an atomic [`TokenTag::Newline`] token. Horizontal whitespace is not
//! tokenized; it survives only as the `space_before` flag of the next token so
//! the original spacing can be reassembled.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::normalize::content_normalize;

/// Token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenTag {
    /// Run of letters and/or digits
    Word,
    /// Punctuation character
    Punc,
    /// Any other symbol character
    Symb,
    /// A single line break
    Newline,
}

/// A token with its position in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The token text as it appears in the source.
    pub text: String,
    /// Byte position where token starts (inclusive).
    pub start: usize,
    /// Byte position where token ends (exclusive).
    pub end: usize,
    pub tag: TokenTag,
    /// Whether horizontal whitespace preceded the token in the source.
    pub space_before: bool,
    /// Index in the source token sequence.
    pub index: usize,
}

impl Token {
    /// Key used for alignment: content-normalized text for words, the raw
    /// character otherwise.
    pub fn alignment_key(&self) -> String {
        match self.tag {
            TokenTag::Word => content_normalize(&self.text),
            _ => self.text.clone(),
        }
    }

    pub fn is_newline(&self) -> bool {
        self.tag == TokenTag::Newline
    }

    /// Closing punctuation never takes a space before it.
    pub fn is_closing(&self) -> bool {
        matches!(
            self.text.as_str(),
            "." | "," | ";" | ":" | "!" | "?" | ")" | "]" | "}" | "%" | "”" | "»" | "’" | "…"
        )
    }

    /// Opening brackets and quotes never take a space after them.
    pub fn is_opening(&self) -> bool {
        matches!(self.text.as_str(), "(" | "[" | "{" | "“" | "«" | "‘")
    }
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '«' | '»' | '“' | '”' | '‘' | '’' | '–' | '—' | '…' | '•' | '·' | '¿' | '¡'
        )
}

/// Split text into word, punctuation, symbol and newline tokens.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut space_before = false;

    for (offset, segment) in text.split_word_bound_indices() {
        if segment.chars().all(char::is_whitespace) {
            for (i, c) in segment.char_indices() {
                if c == '\n' {
                    tokens.push(Token {
                        text: "\n".to_string(),
                        start: offset + i,
                        end: offset + i + 1,
                        tag: TokenTag::Newline,
                        space_before: false,
                        index: tokens.len(),
                    });
                    space_before = false;
                } else {
                    space_before = true;
                }
            }
            continue;
        }

        if segment.chars().any(char::is_alphanumeric) {
            tokens.push(Token {
                text: segment.to_string(),
                start: offset,
                end: offset + segment.len(),
                tag: TokenTag::Word,
                space_before,
                index: tokens.len(),
            });
            space_before = false;
            continue;
        }

        for (i, c) in segment.char_indices() {
            tokens.push(Token {
                text: c.to_string(),
                start: offset + i,
                end: offset + i + c.len_utf8(),
                tag: if is_punctuation(c) {
                    TokenTag::Punc
                } else {
                    TokenTag::Symb
                },
                space_before,
                index: tokens.len(),
            });
            space_before = false;
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn words_and_punctuation_are_separate() {
        let tokens = tokenize("Não use se for alérgico.");
        assert_eq!(texts(&tokens), vec!["Não", "use", "se", "for", "alérgico", "."]);
        assert!(!tokens[5].space_before);
        assert!(tokens[1].space_before);
    }

    #[test]
    fn line_breaks_are_atomic() {
        let tokens = tokenize("a\n\nb");
        let tags: Vec<_> = tokens.iter().map(|t| t.tag).collect();
        assert_eq!(
            tags,
            vec![TokenTag::Word, TokenTag::Newline, TokenTag::Newline, TokenTag::Word]
        );
        assert!(!tokens[3].space_before);
    }

    #[test]
    fn positions_map_back_to_source() {
        let text = "Dose: 1,5 mg (máx.)";
        for token in tokenize(text) {
            assert_eq!(&text[token.start..token.end], token.text);
        }
    }

    #[test]
    fn alignment_key_normalizes_words_only() {
        let tokens = tokenize("ALÉRGICO!");
        assert_eq!(tokens[0].alignment_key(), "alergico");
        assert_eq!(tokens[1].alignment_key(), "!");
        assert_eq!(tokens[1].tag, TokenTag::Punc);
    }

    #[test]
    fn indices_are_sequential() {
        let tokens = tokenize("um, dois\ntrês");
        for (i, token) in tokens.iter().enumerate() {
            assert_eq!(token.index, i);
        }
    }
}
