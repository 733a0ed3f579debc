//! Spell checking against a per-run vocabulary.
//!
//! The checker itself is a collaborator behind [`SpellChecker`]. What this
//! module owns is the vocabulary: every word of the reference document, the
//! entity-like tokens of the target (brand names, acronyms, codes) and a
//! fixed list of regulatory terms are accepted as correctly spelled.

use std::collections::{BTreeSet, HashSet};

use bula_text::{content_normalize, tokenize, Token, TokenTag};

use crate::error::SpellCheckError;
use crate::patterns::DOMAIN_TERMS;

/// External spelling collaborator.
pub trait SpellChecker: Send + Sync {
    /// Misspelled words of `text`, excluding anything in `vocabulary`.
    fn check(
        &self,
        text: &str,
        vocabulary: &Vocabulary,
    ) -> Result<BTreeSet<String>, SpellCheckError>;
}

/// Words accepted for one run, in content-normal form.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    reference: HashSet<String>,
    allowed: HashSet<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every word of the reference document.
    pub fn from_reference(reference_text: &str) -> Self {
        Self {
            reference: words(reference_text).map(|t| t.alignment_key()).collect(),
            allowed: HashSet::new(),
        }
    }

    /// Reference words, entity-like target tokens and the domain terms.
    pub fn assemble(reference_text: &str, target_text: &str) -> Self {
        Self::from_reference(reference_text)
            .with_allowed_words(entity_like_tokens(target_text))
            .with_allowed_words(DOMAIN_TERMS.iter().copied())
    }

    pub fn with_allowed_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed
            .extend(words.into_iter().map(|w| content_normalize(w.as_ref())));
        self
    }

    pub fn contains(&self, word: &str) -> bool {
        let key = content_normalize(word);
        self.reference.contains(&key) || self.allowed.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.reference.union(&self.allowed).count()
    }

    pub fn is_empty(&self) -> bool {
        self.reference.is_empty() && self.allowed.is_empty()
    }
}

fn words(text: &str) -> impl Iterator<Item = Token> {
    tokenize(text).into_iter().filter(|t| t.tag == TokenTag::Word)
}

fn is_acronym(word: &str) -> bool {
    let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 2 && letters.iter().all(|c| c.is_uppercase())
}

fn mixes_letters_and_digits(word: &str) -> bool {
    word.chars().any(|c| c.is_ascii_digit()) && word.chars().any(char::is_alphabetic)
}

/// Tokens that look like names or codes: acronyms, letter-digit mixes and
/// capitalized words that do not start a sentence. Returned in content-normal
/// form.
pub fn entity_like_tokens(text: &str) -> BTreeSet<String> {
    let mut entities = BTreeSet::new();
    let mut sentence_start = true;

    for token in tokenize(text) {
        match token.tag {
            TokenTag::Newline => sentence_start = true,
            TokenTag::Punc if matches!(token.text.as_str(), "." | "!" | "?" | ":") => {
                sentence_start = true
            }
            TokenTag::Word => {
                let capitalized = token.text.chars().next().map_or(false, char::is_uppercase);
                if is_acronym(&token.text)
                    || mixes_letters_and_digits(&token.text)
                    || (capitalized && !sentence_start)
                {
                    entities.insert(token.alignment_key());
                }
                sentence_start = false;
            }
            _ => {}
        }
    }

    entities
}

/// Run `checker`, logging failures and reporting no misspellings for them.
pub fn check_spelling(
    checker: &dyn SpellChecker,
    text: &str,
    vocabulary: &Vocabulary,
) -> Vec<String> {
    match checker.check(text, vocabulary) {
        Ok(words) => words.into_iter().collect(),
        Err(err) => {
            log::warn!("spell check skipped: {}", err);
            Vec::new()
        }
    }
}

/// Word-list spell checker. Words of three letters or more that are neither
/// in the list nor in the vocabulary are reported, lowercased.
#[derive(Debug, Clone, Default)]
pub struct DictionarySpellChecker {
    words: HashSet<String>,
}

impl DictionarySpellChecker {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| content_normalize(w.as_ref()))
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// One word per line; blank lines and `#` comments are skipped.
    pub fn from_word_list(list: &str) -> Self {
        Self::new(
            list.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#')),
        )
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl SpellChecker for DictionarySpellChecker {
    fn check(
        &self,
        text: &str,
        vocabulary: &Vocabulary,
    ) -> Result<BTreeSet<String>, SpellCheckError> {
        if self.words.is_empty() {
            return Err(SpellCheckError::Unavailable("empty word list".to_string()));
        }

        Ok(words(text)
            .filter(|t| t.text.chars().count() >= 3 && t.text.chars().all(char::is_alphabetic))
            .filter(|t| {
                let key = t.alignment_key();
                !self.words.contains(&key) && !vocabulary.contains(&key)
            })
            .map(|t| t.text.to_lowercase())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Offline;

    impl SpellChecker for Offline {
        fn check(&self, _: &str, _: &Vocabulary) -> Result<BTreeSet<String>, SpellCheckError> {
            Err(SpellCheckError::Unavailable("no dictionary installed".to_string()))
        }
    }

    #[test]
    fn entity_like_tokens_skip_sentence_starts() {
        let entities = entity_like_tokens(
            "Tylenol contém paracetamol. Fabricado por Janssen-Cilag. Registro MS 1.2345 e ANVISA.\nVitamina B12 e Dipirona.",
        );
        let entities: Vec<&str> = entities.iter().map(String::as_str).collect();
        assert_eq!(
            entities,
            vec!["anvisa", "b12", "cilag", "dipirona", "janssen", "ms"]
        );
    }

    #[test]
    fn vocabulary_is_accent_and_case_insensitive() {
        let vocabulary = Vocabulary::assemble("Não use em crianças.", "Produzido por Medley.");
        assert!(vocabulary.contains("CRIANCAS"));
        assert!(vocabulary.contains("medley"));
        assert!(vocabulary.contains("Anvisa"));
        assert!(!vocabulary.contains("produzido"));
    }

    #[test]
    fn dictionary_checker_reports_unknown_words() {
        let checker =
            DictionarySpellChecker::from_word_list("# termos\ntome\num\ncomprimido\nao\ndia\n");
        let vocabulary = Vocabulary::from_reference("Posologia recomendada.");

        let misspelled = checker
            .check(
                "Tome um comprimdo ao dia conforme posologia recomendada. 500 mg",
                &vocabulary,
            )
            .unwrap();
        let misspelled: Vec<&str> = misspelled.iter().map(String::as_str).collect();
        assert_eq!(misspelled, vec!["comprimdo", "conforme"]);
    }

    #[test]
    fn checker_failure_is_not_fatal() {
        assert!(check_spelling(&Offline, "qualquer texto", &Vocabulary::new()).is_empty());
        let empty = DictionarySpellChecker::default();
        assert!(check_spelling(&empty, "texto", &Vocabulary::new()).is_empty());
    }
}
