//! Section body extraction and reflow.
//!
//! A section's body runs from the line after its title to the line before the
//! next mapped title (or the end of the document). Extraction then:
//!
//! 1. splits a title that shares its line with body text,
//! 2. drops print-shop metadata lines,
//! 3. stops early at a line that scores as a different section's title,
//! 4. reflows hard-wrapped lines into paragraphs.

use bula_document::{BulaDocument, StructuredLine};
use bula_text::{fold_case_and_accents, strip_numeric_prefix};
use serde::{Deserialize, Serialize};

use crate::mapper::{SectionMapper, SectionMatch};
use crate::patterns::is_layout_noise;

/// The extracted title and body of one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionContent {
    pub canonical_name: String,
    /// Title as written, without body text that shared its line.
    pub matched_title: String,
    /// Paragraphs separated by `\n`.
    pub body_text: String,
    pub start_line: usize,
    /// Exclusive. Lines after an early stop are not included.
    pub end_line: usize,
}

#[derive(Debug, Clone)]
struct BodyLine {
    text: String,
    vertical_position: f32,
    column: u16,
    paragraph_break: bool,
}

impl BodyLine {
    fn from_line(line: &StructuredLine, text: &str, paragraph_break: bool) -> Self {
        Self {
            text: text.to_string(),
            vertical_position: line.vertical_position,
            column: line.column,
            paragraph_break,
        }
    }
}

/// Extracts section bodies from one mapped document.
pub struct SectionExtractor<'a> {
    mapper: &'a SectionMapper<'a>,
    document: &'a BulaDocument,
    matches: &'a [SectionMatch],
    body_font_size: f32,
}

impl<'a> SectionExtractor<'a> {
    /// `matches` must come from `mapper` run on `document`.
    pub fn new(
        mapper: &'a SectionMapper<'a>,
        document: &'a BulaDocument,
        matches: &'a [SectionMatch],
    ) -> Self {
        Self {
            mapper,
            document,
            matches,
            body_font_size: mapper.body_font_size(document),
        }
    }

    pub fn matches(&self) -> &'a [SectionMatch] {
        self.matches
    }

    pub fn document(&self) -> &'a BulaDocument {
        self.document
    }

    pub fn is_mapped(&self, canonical_name: &str) -> bool {
        self.matches.iter().any(|m| m.canonical_name == canonical_name)
    }

    /// Content of the first occurrence of `canonical_name`, or `None` when the
    /// section was not found.
    pub fn extract(&self, canonical_name: &str) -> Option<SectionContent> {
        let position = self
            .matches
            .iter()
            .position(|m| m.canonical_name == canonical_name)?;
        let section = &self.matches[position];
        let limit = self
            .matches
            .get(position + 1)
            .map_or(self.document.line_count(), |next| next.start_line);

        let mut title = section.matched_title_text.clone();
        let mut body = Vec::new();

        if section.line_span == 1 {
            if let Some(line) = self.document.get_line(section.start_line) {
                let titles = self.known_titles(canonical_name);
                if let Some((prefix, rest)) = split_title_prefix(&line.text, &titles) {
                    title = prefix.to_string();
                    if !rest.is_empty() {
                        body.push(BodyLine::from_line(line, rest, false));
                    }
                }
            }
        }

        let mut end = limit;
        for idx in section.body_start()..limit {
            let line = match self.document.get_line(idx) {
                Some(line) => line,
                None => break,
            };
            if is_layout_noise(&line.text) {
                log::trace!("line {}: layout metadata dropped", idx);
                continue;
            }
            match self.mapper.score_line(line, self.body_font_size) {
                Some(hit) if hit.canonical_name != canonical_name => {
                    log::debug!(
                        "'{}' ends at line {}: '{}' looks like '{}'",
                        canonical_name,
                        idx,
                        line.text,
                        hit.canonical_name
                    );
                    end = idx;
                    break;
                }
                // repeated heading
                Some(hit) if hit.exact => continue,
                _ => {}
            }
            body.push(BodyLine::from_line(
                line,
                &line.text,
                self.document.follows_blank_line(idx),
            ));
        }

        Some(SectionContent {
            canonical_name: canonical_name.to_string(),
            matched_title: title,
            body_text: reflow(&body),
            start_line: section.start_line,
            end_line: end,
        })
    }

    /// Content of every mapped section, in document order.
    pub fn extract_all(&self) -> Vec<SectionContent> {
        self.matches
            .iter()
            .filter_map(|m| self.extract(&m.canonical_name))
            .collect()
    }

    fn known_titles(&self, canonical_name: &str) -> Vec<String> {
        let mut titles = Vec::new();
        for title in self.mapper.schema().known_titles(canonical_name) {
            let stripped = strip_numeric_prefix(title);
            if stripped != title {
                titles.push(stripped);
            }
            titles.push(title.to_string());
        }
        titles
    }
}

// ============ TITLE SPLITTING ============

fn same_letter(a: char, b: char) -> bool {
    let fold = |c: char| fold_case_and_accents(c.encode_utf8(&mut [0; 4]));
    a == b || fold(a) == fold(b)
}

/// Byte length of `title` as a case- and accent-insensitive prefix of `line`,
/// ending at a word boundary.
fn literal_prefix_len(line: &str, title: &str) -> Option<usize> {
    let mut line_chars = line.char_indices();
    for expected in title.chars() {
        let (_, actual) = line_chars.next()?;
        if !same_letter(expected, actual) {
            return None;
        }
    }
    let end = line_chars.next().map_or(line.len(), |(i, _)| i);
    match line[end..].chars().next() {
        Some(c) if c.is_alphanumeric() => None,
        _ => Some(end),
    }
}

/// Split `line` after the shortest of `titles` that prefixes it.
fn split_title_prefix<'l>(line: &'l str, titles: &[String]) -> Option<(&'l str, &'l str)> {
    let end = titles
        .iter()
        .filter(|t| !t.is_empty())
        .filter_map(|t| literal_prefix_len(line, t).map(|len| (t.chars().count(), len)))
        .min_by_key(|&(chars, _)| chars)
        .map(|(_, len)| len)?;

    let rest = line[end..]
        .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ':' | '-' | '–' | '.'));
    Some((&line[..end], rest))
}

// ============ REFLOW ============

fn is_bullet(c: char) -> bool {
    matches!(c, '•' | '-' | '–' | '—' | '*' | '·' | '▪' | '►' | '●')
}

fn is_opening_quote(c: char) -> bool {
    matches!(c, '"' | '“' | '«' | '\'' | '‘')
}

fn starts_paragraph(previous: &BodyLine, line: &BodyLine) -> bool {
    if line.paragraph_break {
        return true;
    }
    if previous.text.ends_with(|c| matches!(c, '.' | '!' | '?' | ':')) {
        return true;
    }
    match line.text.chars().next() {
        Some(c) => c.is_uppercase() || c.is_ascii_digit() || is_bullet(c) || is_opening_quote(c),
        None => false,
    }
}

/// A word broken across lines: the previous line ends in a letter and a
/// hyphen, and the next line continues lower in the same column with a
/// lowercase letter.
fn is_hyphenation(previous: &BodyLine, line: &BodyLine) -> bool {
    let mut tail = previous.text.chars().rev();
    let hyphen_after_letter =
        tail.next() == Some('-') && tail.next().map_or(false, char::is_alphabetic);

    hyphen_after_letter
        && line.text.chars().next().map_or(false, char::is_lowercase)
        && line.column == previous.column
        && line.vertical_position > previous.vertical_position
}

/// Join hard-wrapped lines into paragraphs.
fn reflow(lines: &[BodyLine]) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut previous: Option<&BodyLine> = None;

    for line in lines {
        match (paragraphs.last_mut(), previous) {
            (Some(current), Some(prev)) if is_hyphenation(prev, line) => {
                current.pop();
                current.push_str(&line.text);
            }
            (Some(current), Some(prev)) if !starts_paragraph(prev, line) => {
                current.push(' ');
                current.push_str(&line.text);
            }
            _ => paragraphs.push(line.text.clone()),
        }
        previous = Some(line);
    }

    paragraphs.join("\n")
}
