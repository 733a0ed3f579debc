//! Section mapping: locate canonical section titles in a document.
//!
//! The mapper walks the document top to bottom. Lines a [`LineClassifier`]
//! lets through are title-normalized and scored against every canonical title
//! and alias of the active schema; the best hit at or above the threshold
//! starts a section.
//!
//! ## Scoring
//!
//! - An exact title-normal match scores 100 and ends the search.
//! - Otherwise the score is [`token_set_ratio`], which tolerates one side
//!   being a subset of the other. A [`CoverageGuard`] bounds that tolerance
//!   so a body sentence that merely contains a short title does not match it.
//!   A line that opens with a whole known title is exempt from the guard:
//!   that is a heading sharing its line with the first sentence of its body.
//! - Ties keep the first candidate in registry order.
//!
//! ## Windows
//!
//! With a greedy [`TitleWindow`] consecutive candidate lines are concatenated
//! one at a time and the best-scoring window wins. Equal scores prefer an
//! exact match, then the shorter window.
//!
//! After a title is accepted, following candidate lines are absorbed into it
//! when together they spell a known title of the same section exactly. This
//! covers titles typeset over several lines in documents scanned one line at
//! a time.

use std::sync::Arc;

use bula_document::{BulaDocument, StructuredLine};
use bula_text::{title_normalize, token_set_ratio, TokenOverlap};
use serde::{Deserialize, Serialize};

use crate::classify::{
    LineClassifier, ShapeClassifier, ShapeRule, StructuralClassifier, TitleSignal, TitleWindow,
};
use crate::config::{AuditConfig, LineSource};
use crate::control::RunControl;
use crate::error::AuditResult;
use crate::schema::SectionSchema;

/// A located section title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionMatch {
    pub canonical_name: String,
    /// The title as written in the document (lines joined by spaces).
    pub matched_title_text: String,
    pub start_line: usize,
    /// Number of lines the title occupies.
    pub line_span: usize,
    pub match_score: f64,
}

impl SectionMatch {
    /// First line after the title.
    pub fn body_start(&self) -> usize {
        self.start_line + self.line_span
    }
}

// ============ COVERAGE GUARD ============

/// Limits on partial matches between a line and a title.
///
/// When the title has more tokens than the line, the line must hold at least
/// `min_title_coverage` of the title's tokens. When the line has more tokens
/// than the title, at least `min_line_coverage` of the line must be title
/// (skipped for lines typeset as titles). Same-sized sets are left to the
/// score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageGuard {
    pub min_title_coverage: f64,
    pub min_line_coverage: Option<f64>,
}

impl CoverageGuard {
    /// `overlap` is taken between the line (left) and the title (right).
    pub fn admits(&self, overlap: &TokenOverlap) -> bool {
        if overlap.shared == 0 {
            return true;
        }
        if overlap.right > overlap.left && overlap.right_coverage() < self.min_title_coverage {
            return false;
        }
        match self.min_line_coverage {
            Some(min) if overlap.left > overlap.right => overlap.left_coverage() >= min,
            _ => true,
        }
    }
}

// ============ TITLE INDEX ============

#[derive(Debug, Clone)]
struct TitleCandidate {
    canonical_name: String,
    normalized: String,
}

impl TitleCandidate {
    /// `normalized` starts with this title and the title ends on a word
    /// boundary.
    fn heads(&self, normalized: &str) -> bool {
        normalized
            .strip_prefix(self.normalized.as_str())
            .map_or(false, |rest| rest.is_empty() || rest.starts_with(' '))
    }
}

/// The best candidate for a piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleHit {
    pub canonical_name: String,
    pub score: f64,
    pub exact: bool,
}

/// Title-normalized canonical titles and aliases, canonicals first.
#[derive(Debug, Clone)]
pub struct TitleIndex {
    candidates: Vec<TitleCandidate>,
}

impl TitleIndex {
    pub fn new(schema: &SectionSchema) -> Self {
        let canonicals = schema
            .sections
            .iter()
            .map(|e| (e.canonical_name.as_str(), e.canonical_name.as_str()));
        let aliases = schema
            .aliases
            .iter()
            .filter(|a| schema.contains(&a.canonical_name))
            .map(|a| (a.alias.as_str(), a.canonical_name.as_str()));

        let candidates = canonicals
            .chain(aliases)
            .map(|(title, canonical)| TitleCandidate {
                canonical_name: canonical.to_string(),
                normalized: title_normalize(title),
            })
            .filter(|c| !c.normalized.is_empty())
            .collect();

        Self { candidates }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Best candidate for title-normalized text, or `None` when the guard
    /// rejects every candidate.
    pub fn best_match(&self, normalized: &str, guard: &CoverageGuard) -> Option<TitleHit> {
        let mut best: Option<TitleHit> = None;

        for candidate in &self.candidates {
            if candidate.normalized == normalized {
                return Some(TitleHit {
                    canonical_name: candidate.canonical_name.clone(),
                    score: 100.0,
                    exact: true,
                });
            }

            let overlap = TokenOverlap::between(normalized, &candidate.normalized);
            if !guard.admits(&overlap) && !candidate.heads(normalized) {
                continue;
            }

            let score = token_set_ratio(normalized, &candidate.normalized);
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(TitleHit {
                    canonical_name: candidate.canonical_name.clone(),
                    score,
                    exact: false,
                });
            }
        }

        best
    }

    /// Whether `normalized` is exactly a known title of `canonical_name`.
    pub fn is_exact_title_of(&self, normalized: &str, canonical_name: &str) -> bool {
        self.candidates
            .iter()
            .any(|c| c.canonical_name == canonical_name && c.normalized == normalized)
    }
}

// ============ MAPPER CONFIGURATION ============

/// Title detection settings for one side of a comparison.
#[derive(Debug, Clone)]
pub struct MapperConfig {
    pub classifier: Arc<dyn LineClassifier>,
    pub window: TitleWindow,
    pub threshold: f64,
    /// Lines that may be absorbed into an accepted title
    pub max_title_lines: usize,
    pub long_line_chars: usize,
    pub default_body_font_size: f32,
    pub min_title_coverage: f64,
    pub min_line_coverage: f64,
}

impl MapperConfig {
    /// Strategy for documents whose lines came from `source`.
    pub fn for_source(source: LineSource, config: &AuditConfig) -> Self {
        let shape = ShapeRule {
            min_chars: config.min_title_chars,
            min_words: config.min_shape_words,
            max_words: config.max_title_words,
        };
        let classifier: Arc<dyn LineClassifier> = match source {
            LineSource::FontMetadata => Arc::new(StructuralClassifier::new(shape)),
            LineSource::PlainText => Arc::new(ShapeClassifier::new(shape)),
        };
        let (window, threshold) = match source {
            LineSource::FontMetadata => (TitleWindow::single(), config.font_threshold),
            LineSource::PlainText => (
                TitleWindow::greedy(config.title_window),
                config.plain_threshold,
            ),
        };

        Self {
            classifier,
            window,
            threshold,
            max_title_lines: config.title_window.max(1),
            long_line_chars: config.long_line_chars,
            default_body_font_size: config.default_body_font_size,
            min_title_coverage: config.min_title_coverage,
            min_line_coverage: config.min_line_coverage,
        }
    }

    pub fn font_metadata() -> Self {
        Self::for_source(LineSource::FontMetadata, &AuditConfig::default())
    }

    pub fn plain_text() -> Self {
        Self::for_source(LineSource::PlainText, &AuditConfig::default())
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn LineClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    fn guard(&self, signal: TitleSignal) -> CoverageGuard {
        CoverageGuard {
            min_title_coverage: self.min_title_coverage,
            min_line_coverage: match signal {
                TitleSignal::Structural => None,
                _ => Some(self.min_line_coverage),
            },
        }
    }
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self::font_metadata()
    }
}

// ============ BODY FONT SIZE ============

/// Most common font size among long non-bold lines.
///
/// Falls back to all long lines, then to `default_size`. Sizes are compared
/// to 0.1pt; ties go to the smaller size.
pub fn body_font_size(
    lines: &[StructuredLine],
    long_line_chars: usize,
    default_size: f32,
) -> f32 {
    let long = |l: &&StructuredLine| l.char_count() > long_line_chars;

    mode_font_size(lines.iter().filter(long).filter(|l| !l.is_bold))
        .or_else(|| mode_font_size(lines.iter().filter(long)))
        .unwrap_or(default_size)
}

fn mode_font_size<'a>(lines: impl Iterator<Item = &'a StructuredLine>) -> Option<f32> {
    let mut counts = std::collections::BTreeMap::new();
    for line in lines {
        *counts.entry((line.font_size * 10.0).round() as i64).or_insert(0usize) += 1;
    }

    let mut best: Option<(i64, usize)> = None;
    for (size, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((size, count));
        }
    }
    best.map(|(size, _)| size as f32 / 10.0)
}

// ============ SECTION MAPPER ============

#[derive(Debug, Clone)]
struct WindowHit {
    hit: TitleHit,
    lines: usize,
    text: String,
}

impl WindowHit {
    fn outranks(&self, other: &WindowHit) -> bool {
        if self.hit.score != other.hit.score {
            return self.hit.score > other.hit.score;
        }
        if self.hit.exact != other.hit.exact {
            return self.hit.exact;
        }
        self.lines < other.lines
    }
}

/// Locates the schema's section titles in a document.
#[derive(Debug, Clone)]
pub struct SectionMapper<'s> {
    schema: &'s SectionSchema,
    index: TitleIndex,
    config: MapperConfig,
}

impl<'s> SectionMapper<'s> {
    pub fn new(schema: &'s SectionSchema, config: MapperConfig) -> Self {
        Self {
            schema,
            index: TitleIndex::new(schema),
            config,
        }
    }

    pub fn schema(&self) -> &'s SectionSchema {
        self.schema
    }

    pub fn index(&self) -> &TitleIndex {
        &self.index
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn body_font_size(&self, document: &BulaDocument) -> f32 {
        body_font_size(
            document.lines(),
            self.config.long_line_chars,
            self.config.default_body_font_size,
        )
    }

    /// Sections in document order. Deterministic for a given document.
    pub fn map(&self, document: &BulaDocument) -> Vec<SectionMatch> {
        self.map_with_control(document, &RunControl::default())
            .unwrap_or_default()
    }

    /// Like [`map`](Self::map), checking `control` once per line.
    pub fn map_with_control(
        &self,
        document: &BulaDocument,
        control: &RunControl,
    ) -> AuditResult<Vec<SectionMatch>> {
        let lines = document.lines();
        let body_font = self.body_font_size(document);
        let mut matches: Vec<SectionMatch> = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            control.check()?;

            let best = match self.best_window(lines, i, body_font) {
                Some(best) if best.hit.score >= self.config.threshold => best,
                _ => {
                    i += 1;
                    continue;
                }
            };

            let (lines_used, title_text, score) =
                self.absorb_continuation(lines, i, &best, body_font);

            if matches
                .last()
                .map_or(false, |m| m.canonical_name == best.hit.canonical_name)
            {
                log::debug!(
                    "line {}: repeated title '{}' ignored",
                    i,
                    best.hit.canonical_name
                );
            } else {
                log::debug!(
                    "line {}: '{}' -> '{}' ({:.1})",
                    i,
                    title_text,
                    best.hit.canonical_name,
                    score
                );
                matches.push(SectionMatch {
                    canonical_name: best.hit.canonical_name,
                    matched_title_text: title_text,
                    start_line: i,
                    line_span: lines_used,
                    match_score: score,
                });
            }
            i += lines_used;
        }

        Ok(matches)
    }

    /// Score a single line as a title on its own. `None` unless the line is a
    /// candidate scoring at or above the threshold.
    pub fn score_line(&self, line: &StructuredLine, body_font_size: f32) -> Option<TitleHit> {
        let signal = self.config.classifier.classify(line, body_font_size);
        self.score_text(&line.text, signal)
            .filter(|hit| hit.score >= self.config.threshold)
    }

    fn score_text(&self, text: &str, signal: TitleSignal) -> Option<TitleHit> {
        if !signal.is_candidate() {
            return None;
        }
        let normalized = title_normalize(text);
        if normalized.is_empty() {
            return None;
        }
        self.index.best_match(&normalized, &self.config.guard(signal))
    }

    fn best_window(
        &self,
        lines: &[StructuredLine],
        start: usize,
        body_font: f32,
    ) -> Option<WindowHit> {
        let mut best: Option<WindowHit> = None;
        let mut text = String::new();
        let mut signal = TitleSignal::Structural;

        let window = lines[start..].iter().take(self.config.window.max_lines);
        for (offset, line) in window.enumerate() {
            let line_signal = self.config.classifier.classify(line, body_font);
            if !line_signal.is_candidate() {
                break;
            }
            signal = signal.min(line_signal);
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&line.text);

            if let Some(hit) = self.score_text(&text, signal) {
                let candidate = WindowHit {
                    hit,
                    lines: offset + 1,
                    text: text.clone(),
                };
                if best.as_ref().map_or(true, |b| candidate.outranks(b)) {
                    best = Some(candidate);
                }
            }
        }

        best
    }

    /// Extend an accepted title over following candidate lines that complete
    /// it into an exact known title of the same section.
    fn absorb_continuation(
        &self,
        lines: &[StructuredLine],
        start: usize,
        best: &WindowHit,
        body_font: f32,
    ) -> (usize, String, f64) {
        let mut result = (best.lines, best.text.clone(), best.hit.score);
        if best.hit.exact {
            return result;
        }

        let mut text = best.text.clone();
        let end = (start + self.config.max_title_lines).min(lines.len());
        for (idx, line) in lines.iter().enumerate().take(end).skip(start + best.lines) {
            if !self.config.classifier.classify(line, body_font).is_candidate() {
                break;
            }
            text.push(' ');
            text.push_str(&line.text);
            if self
                .index
                .is_exact_title_of(&title_normalize(&text), &best.hit.canonical_name)
            {
                result = (idx - start + 1, text.clone(), 100.0);
            }
        }

        result
    }
}
