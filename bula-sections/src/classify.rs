//! Title candidate classification.
//!
//! A classifier answers one question about a line: could it be a section
//! title? The mapper scores only the lines a classifier lets through.

use std::fmt;

use bula_document::StructuredLine;

/// How a line qualified as a title candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TitleSignal {
    /// Not a candidate.
    None,
    /// Qualified by word count and punctuation alone.
    Shape,
    /// Qualified by bold type at or above the body font size.
    Structural,
}

impl TitleSignal {
    pub fn is_candidate(self) -> bool {
        self != TitleSignal::None
    }
}

/// Decides whether a line is plausibly a section title.
pub trait LineClassifier: fmt::Debug + Send + Sync {
    fn classify(&self, line: &StructuredLine, body_font_size: f32) -> TitleSignal;
}

/// Title shape: short, few words, and not ending like a sentence fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeRule {
    pub min_chars: usize,
    /// Lines with more words than this qualify whatever their ending.
    pub min_words: usize,
    pub max_words: usize,
}

impl Default for ShapeRule {
    fn default() -> Self {
        Self {
            min_chars: 4,
            min_words: 3,
            max_words: 20,
        }
    }
}

impl ShapeRule {
    pub fn matches(&self, text: &str) -> bool {
        let text = text.trim();
        if text.chars().count() < self.min_chars {
            return false;
        }
        let words = text.split_whitespace().count();
        if words >= self.max_words {
            return false;
        }
        words > self.min_words || !text.ends_with(|c| matches!(c, '.' | ',' | ';'))
    }
}

/// Uses font metadata first and falls back to the shape rule.
#[derive(Debug, Clone, Default)]
pub struct StructuralClassifier {
    pub shape: ShapeRule,
}

impl StructuralClassifier {
    pub fn new(shape: ShapeRule) -> Self {
        Self { shape }
    }
}

impl LineClassifier for StructuralClassifier {
    fn classify(&self, line: &StructuredLine, body_font_size: f32) -> TitleSignal {
        if line.text.chars().count() < self.shape.min_chars {
            TitleSignal::None
        } else if line.is_bold && line.font_size >= body_font_size {
            TitleSignal::Structural
        } else if self.shape.matches(&line.text) {
            TitleSignal::Shape
        } else {
            TitleSignal::None
        }
    }
}

/// Ignores font metadata; for OCR and flattened layouts.
#[derive(Debug, Clone, Default)]
pub struct ShapeClassifier {
    pub shape: ShapeRule,
}

impl ShapeClassifier {
    pub fn new(shape: ShapeRule) -> Self {
        Self { shape }
    }
}

impl LineClassifier for ShapeClassifier {
    fn classify(&self, line: &StructuredLine, _body_font_size: f32) -> TitleSignal {
        if self.shape.matches(&line.text) {
            TitleSignal::Shape
        } else {
            TitleSignal::None
        }
    }
}

/// How many consecutive candidate lines a title may span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleWindow {
    pub max_lines: usize,
}

impl TitleWindow {
    pub fn single() -> Self {
        Self { max_lines: 1 }
    }

    pub fn greedy(max_lines: usize) -> Self {
        Self {
            max_lines: max_lines.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold(text: &str, size: f32) -> StructuredLine {
        StructuredLine::new(text, size, true, 0.0)
    }

    #[test]
    fn shape_rule() {
        let rule = ShapeRule::default();
        assert!(rule.matches("DIZERES LEGAIS"));
        assert!(rule.matches("Indicações"));
        assert!(rule.matches("4. O QUE DEVO SABER ANTES DE USAR ESTE MEDICAMENTO?"));
        assert!(rule.matches("Tome um comprimido por dia, de preferência à noite."));
        assert!(!rule.matches("Uso."));
        assert!(!rule.matches("mg"));
        assert!(!rule.matches("Comprimidos revestidos."));
        assert!(!rule.matches(
            "Este medicamento é contraindicado para uso por pacientes com histórico de alergia a qualquer um dos componentes da fórmula deste produto"
        ));
    }

    #[test]
    fn structural_prefers_font_metadata() {
        let classifier = StructuralClassifier::default();
        assert_eq!(
            classifier.classify(&bold("Composição:", 10.0), 10.0),
            TitleSignal::Structural
        );
        assert_eq!(
            classifier.classify(&bold("ver bula.", 8.0), 10.0),
            TitleSignal::None
        );
        assert_eq!(
            classifier.classify(&StructuredLine::plain("REAÇÕES ADVERSAS", 0.0), 10.0),
            TitleSignal::Shape
        );
        assert_eq!(classifier.classify(&bold("USO", 12.0), 10.0), TitleSignal::None);
    }

    #[test]
    fn shape_classifier_ignores_bold() {
        let classifier = ShapeClassifier::default();
        assert_eq!(
            classifier.classify(&bold("ver bula.", 14.0), 10.0),
            TitleSignal::None
        );
        assert_eq!(
            classifier.classify(&StructuredLine::plain("SUPERDOSE", 0.0), 10.0),
            TitleSignal::Shape
        );
    }

    #[test]
    fn window_is_at_least_one_line() {
        assert_eq!(TitleWindow::greedy(0).max_lines, 1);
        assert_eq!(TitleWindow::single().max_lines, 1);
    }
}
