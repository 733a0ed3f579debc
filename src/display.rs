use std::fmt::Write;

use unicode_width::UnicodeWidthStr;

use crate::marked::MarkedText;

/// A changed segment located on one display line.
struct IncludedSpan {
    line: usize,
    start_col: usize,
    end_col: usize,
}

/// Terminal rendering of a [`MarkedText`]: each text line is followed by one
/// underline row per changed span on it.
//
// Não use se for alérgico ao princípio ativo.
//                         ╰────────────────╯changed
pub struct MarkedTextDisplay<'a> {
    marked: &'a MarkedText,
    label: String,
}

impl<'a> MarkedTextDisplay<'a> {
    pub fn new(marked: &'a MarkedText) -> Self {
        MarkedTextDisplay {
            marked,
            label: "changed".to_string(),
        }
    }

    /// Takes self
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    fn layout(&self) -> (Vec<String>, Vec<IncludedSpan>) {
        let mut lines = vec![String::new()];
        let mut spans = Vec::new();

        for segment in &self.marked.segments {
            let mut parts = segment.text.split('\n').peekable();
            while let Some(part) = parts.next() {
                let current = lines.len() - 1;
                let start_col = UnicodeWidthStr::width(lines[current].as_str());
                lines[current].push_str(part);
                let end_col = UnicodeWidthStr::width(lines[current].as_str());
                if segment.changed && end_col > start_col {
                    spans.push(IncludedSpan {
                        line: current,
                        start_col,
                        end_col,
                    });
                }
                if parts.peek().is_some() {
                    lines.push(String::new());
                }
            }
        }

        (lines, spans)
    }
}

impl<'a> std::fmt::Display for MarkedTextDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (lines, spans) = self.layout();

        for (line_idx, line) in lines.iter().enumerate() {
            if line_idx > 0 {
                f.write_char('\n')?;
            }
            f.write_str(line)?;

            for span in spans.iter().filter(|s| s.line == line_idx) {
                f.write_char('\n')?;
                for _ in 0..span.start_col {
                    f.write_char(' ')?;
                }

                f.write_char('╰')?;
                let char_len = span.end_col - span.start_col;
                for _ in (span.start_col + 1)..span.end_col.saturating_sub(1) {
                    f.write_char('─')?;
                }
                if char_len > 1 {
                    f.write_char('╯')?;
                }

                f.write_str(&self.label)?;
            }
        }

        Ok(())
    }
}
