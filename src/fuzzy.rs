//! Token-set fuzzy similarity on already-normalized strings.
//!
//! [`token_set_ratio`] is order-insensitive and subset-tolerant: when every
//! token of one side appears on the other side the score is 100 no matter
//! what else the longer side carries. Callers that need to bound that
//! tolerance use [`TokenOverlap`].

use std::collections::BTreeSet;

/// Plain edit-distance similarity on a 0-100 scale.
pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    strsim::normalized_levenshtein(a, b) * 100.0
}

fn token_set(text: &str) -> BTreeSet<&str> {
    text.split_whitespace().collect()
}

fn join(tokens: &BTreeSet<&str>) -> String {
    tokens.iter().copied().collect::<Vec<_>>().join(" ")
}

fn combine(sect: &str, rest: &str) -> String {
    match (sect.is_empty(), rest.is_empty()) {
        (true, _) => rest.to_string(),
        (false, true) => sect.to_string(),
        (false, false) => format!("{} {}", sect, rest),
    }
}

/// Token-set similarity (0-100).
///
/// Both sides are reduced to sorted unique token sets. The score is the best
/// of comparing the shared tokens against each side's "shared + own" form and
/// the two forms against each other. Empty input scores 0.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let left = token_set(a);
    let right = token_set(b);
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let shared: BTreeSet<&str> = left.intersection(&right).copied().collect();
    let only_left: BTreeSet<&str> = left.difference(&right).copied().collect();
    let only_right: BTreeSet<&str> = right.difference(&left).copied().collect();

    if !shared.is_empty() && (only_left.is_empty() || only_right.is_empty()) {
        return 100.0;
    }

    let sect = join(&shared);
    let combined_left = combine(&sect, &join(&only_left));
    let combined_right = combine(&sect, &join(&only_right));

    let mut best = ratio(&combined_left, &combined_right);
    if !sect.is_empty() {
        best = best
            .max(ratio(&sect, &combined_left))
            .max(ratio(&sect, &combined_right));
    }
    best
}

/// Token-set overlap counts between a line and a candidate title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenOverlap {
    pub shared: usize,
    pub left: usize,
    pub right: usize,
}

impl TokenOverlap {
    pub fn between(left: &str, right: &str) -> Self {
        let l = token_set(left);
        let r = token_set(right);
        Self {
            shared: l.intersection(&r).count(),
            left: l.len(),
            right: r.len(),
        }
    }

    /// Share of the left side's tokens found on the right.
    pub fn left_coverage(&self) -> f64 {
        if self.left == 0 {
            0.0
        } else {
            self.shared as f64 / self.left as f64
        }
    }

    /// Share of the right side's tokens found on the left.
    pub fn right_coverage(&self) -> f64 {
        if self.right == 0 {
            0.0
        } else {
            self.shared as f64 / self.right as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sets_score_full() {
        assert_eq!(token_set_ratio("indicacoes", "indicacoes"), 100.0);
        assert_eq!(
            token_set_ratio("este medicamento indicado", "indicado este medicamento"),
            100.0
        );
    }

    #[test]
    fn subsets_score_full() {
        assert_eq!(token_set_ratio("reacoes adversas", "reacoes adversas graves"), 100.0);
    }

    #[test]
    fn disjoint_sets_fall_back_to_edit_distance() {
        let score = token_set_ratio("contraindicacoes", "indicacoes");
        assert!(score < 85.0, "score was {}", score);
        assert!(score > 0.0);
    }

    #[test]
    fn partial_overlap_is_between() {
        let score = token_set_ratio("cuidados de armazenamento", "cuidados de conservacao");
        assert!(score > 0.0 && score < 100.0, "score was {}", score);
    }

    #[test]
    fn empty_scores_zero() {
        assert_eq!(token_set_ratio("", "algo"), 0.0);
        assert_eq!(token_set_ratio("", ""), 0.0);
    }

    #[test]
    fn overlap_coverage() {
        let overlap = TokenOverlap::between("em caso de superdose procure", "superdose");
        assert_eq!(overlap.shared, 1);
        assert!((overlap.left_coverage() - 0.2).abs() < 1e-9);
        assert_eq!(overlap.right_coverage(), 1.0);
    }
}
