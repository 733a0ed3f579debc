//! Token-level alignment between two token sequences.
//!
//! `TokenAlignment` is a queryable data structure rather than rendering output:
//! one alignment is computed per text pair, and both sides' changed positions
//! are read from it. Rendering either side from the same alignment therefore
//! always agrees on which tokens correspond.
//!
//! # Example
//!
//! ```
//! use bula_text::{tokenize, TokenAligner};
//!
//! let left = tokenize("Não use se for alérgico.");
//! let right = tokenize("Não use se for alérgico ao princípio ativo.");
//! let alignment = TokenAligner::align(&left, &right);
//!
//! assert_eq!(alignment.stats.removed, 0);
//! assert_eq!(alignment.stats.added, 3);
//! ```

use serde::{Deserialize, Serialize};

use crate::token::Token;

/// Which side of an aligned pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Side {
    /// Left / original / reference
    Left,
    /// Right / revised / target
    Right,
}

/// Queryable token-level alignment between two token sequences.
#[derive(Debug, Clone)]
pub struct TokenAlignment {
    /// The aligned token index pairs, in sequence order.
    pub pairs: Vec<AlignedTokenPair>,
    /// Summary statistics for the alignment.
    pub stats: AlignmentStats,
}

impl TokenAlignment {
    /// Pairs that exist only in the right sequence.
    pub fn added(&self) -> impl Iterator<Item = &AlignedTokenPair> {
        self.pairs
            .iter()
            .filter(|p| matches!(p.relation, TokenRelation::RightOnly))
    }

    /// Pairs that exist only in the left sequence.
    pub fn removed(&self) -> impl Iterator<Item = &AlignedTokenPair> {
        self.pairs
            .iter()
            .filter(|p| matches!(p.relation, TokenRelation::LeftOnly))
    }

    /// All non-identical pairs.
    pub fn changes(&self) -> impl Iterator<Item = &AlignedTokenPair> {
        self.pairs
            .iter()
            .filter(|p| !matches!(p.relation, TokenRelation::Identical))
    }

    /// One flag per token of `side`: `true` when the token is outside every
    /// identical block.
    pub fn changed_mask(&self, side: Side) -> Vec<bool> {
        let total = match side {
            Side::Left => self.stats.total_left,
            Side::Right => self.stats.total_right,
        };
        let mut mask = vec![false; total];
        for pair in self.changes() {
            let index = match side {
                Side::Left => pair.left,
                Side::Right => pair.right,
            };
            if let Some(i) = index {
                mask[i] = true;
            }
        }
        mask
    }

    /// Similarity score (0.0 = completely different, 1.0 = identical).
    pub fn similarity(&self) -> f64 {
        let total = self.stats.total_left.max(self.stats.total_right);
        if total == 0 {
            return 1.0;
        }
        self.stats.identical as f64 / total as f64
    }
}

/// A single aligned pair of token indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedTokenPair {
    /// Index into the left sequence. None if added.
    pub left: Option<usize>,
    /// Index into the right sequence. None if removed.
    pub right: Option<usize>,
    pub relation: TokenRelation,
}

/// How two tokens relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenRelation {
    /// Same alignment key.
    Identical,
    /// Token only exists on the left (was removed).
    LeftOnly,
    /// Token only exists on the right (was added).
    RightOnly,
}

/// Summary statistics for a token alignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentStats {
    pub total_left: usize,
    pub total_right: usize,
    pub identical: usize,
    pub added: usize,
    pub removed: usize,
}

/// Token aligner over normalized alignment keys.
pub struct TokenAligner;

impl TokenAligner {
    /// Align two token sequences on their [`Token::alignment_key`].
    pub fn align(left: &[Token], right: &[Token]) -> TokenAlignment {
        let left_keys: Vec<String> = left.iter().map(Token::alignment_key).collect();
        let right_keys: Vec<String> = right.iter().map(Token::alignment_key).collect();
        Self::align_keys(&left_keys, &right_keys)
    }

    /// Align two key sequences directly.
    pub fn align_keys<K: PartialEq>(left: &[K], right: &[K]) -> TokenAlignment {
        let mut pairs = Vec::with_capacity(left.len().max(right.len()));
        let mut stats = AlignmentStats {
            total_left: left.len(),
            total_right: right.len(),
            ..Default::default()
        };

        for op in lcs_diff(left, right) {
            match op {
                DiffOp::Equal(l, r) => {
                    pairs.push(AlignedTokenPair {
                        left: Some(l),
                        right: Some(r),
                        relation: TokenRelation::Identical,
                    });
                    stats.identical += 1;
                }
                DiffOp::Insert(r) => {
                    pairs.push(AlignedTokenPair {
                        left: None,
                        right: Some(r),
                        relation: TokenRelation::RightOnly,
                    });
                    stats.added += 1;
                }
                DiffOp::Delete(l) => {
                    pairs.push(AlignedTokenPair {
                        left: Some(l),
                        right: None,
                        relation: TokenRelation::LeftOnly,
                    });
                    stats.removed += 1;
                }
            }
        }

        TokenAlignment { pairs, stats }
    }
}

// =============================================================================
// Diff Algorithm Implementation (LCS-based)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiffOp {
    /// Tokens at (left_idx, right_idx) are equal.
    Equal(usize, usize),
    /// Token at right_idx was inserted.
    Insert(usize),
    /// Token at left_idx was deleted.
    Delete(usize),
}

/// Longest-common-subsequence diff.
///
/// The common prefix and suffix are peeled off first. The differing middle is
/// split with Hirschberg's recursion, so memory stays linear in the right-hand
/// length while time stays O(N*M). Split points prefer the leftmost optimum,
/// which keeps the output deterministic.
fn lcs_diff<K: PartialEq>(left: &[K], right: &[K]) -> Vec<DiffOp> {
    let prefix = left
        .iter()
        .zip(right.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = left[prefix..]
        .iter()
        .rev()
        .zip(right[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let mut ops: Vec<DiffOp> = (0..prefix).map(|i| DiffOp::Equal(i, i)).collect();

    let l = &left[prefix..left.len() - suffix];
    let r = &right[prefix..right.len() - suffix];
    hirschberg(l, r, prefix, prefix, &mut ops);

    let left_tail = left.len() - suffix;
    let right_tail = right.len() - suffix;
    ops.extend((0..suffix).map(|k| DiffOp::Equal(left_tail + k, right_tail + k)));
    ops
}

/// Last row of the LCS length table for `n` left and `m` right items.
fn lcs_row(n: usize, m: usize, eq: impl Fn(usize, usize) -> bool) -> Vec<u32> {
    let mut prev = vec![0u32; m + 1];
    let mut curr = vec![0u32; m + 1];
    for i in 0..n {
        for j in 0..m {
            curr[j + 1] = if eq(i, j) {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev
}

fn hirschberg<K: PartialEq>(
    l: &[K],
    r: &[K],
    left_offset: usize,
    right_offset: usize,
    ops: &mut Vec<DiffOp>,
) {
    if l.is_empty() {
        ops.extend((0..r.len()).map(|j| DiffOp::Insert(right_offset + j)));
        return;
    }
    if r.is_empty() {
        ops.extend((0..l.len()).map(|i| DiffOp::Delete(left_offset + i)));
        return;
    }
    if l.len() == 1 {
        match r.iter().position(|b| *b == l[0]) {
            Some(j) => {
                ops.extend((0..j).map(|k| DiffOp::Insert(right_offset + k)));
                ops.push(DiffOp::Equal(left_offset, right_offset + j));
                ops.extend((j + 1..r.len()).map(|k| DiffOp::Insert(right_offset + k)));
            }
            None => {
                ops.push(DiffOp::Delete(left_offset));
                ops.extend((0..r.len()).map(|k| DiffOp::Insert(right_offset + k)));
            }
        }
        return;
    }

    let (top, bottom) = l.split_at(l.len() / 2);
    let m = r.len();
    let forward = lcs_row(top.len(), m, |i, j| top[i] == r[j]);
    let backward = lcs_row(bottom.len(), m, |i, j| bottom[bottom.len() - 1 - i] == r[m - 1 - j]);

    let mut split = 0;
    for k in 1..=m {
        if forward[k] + backward[m - k] > forward[split] + backward[m - split] {
            split = k;
        }
    }

    hirschberg(top, &r[..split], left_offset, right_offset, ops);
    hirschberg(bottom, &r[split..], left_offset + top.len(), right_offset + split, ops);
}
