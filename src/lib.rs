//! Text primitives for auditing pharmaceutical package inserts ("bulas").
//!
//! This crate holds the parts of the audit that only look at strings:
//!
//! - [`normalize`] - display, content and title normal forms
//! - [`tokenize`] - word / punctuation / line-break tokens with source spacing
//! - [`token_set_ratio`] - order-insensitive, subset-tolerant similarity (0-100)
//! - [`TokenAligner`] - LCS alignment over normalized tokens
//! - [`MarkedText`] / [`MarkedTextDisplay`] - changed-token output and its
//!   terminal rendering
//!
//! Document structure (lines, sections, schemas) lives in `bula-document` and
//! `bula-sections`.
//!
//! ## Example
//!
//! ```
//! use bula_text::{content_normalize, title_normalize};
//!
//! assert_eq!(title_normalize("1. INDICAÇÕES"), title_normalize("Indicações"));
//! assert_eq!(content_normalize("Não use!"), "nao use");
//! ```

mod diff;
mod display;
mod fuzzy;
mod marked;
pub mod normalize;
mod token;

pub use diff::{
    AlignedTokenPair, AlignmentStats, Side, TokenAligner, TokenAlignment, TokenRelation,
};
pub use display::MarkedTextDisplay;
pub use fuzzy::{ratio, token_set_ratio, TokenOverlap};
pub use marked::{MarkedSegment, MarkedText};
pub use normalize::{
    content_normalize, display_normalize, fold_case_and_accents, strip_numeric_prefix,
    title_normalize, Normalization,
};
pub use token::{tokenize, Token, TokenTag};
