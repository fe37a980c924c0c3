//! Keyword-based review classification for the review pipeline.
//!
//! Deterministic and auditable: each review is scored by presence of fixed
//! positive and negative indicator words, bucketed positive or negative
//! (a star rating, when present, overrides the keywords), and the batch is
//! summarized in a short synopsis.

pub mod classify;
pub mod lexicon;
pub mod synopsis;

pub use classify::{classify, classify_review};
pub use lexicon::{keyword_score, KeywordScore};
pub use synopsis::synopsis;
