//! Lexicon-based sentiment scoring for post captions and TikTok text.
//!
//! Pure and deterministic: the same text and lexicon version always yield
//! the same comparative score and label. No I/O, no state.

pub mod lexicon;
pub mod scorer;

pub use scorer::{score, NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD};
