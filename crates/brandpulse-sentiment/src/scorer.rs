//! Comparative lexicon scoring with three-way labeling.

use brandpulse_core::{SentimentLabel, SentimentScore};

use crate::lexicon::valence;

/// Comparative scores at or above this are labeled positive.
pub const POSITIVE_THRESHOLD: f64 = 0.3;

/// Comparative scores at or below this are labeled negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.3;

/// Score a text string against the lexicon.
///
/// Splits on whitespace, trims non-alphabetic edges, lowercases, sums the
/// matched valences, and divides by the token count (the comparative,
/// length-normalized score). Empty or whitespace-only text scores 0.0 with
/// a neutral label.
#[must_use]
pub fn score(text: &str) -> SentimentScore {
    let mut total = 0i64;
    let mut tokens = 0u32;

    for word in text.split_whitespace() {
        tokens += 1;
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        if let Some(weight) = valence(&w) {
            total += i64::from(weight);
        }
    }

    if tokens == 0 {
        return SentimentScore::neutral();
    }

    #[allow(clippy::cast_precision_loss)]
    let comparative = total as f64 / f64::from(tokens);

    SentimentScore {
        score: comparative,
        label: label_for(comparative),
    }
}

/// Bucket a comparative score into its three-way label.
fn label_for(comparative: f64) -> SentimentLabel {
    if comparative >= POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else if comparative <= NEGATIVE_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}
