use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::keywords::keyword_balance;

/// Confidence of a trained prediction before keyword boost.
pub const TRAINED_BASE_SCORE: f64 = 0.82;
/// Confidence added per matched keyword.
pub const KEYWORD_BOOST: f64 = 0.04;
/// Matched keywords beyond this many add no further confidence.
pub const MAX_BOOSTED_KEYWORDS: u32 = 3;
pub const MAX_SCORE: f64 = 0.99;
pub const NEUTRAL_SCORE: f64 = 0.6;
/// Peak-to-peak width of the jitter added to every score.
pub const JITTER_AMPLITUDE: f64 = 0.03;

/// Bounds of an untrained model's confidence.
pub const UNTRAINED_SCORE_MIN: f64 = 0.5;
pub const UNTRAINED_SCORE_MAX: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
            Self::Neutral => "NEUTRAL",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    /// Confidence in `[0, 1]`.
    pub score: f64,
}

/// Keyword sentiment classifier standing in for the base model and its
/// fine-tuned version.
///
/// Untrained, it guesses `POSITIVE` or `NEGATIVE` at random with a confidence
/// in `[0.5, 0.6]`. Trained, it counts keywords (see
/// [`super::keyword_balance`]) and answers with a confidence of
/// `0.82 + 0.04 * min(|balance|, 3)` plus jitter, capped at `0.99`, or
/// `NEUTRAL` around `0.6` when the balance is zero.
///
/// Stateless: the trained flag comes from whoever owns the training session.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToyClassifier;

impl ToyClassifier {
    /// Classifies `text` using the thread-local RNG for jitter.
    pub fn classify(&self, text: &str, trained: bool) -> SentimentResult {
        self.classify_with(text, trained, &mut rand::rng())
    }

    /// Classifies `text`, drawing every random term from `rng`.
    pub fn classify_with<R: Rng + ?Sized>(
        &self,
        text: &str,
        trained: bool,
        rng: &mut R,
    ) -> SentimentResult {
        let jitter = (rng.random::<f64>() - 0.5) * JITTER_AMPLITUDE;

        if !trained {
            let label = if rng.random_bool(0.5) {
                SentimentLabel::Positive
            } else {
                SentimentLabel::Negative
            };
            let score = UNTRAINED_SCORE_MIN + rng.random::<f64>() * 0.1 + jitter;

            return SentimentResult {
                label,
                score: score.clamp(UNTRAINED_SCORE_MIN, UNTRAINED_SCORE_MAX),
            };
        }

        let balance = keyword_balance(text);
        let label = match balance.signum() {
            1 => SentimentLabel::Positive,
            -1 => SentimentLabel::Negative,
            _ => {
                return SentimentResult {
                    label: SentimentLabel::Neutral,
                    score: NEUTRAL_SCORE + jitter,
                };
            }
        };

        let boosted = balance.unsigned_abs().min(MAX_BOOSTED_KEYWORDS);
        let score = TRAINED_BASE_SCORE + boosted as f64 * KEYWORD_BOOST + jitter;

        SentimentResult {
            label,
            score: score.min(MAX_SCORE),
        }
    }
}
