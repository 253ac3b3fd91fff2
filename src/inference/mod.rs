mod classifier;
mod keywords;
mod playground;

pub use classifier::{
    JITTER_AMPLITUDE, KEYWORD_BOOST, MAX_BOOSTED_KEYWORDS, MAX_SCORE, NEUTRAL_SCORE,
    SentimentLabel, SentimentResult, TRAINED_BASE_SCORE, ToyClassifier, UNTRAINED_SCORE_MAX,
    UNTRAINED_SCORE_MIN,
};
pub use keywords::{NEGATIVE_KEYWORDS, POSITIVE_KEYWORDS, keyword_balance};
pub use playground::Playground;
