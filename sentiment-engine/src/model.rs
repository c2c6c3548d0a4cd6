use sentiment_core::ServiceError;

/// The black-box polarity function: text in, a score in [-1, 1] out.
/// Implementations may call external services or run local models; the
/// analyzer treats any failure as recoverable.
pub trait PolarityModel: Send + Sync {
    fn polarity(&self, text: &str) -> Result<f64, ServiceError>;
}

const POSITIVE_WORDS: &[&str] = &[
    "amazing", "awesome", "beautiful", "best", "brilliant", "delightful", "enjoy", "enjoyed",
    "excellent", "fantastic", "favorite", "fun", "glad", "good", "great", "happy", "helpful",
    "impressive", "interesting", "like", "love", "loved", "lovely", "nice", "perfect", "pleasant",
    "proud", "recommend", "solid", "superb", "thanks", "useful", "well", "wonderful", "wow",
];

const NEGATIVE_WORDS: &[&str] = &[
    "annoying", "awful", "bad", "boring", "broken", "confusing", "disappointed", "disappointing",
    "dislike", "dreadful", "fail", "failed", "frustrating", "hate", "hated", "horrible", "issue",
    "mediocre", "mess", "nasty", "painful", "poor", "problem", "sad", "slow", "terrible",
    "trouble", "ugly", "unhappy", "unusable", "useless", "waste", "worse", "worst", "wrong",
];

/// Word-list polarity model: the normalized difference of positive and
/// negative token matches. Deliberately simple; the trait seam is the
/// extension point for anything stronger.
#[derive(Debug, Default)]
pub struct LexiconModel;

impl LexiconModel {
    pub fn new() -> Self {
        Self
    }
}

impl PolarityModel for LexiconModel {
    fn polarity(&self, text: &str) -> Result<f64, ServiceError> {
        let lowered = text.to_lowercase();
        let mut positive = 0usize;
        let mut negative = 0usize;

        for token in lowered.split(|c: char| !c.is_alphanumeric()) {
            if token.is_empty() {
                continue;
            }
            if POSITIVE_WORDS.binary_search(&token).is_ok() {
                positive += 1;
            } else if NEGATIVE_WORDS.binary_search(&token).is_ok() {
                negative += 1;
            }
        }

        let matched = positive + negative;
        if matched == 0 {
            return Ok(0.0);
        }

        Ok((positive as f64 - negative as f64) / matched as f64)
    }
}
