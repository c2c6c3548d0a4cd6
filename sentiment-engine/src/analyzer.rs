use crate::cache::ScoreCache;
use crate::model::PolarityModel;
use sentiment_core::SentimentScore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Scores text through the polarity model, memoizing results by content
/// hash. Model failures never escape: the caller's pipeline always gets a
/// score, falling back to polarity 0.0 / positive.
pub struct SentimentAnalyzer {
    model: Arc<dyn PolarityModel>,
    cache: ScoreCache,
    cache_ttl: Duration,
}

impl SentimentAnalyzer {
    pub fn new(model: Arc<dyn PolarityModel>, cache_ttl: Duration) -> Self {
        Self {
            model,
            cache: ScoreCache::new(),
            cache_ttl,
        }
    }

    pub fn analyze(&self, text: &str) -> SentimentScore {
        let key = ScoreCache::content_key(text);
        if let Some(score) = self.cache.get(&key) {
            debug!("Score cache hit");
            return score;
        }

        match self.model.polarity(text) {
            Ok(polarity) => {
                let score = SentimentScore::new(polarity);
                self.cache.set(key, score, self.cache_ttl);
                debug!(
                    "Analyzed sentiment: {} ({:.3})",
                    score.classification, score.polarity
                );
                score
            }
            Err(e) => {
                error!("Sentiment analysis failed, using fallback score: {}", e);
                SentimentScore::fallback()
            }
        }
    }

    /// Apply `analyze` to each text in input order.
    pub fn analyze_batch(&self, texts: &[String]) -> Vec<SentimentScore> {
        texts.iter().map(|text| self.analyze(text)).collect()
    }
}
