use sentiment_core::SentimentScore;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    score: SentimentScore,
    expires_at: Instant,
}

/// In-memory score cache with per-entry TTL. Expired entries are evicted
/// lazily on read; there is no background sweep and no capacity bound.
/// The lock is only held for map access, never across an await point.
#[derive(Debug, Default)]
pub struct ScoreCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ScoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic content key: hex-encoded SHA-256 of the text bytes,
    /// stable across process runs.
    pub fn content_key(text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn get(&self, key: &str) -> Option<SentimentScore> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.score),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn set(&self, key: String, score: SentimentScore, ttl: Duration) {
        let entry = CacheEntry {
            score,
            expires_at: Instant::now() + ttl,
        };
        self.entries.lock().unwrap().insert(key, entry);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_key_is_stable() {
        let a = ScoreCache::content_key("the same text");
        let b = ScoreCache::content_key("the same text");
        let c = ScoreCache::content_key("different text");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_set_then_get() {
        let cache = ScoreCache::new();
        let key = ScoreCache::content_key("hello");
        cache.set(key.clone(), SentimentScore::new(0.5), Duration::from_secs(60));

        let score = cache.get(&key).unwrap();
        assert_eq!(score.polarity, 0.5);
        assert!(cache.get("unknown-key").is_none());
    }

    #[test]
    fn test_expired_entry_is_evicted_on_read() {
        let cache = ScoreCache::new();
        let key = ScoreCache::content_key("hello");
        cache.set(key.clone(), SentimentScore::new(0.5), Duration::from_millis(10));
        assert_eq!(cache.len(), 1);

        std::thread::sleep(Duration::from_millis(20));
        assert!(cache.get(&key).is_none());
        assert_eq!(cache.len(), 0);
    }
}
