use crate::api::SubfedditRecord;
use sentiment_core::SubfedditInfo;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct CatalogState {
    by_title: HashMap<String, SubfedditRecord>,
    fetched_at: Option<Instant>,
}

/// The last successful subfeddit listing, indexed by lower-cased title.
/// Lookups are case-insensitive exact matches. The catalog itself only
/// stores and serves; refresh orchestration lives in the client.
#[derive(Debug)]
pub struct SubfedditCatalog {
    state: RwLock<CatalogState>,
    ttl: Duration,
}

impl SubfedditCatalog {
    pub fn new(ttl: Duration) -> Self {
        Self {
            state: RwLock::new(CatalogState::default()),
            ttl,
        }
    }

    /// Whether the cached listing is within its TTL.
    pub async fn is_fresh(&self) -> bool {
        let state = self.state.read().await;
        state
            .fetched_at
            .map(|at| at.elapsed() < self.ttl)
            .unwrap_or(false)
    }

    /// Whether any listing was ever installed, fresh or stale.
    pub async fn is_populated(&self) -> bool {
        self.state.read().await.fetched_at.is_some()
    }

    /// Replace the cached listing with a freshly fetched one.
    pub async fn install(&self, records: Vec<SubfedditRecord>) {
        let mut by_title = HashMap::with_capacity(records.len());
        for record in records {
            let title = record.title.to_lowercase();
            if !title.is_empty() {
                by_title.insert(title, record);
            }
        }

        let mut state = self.state.write().await;
        debug!("Installed subfeddit catalog with {} entries", by_title.len());
        state.by_title = by_title;
        state.fetched_at = Some(Instant::now());
    }

    pub async fn resolve_id(&self, name: &str) -> Option<i64> {
        let state = self.state.read().await;
        state.by_title.get(&name.to_lowercase()).map(|r| r.id)
    }

    pub async fn info(&self, name: &str) -> Option<SubfedditInfo> {
        let state = self.state.read().await;
        state
            .by_title
            .get(&name.to_lowercase())
            .map(SubfedditInfo::from)
    }
}
