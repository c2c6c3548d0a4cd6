pub mod api;
pub mod catalog;
pub mod retry;


use api::FedditApi;
use catalog::SubfedditCatalog;
use retry::{RetryConfig, RetryExecutor};
use sentiment_core::{AppConfig, Comment, FedditApiError, ServiceError, SubfedditInfo};
use std::time::Duration;
use tracing::{debug, warn};

/// High-level Feddit client: name resolution through the cached subfeddit
/// catalog, retried page fetches, best-effort metadata lookup.
#[derive(Debug)]
pub struct FedditClient {
    api: FedditApi,
    catalog: SubfedditCatalog,
    retry: RetryExecutor,
}

impl FedditClient {
    pub fn new(config: &AppConfig) -> Result<Self, ServiceError> {
        let api = FedditApi::new(
            &config.feddit_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;

        Ok(Self {
            api,
            catalog: SubfedditCatalog::new(Duration::from_secs(config.subfeddit_cache_ttl_secs)),
            retry: RetryExecutor::new(RetryConfig::feddit(config.max_retries)),
        })
    }

    /// Refresh the subfeddit catalog when its TTL has lapsed. A failed
    /// refresh keeps serving stale entries when any exist; the failure is
    /// only surfaced indirectly, as an unresolved lookup, when the catalog
    /// was never populated.
    async fn refresh_catalog(&self) {
        if self.catalog.is_fresh().await {
            debug!("Using cached subfeddit catalog");
            return;
        }

        match self
            .retry
            .execute("list_subfeddits", || self.api.get_subfeddits())
            .await
        {
            Ok(records) => self.catalog.install(records).await,
            Err(e) => {
                if self.catalog.is_populated().await {
                    warn!("Serving stale subfeddit catalog after refresh failure: {}", e);
                } else {
                    warn!("Failed to fetch subfeddit catalog: {}", e);
                }
            }
        }
    }

    /// Fetch one page of comments for a subfeddit addressed by name.
    /// Name matching is a case-insensitive exact match on title.
    pub async fn get_comments(
        &self,
        name: &str,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Comment>, ServiceError> {
        self.refresh_catalog().await;

        let subfeddit_id = self.catalog.resolve_id(name).await.ok_or_else(|| {
            FedditApiError::SubfedditNotFound {
                name: name.to_string(),
            }
        })?;

        let records = self
            .retry
            .execute("get_comments", || {
                self.api.get_comments(subfeddit_id, skip, limit)
            })
            .await?;

        Ok(records.into_iter().map(Comment::from).collect())
    }

    /// Look up subfeddit metadata by name. Refreshes the catalog once on a
    /// stale cache; absent (never an error) if the name stays unresolved.
    pub async fn get_subfeddit_info(&self, name: &str) -> Option<SubfedditInfo> {
        self.refresh_catalog().await;
        self.catalog.info(name).await
    }
}
