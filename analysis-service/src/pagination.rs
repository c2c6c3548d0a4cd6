use async_trait::async_trait;
use chrono::{DateTime, Utc};
use feddit_client::FedditClient;
use sentiment_core::{Comment, ServiceError, SubfedditInfo};
use tracing::{debug, info, warn};

/// Comments fetched per pagination step.
pub const BATCH_SIZE: u32 = 100;

/// No pagination is issued once the running offset exceeds this bound.
pub const MAX_SCAN_OFFSET: u32 = 10_000;

/// Paged access to a subfeddit's comments.
///
/// Correctness precondition on implementors: comments come back in a
/// stable chronological order within and across pages. The windowed fetch
/// below decides to skip or stop from a batch's first and last timestamps
/// alone and does not verify the ordering; an upstream that violates it
/// can silently lose in-window comments.
#[async_trait]
pub trait CommentSource: Send + Sync {
    async fn get_comments(
        &self,
        name: &str,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Comment>, ServiceError>;

    async fn get_subfeddit_info(&self, name: &str) -> Option<SubfedditInfo>;
}

#[async_trait]
impl CommentSource for feddit_client::FedditClient {
    async fn get_comments(
        &self,
        name: &str,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Comment>, ServiceError> {
        FedditClient::get_comments(self, name, skip, limit).await
    }

    async fn get_subfeddit_info(&self, name: &str) -> Option<SubfedditInfo> {
        FedditClient::get_subfeddit_info(self, name).await
    }
}

/// An optional date range with inclusive bounds; an unset side imposes no
/// constraint.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateWindow {
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, epoch_secs: i64) -> bool {
        if let Some(start) = self.start {
            if epoch_secs < start.timestamp() {
                return false;
            }
        }
        if let Some(end) = self.end {
            if epoch_secs > end.timestamp() {
                return false;
            }
        }
        true
    }
}

/// Fetch up to `limit` comments inside the window, in upstream order.
///
/// Without a window this is a single fetch of exactly `limit`. With one,
/// batches of [`BATCH_SIZE`] are paged through: a batch entirely before
/// the window is skipped without per-comment inspection, a batch starting
/// after the window ends the scan, and anything else is filtered
/// element-wise. The scan stops as soon as `limit` matches have
/// accumulated, and never pages past [`MAX_SCAN_OFFSET`]. An upstream
/// failure mid-scan yields the partial accumulation when there is one.
pub async fn fetch_window(
    source: &dyn CommentSource,
    name: &str,
    limit: usize,
    window: DateWindow,
) -> Result<Vec<Comment>, ServiceError> {
    if window.is_unbounded() {
        return source.get_comments(name, 0, limit as u32).await;
    }

    info!(
        "Using windowed pagination for {} (start: {:?}, end: {:?})",
        name, window.start, window.end
    );

    let mut matches: Vec<Comment> = Vec::new();
    let mut skip: u32 = 0;

    loop {
        let batch = match source.get_comments(name, skip, BATCH_SIZE).await {
            Ok(batch) => batch,
            Err(e) => {
                if matches.is_empty() {
                    return Err(e);
                }
                warn!(
                    "Returning {} partial results after upstream failure: {}",
                    matches.len(),
                    e
                );
                break;
            }
        };

        if batch.is_empty() {
            debug!("No more comments at skip={}", skip);
            break;
        }

        let first_created = batch[0].created_at;
        let last_created = batch[batch.len() - 1].created_at;

        // Entire batch precedes the window: advance without inspecting
        // individual comments.
        if let Some(start) = window.start {
            if last_created < start.timestamp() {
                debug!("Batch at skip={} ends before the window, skipping ahead", skip);
                skip += BATCH_SIZE;
                if skip > MAX_SCAN_OFFSET {
                    warn!("Reached pagination safety bound at offset {}", skip);
                    break;
                }
                continue;
            }
        }

        // First comment is already past the window: nothing later matches.
        if let Some(end) = window.end {
            if first_created > end.timestamp() {
                debug!("Batch at skip={} starts after the window, stopping", skip);
                break;
            }
        }

        matches.extend(batch.into_iter().filter(|c| window.contains(c.created_at)));

        if matches.len() >= limit {
            info!("Accumulated {} matching comments, stopping", matches.len());
            break;
        }

        skip += BATCH_SIZE;
        if skip > MAX_SCAN_OFFSET {
            warn!("Reached pagination safety bound at offset {}", skip);
            break;
        }
    }

    matches.truncate(limit);
    Ok(matches)
}
