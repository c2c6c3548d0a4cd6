use reqwest::{Client, Response};
use sentiment_core::{Comment, ConfigError, FedditApiError, ServiceError, SubfedditInfo};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

const SUBFEDDITS_ENDPOINT: &str = "/api/v1/subfeddits/";
const COMMENTS_ENDPOINT: &str = "/api/v1/comments/";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubfedditRecord {
    pub id: i64,
    pub username: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubfedditsEnvelope {
    pub subfeddits: Vec<SubfedditRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: i64,
    pub username: String,
    pub text: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentsEnvelope {
    pub comments: Vec<CommentRecord>,
}

// Upstream ids are numeric; they are rendered to strings at this boundary.
impl From<CommentRecord> for Comment {
    fn from(record: CommentRecord) -> Self {
        Self {
            id: record.id.to_string(),
            username: record.username,
            text: record.text,
            created_at: record.created_at,
        }
    }
}

impl From<&SubfedditRecord> for SubfedditInfo {
    fn from(record: &SubfedditRecord) -> Self {
        Self {
            id: record.id.to_string(),
            username: record.username.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
        }
    }
}

/// Low-level Feddit API access: one HTTP GET per call, status mapped to
/// error kinds. Retry policy lives a layer up.
#[derive(Debug)]
pub struct FedditApi {
    http_client: Client,
    base_url: String,
}

impl FedditApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        Url::parse(base_url).map_err(|_| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
        })?;

        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn make_request(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<Response, FedditApiError> {
        let url = format!("{}{}", self.base_url, endpoint);

        debug!("Making Feddit API request: GET {}", endpoint);
        let response = match self.http_client.get(&url).query(query).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Network error for GET {}: {}", endpoint, e);
                return Err(if e.is_timeout() {
                    FedditApiError::RequestTimeout
                } else {
                    FedditApiError::Transport {
                        details: e.to_string(),
                    }
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            error!("Request failed with status {} for {}", status, endpoint);
            return Err(FedditApiError::ServerError {
                status_code: status.as_u16(),
            });
        }

        debug!("Request successful: {} {}", status, endpoint);
        Ok(response)
    }

    pub async fn get_subfeddits(&self) -> Result<Vec<SubfedditRecord>, FedditApiError> {
        let response = self.make_request(SUBFEDDITS_ENDPOINT, &[]).await?;

        let envelope: SubfedditsEnvelope = response.json().await.map_err(|e| {
            error!("Failed to parse subfeddit listing: {}", e);
            FedditApiError::InvalidResponse {
                details: "Failed to parse subfeddit listing".to_string(),
            }
        })?;

        debug!("Retrieved {} subfeddits", envelope.subfeddits.len());
        Ok(envelope.subfeddits)
    }

    pub async fn get_comments(
        &self,
        subfeddit_id: i64,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<CommentRecord>, FedditApiError> {
        let query = [
            ("subfeddit_id", subfeddit_id.to_string()),
            ("skip", skip.to_string()),
            ("limit", limit.to_string()),
        ];

        let response = self.make_request(COMMENTS_ENDPOINT, &query).await?;

        let envelope: CommentsEnvelope = response.json().await.map_err(|e| {
            error!("Failed to parse comments: {}", e);
            FedditApiError::InvalidResponse {
                details: format!("Failed to parse comments for subfeddit {}", subfeddit_id),
            }
        })?;

        debug!(
            "Retrieved {} comments for subfeddit {} (skip={})",
            envelope.comments.len(),
            subfeddit_id,
            skip
        );
        Ok(envelope.comments)
    }
}
