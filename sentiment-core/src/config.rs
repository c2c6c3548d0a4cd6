use crate::error::ConfigError;
use std::env;
use std::str::FromStr;
use tracing::debug;

/// Application settings with environment variable overrides.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the Feddit API.
    pub feddit_base_url: String,
    /// Per-call network timeout for upstream requests, in seconds.
    pub request_timeout_secs: u64,
    /// Retries after the initial upstream attempt.
    pub max_retries: u32,
    /// Result limit applied when the caller does not provide one.
    pub default_comment_limit: u32,
    /// Ceiling above which requested limits are clamped.
    pub max_comment_limit: u32,
    /// TTL for cached sentiment scores, in seconds.
    pub score_cache_ttl_secs: u64,
    /// TTL for the cached subfeddit catalog, in seconds.
    pub subfeddit_cache_ttl_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feddit_base_url: "http://localhost:8080".to_string(),
            request_timeout_secs: 30,
            max_retries: 3,
            default_comment_limit: 25,
            max_comment_limit: 100,
            score_cache_ttl_secs: 3600,
            subfeddit_cache_ttl_secs: 600,
        }
    }
}

impl AppConfig {
    /// Build a configuration from defaults, overridden by environment
    /// variables where set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            feddit_base_url: env::var("FEDDIT_BASE_URL").unwrap_or(defaults.feddit_base_url),
            request_timeout_secs: read_env("FEDDIT_TIMEOUT_SECS", defaults.request_timeout_secs)?,
            max_retries: read_env("FEDDIT_MAX_RETRIES", defaults.max_retries)?,
            default_comment_limit: read_env(
                "DEFAULT_COMMENT_LIMIT",
                defaults.default_comment_limit,
            )?,
            max_comment_limit: read_env("MAX_COMMENT_LIMIT", defaults.max_comment_limit)?,
            score_cache_ttl_secs: read_env("SCORE_CACHE_TTL_SECS", defaults.score_cache_ttl_secs)?,
            subfeddit_cache_ttl_secs: read_env(
                "SUBFEDDIT_CACHE_TTL_SECS",
                defaults.subfeddit_cache_ttl_secs,
            )?,
        };

        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }
}

fn read_env<T: FromStr>(var: &str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            field: var.to_string(),
            value: raw,
        }),
        Err(_) => Ok(default),
    }
}
