use sentiment_core::FedditApiError;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the initial attempt
    pub max_retries: u32,
    /// Base delay for exponential backoff (in milliseconds)
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds)
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Maximum jitter factor (0.0 to 1.0)
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000, // 1s, 2s, 4s at the defaults
            max_delay_ms: 30000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.0,
        }
    }
}

impl RetryConfig {
    /// Retry config for the Feddit API with a configured retry budget.
    pub fn feddit(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }
}

/// Retry decision based on error type
#[derive(Debug, Clone, PartialEq)]
pub enum RetryStrategy {
    /// Retry with exponential backoff
    Retry,
    /// Don't retry (for permanent failures)
    NoRetry,
}

/// Any error status or transport failure from the upstream is treated as
/// transient; only a failed name resolution is permanent.
pub fn get_retry_strategy(error: &FedditApiError) -> RetryStrategy {
    match error {
        FedditApiError::SubfedditNotFound { .. } => RetryStrategy::NoRetry,
        FedditApiError::ServerError { .. } => RetryStrategy::Retry,
        FedditApiError::RequestTimeout => RetryStrategy::Retry,
        FedditApiError::Transport { .. } => RetryStrategy::Retry,
        FedditApiError::InvalidResponse { .. } => RetryStrategy::Retry,
    }
}

/// Calculate delay with exponential backoff and jitter
pub fn calculate_delay(attempt: u32, config: &RetryConfig) -> Duration {
    let multiplier = config.backoff_multiplier.powi(attempt as i32);
    let delay_ms = ((config.base_delay_ms as f64) * multiplier) as u64;
    let delay_ms = delay_ms.min(config.max_delay_ms);

    let jitter_range = (delay_ms as f64 * config.jitter_factor) as u64;
    let jitter = if jitter_range > 0 {
        fastrand::u64(0..=jitter_range)
    } else {
        0
    };

    Duration::from_millis((delay_ms + jitter).min(config.max_delay_ms))
}

/// Retry executor that wraps upstream calls with retry logic
#[derive(Debug)]
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Execute an operation, retrying transient failures with exponential
    /// backoff. Surfaces the last error once the retry budget is spent.
    pub async fn execute<F, Fut, T>(
        &self,
        operation_name: &str,
        operation: F,
    ) -> Result<T, FedditApiError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, FedditApiError>>,
    {
        let mut last_error: Option<FedditApiError> = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                debug!("Retry attempt {} for {}", attempt, operation_name);
            }

            match operation().await {
                Ok(result) => {
                    if attempt > 0 {
                        info!(
                            "Operation {} succeeded after {} retries",
                            operation_name, attempt
                        );
                    }
                    return Ok(result);
                }
                Err(err) => match get_retry_strategy(&err) {
                    RetryStrategy::NoRetry => {
                        debug!("Not retrying {} due to error type: {}", operation_name, err);
                        return Err(err);
                    }
                    RetryStrategy::Retry if attempt < self.config.max_retries => {
                        let delay = calculate_delay(attempt, &self.config);
                        warn!("Retrying {} in {:?} due to: {}", operation_name, delay, err);
                        last_error = Some(err);
                        sleep(delay).await;
                    }
                    _ => {
                        last_error = Some(err);
                        break;
                    }
                },
            }
        }

        error!(
            "Operation {} failed after {} attempts",
            operation_name,
            self.config.max_retries + 1
        );

        Err(last_error.unwrap_or(FedditApiError::Transport {
            details: "retry budget exhausted".to_string(),
        }))
    }
}
