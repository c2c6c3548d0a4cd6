use crate::error::*;
use tracing::{error, warn};

/// Classification hooks for the hosting layer: which failures are worth
/// retrying, which status class they map to, and what to show a caller.
pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn is_retryable(&self) -> bool;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for ServiceError {
    fn log_error(&self) -> &Self {
        error!("ServiceError: {}", self);
        match self {
            ServiceError::Feddit(e) => {
                error!("Feddit API error details: {:?}", e);
            }
            ServiceError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ServiceError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        match self {
            ServiceError::Feddit(e) => e.is_retryable(),
            ServiceError::Network(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ServiceError::Feddit(e) => e.user_friendly_message(),
            ServiceError::Network(_) => {
                "Network connection error. Please check your connection.".to_string()
            }
            ServiceError::Validation { message } => {
                format!("Invalid parameter: {}", message)
            }
            ServiceError::Config(_) => {
                "Configuration error occurred. Please check your settings.".to_string()
            }
            _ => "An unexpected error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            ServiceError::Feddit(_) => "UPSTREAM".to_string(),
            ServiceError::Config(_) => "CONFIG".to_string(),
            ServiceError::Network(_) => "NETWORK".to_string(),
            ServiceError::Serialization(_) => "SERIALIZATION".to_string(),
            ServiceError::Validation { .. } => "VALIDATION".to_string(),
            ServiceError::Internal { .. } => "INTERNAL".to_string(),
        }
    }
}

impl ErrorExt for FedditApiError {
    fn log_error(&self) -> &Self {
        error!("FedditApiError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("FedditApiError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        match self {
            // Any upstream error status is treated as transient.
            FedditApiError::ServerError { .. } => true,
            FedditApiError::RequestTimeout => true,
            FedditApiError::Transport { .. } => true,
            FedditApiError::InvalidResponse { .. } => true,
            FedditApiError::SubfedditNotFound { .. } => false,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            FedditApiError::SubfedditNotFound { name } => {
                format!("Subfeddit '{}' not found.", name)
            }
            FedditApiError::RequestTimeout => {
                "Request to Feddit timed out. Please try again.".to_string()
            }
            _ => "Unable to fetch data from the Feddit API. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            FedditApiError::SubfedditNotFound { .. } => "FEDDIT_NOT_FOUND".to_string(),
            FedditApiError::ServerError { .. } => "FEDDIT_SERVER_ERROR".to_string(),
            FedditApiError::RequestTimeout => "FEDDIT_TIMEOUT".to_string(),
            FedditApiError::Transport { .. } => "FEDDIT_TRANSPORT".to_string(),
            FedditApiError::InvalidResponse { .. } => "FEDDIT_INVALID_RESPONSE".to_string(),
        }
    }
}
