//! Error types for the coaching service integration

use thiserror::Error;

/// Errors that can occur when calling the coaching service
#[derive(Debug, Error)]
pub enum CoachError {
    /// API key is not configured
    #[error("API key not configured. Set {env_var} or run `dsa-coach auth set <key>`")]
    ApiKeyNotFound {
        /// Environment variable that was consulted
        env_var: String,
    },

    /// Failed to access system keyring
    #[error("Failed to access keyring: {0}")]
    KeyringError(String),

    /// Invalid API key format
    #[error("Invalid API key format. Key should start with 'gsk_'")]
    InvalidApiKey,

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// Rate limited by the API
    #[error("Rate limited. Retry after {retry_after_seconds} seconds")]
    RateLimited {
        /// Seconds to wait before retrying
        retry_after_seconds: u64,
    },

    /// The response contained no generated text
    #[error("The coaching service returned an empty completion")]
    EmptyCompletion,

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CoachError {
    /// Check if this error is recoverable (user can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CoachError::RateLimited { .. }
                | CoachError::RequestError(_)
                | CoachError::EmptyCompletion
                | CoachError::ApiError { status: 500..=599, .. }
        )
    }

    /// Check if this error requires re-authentication
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            CoachError::ApiKeyNotFound { .. }
                | CoachError::InvalidApiKey
                | CoachError::ApiError { status: 401, .. }
        )
    }
}
