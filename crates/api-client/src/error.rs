//! Error types for the catalog API client

use std::time::Duration;
use thiserror::Error;

/// Provider application-level code for rejected credentials
pub const PROVIDER_CODE_AUTH: u32 = 430;
/// Provider application-level codes for quota exhaustion
pub const PROVIDER_CODES_RATE_LIMIT: [u32; 2] = [437, 438];

/// Result type alias for catalog API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Catalog API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing environment variable
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// The caller built an out-of-contract query
    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    /// HTTP-level error response
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Error message from the provider
        message: String,
    },

    /// Application-level error in the provider envelope
    #[error("Provider error {code}: {message}")]
    Provider {
        /// Provider error code
        code: u32,
        /// Provider error message
        message: String,
    },

    /// Credentials rejected; no further queries can succeed
    #[error("Catalog provider rejected credentials: {0}")]
    Auth(String),

    /// Circuit breaker is open
    #[error("Circuit breaker is open - provider temporarily unavailable")]
    CircuitOpen,

    /// Local rate limiter refused the request
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Request timeout
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// All retry attempts exhausted
    #[error("All {attempts} retry attempts failed: {last_error}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Last error message
        last_error: String,
    },

    /// Provider payload could not be turned into catalog items
    #[error("Invalid catalog payload: {0}")]
    InvalidPayload(String),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a missing env var error
    pub fn missing_env(var: impl Into<String>) -> Self {
        Self::MissingEnvVar(var.into())
    }

    /// Create an invalid-query error
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    /// Create an HTTP-level error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Classify a provider envelope code into a typed error
    pub fn from_provider_code(code: u32, message: impl Into<String>) -> Self {
        let message = message.into();
        if code == PROVIDER_CODE_AUTH {
            Self::Auth(message)
        } else {
            Self::Provider { code, message }
        }
    }

    /// Transient failure: the caller may retry with backoff
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect() || e.is_timeout(),
            Self::ApiResponse { status, .. } => *status >= 500 || *status == 429,
            Self::Provider { code, .. } => PROVIDER_CODES_RATE_LIMIT.contains(code),
            Self::Timeout(_) => true,
            Self::CircuitOpen | Self::RateLimited => false,
            Self::Auth(_)
            | Self::Config(_)
            | Self::MissingEnvVar(_)
            | Self::InvalidQuery(_)
            | Self::Json(_)
            | Self::InvalidPayload(_)
            | Self::RetriesExhausted { .. } => false,
        }
    }

    /// Fatal credential failure: stop the batch and surface to the user
    #[must_use]
    pub fn is_auth(&self) -> bool {
        match self {
            Self::Auth(_) => true,
            Self::ApiResponse { status, .. } => *status == 401 || *status == 403,
            _ => false,
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if (400..500).contains(status))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if *status >= 500)
    }
}

impl From<bommatch_core::Error> for ApiError {
    fn from(err: bommatch_core::Error) -> Self {
        Self::InvalidPayload(err.to_string())
    }
}
