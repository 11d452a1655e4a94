//! Configuration for the catalog API client
//!
//! Environment-based configuration with sensible defaults. Credential
//! persistence lives in an external settings store; this module only reads
//! what the process environment provides.

use crate::error::{ApiError, ApiResult};
use bommatch_core::rate_limit::RateLimitConfig;
use bommatch_core::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default production catalog endpoint
const DEFAULT_API_URL: &str = "https://api.partsbridge.example.com/v1";

/// Hard upper bound on page size accepted by any provider profile
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Environment types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development (typically a mock catalog server)
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

impl Default for Environment {
    fn default() -> Self {
        Self::Production
    }
}

impl Environment {
    /// Parse from environment variable
    pub fn from_env() -> Self {
        match env::var("BOMMATCH_ENV")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "development" | "dev" | "local" => Self::Development,
            "staging" | "stage" => Self::Staging,
            _ => Self::Production,
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the catalog provider API
    pub base_url: String,
    /// API key issued by the provider
    pub api_key: Option<String>,
    /// API secret paired with the key (signing happens at the transport)
    pub api_secret: Option<String>,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Largest page the provider profile accepts
    pub max_page_size: u32,
    /// Retry configuration
    pub retry: RetryConfig,
    /// Rate limit configuration
    pub rate_limit: RateLimitConfig,
    /// Current environment
    pub environment: Environment,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            api_secret: None,
            timeout: Duration::from_secs(30),
            max_page_size: 100,
            retry: RetryConfig::default(),
            rate_limit: RateLimitConfig::per_minute(100),
            environment: Environment::default(),
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `BOMMATCH_API_URL`: Base URL of the catalog provider
    /// - `BOMMATCH_API_KEY` / `BOMMATCH_API_SECRET`: Provider credentials
    /// - `BOMMATCH_ENV`: Environment (development/staging/production)
    /// - `BOMMATCH_TIMEOUT_SECS`: Request timeout in seconds
    pub fn from_env() -> ApiResult<Self> {
        let environment = Environment::from_env();

        let base_url =
            env::var("BOMMATCH_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let api_key = env::var("BOMMATCH_API_KEY").ok();
        let api_secret = env::var("BOMMATCH_API_SECRET").ok();

        let timeout = env::var("BOMMATCH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        // Retry and quota posture follow the environment
        let retry = match environment {
            Environment::Development => RetryConfig::interactive(),
            Environment::Staging => RetryConfig::default(),
            Environment::Production => RetryConfig::batch(),
        };

        let rate_limit = match environment {
            Environment::Development => RateLimitConfig::per_minute(1000),
            Environment::Staging => RateLimitConfig::per_minute(200),
            Environment::Production => RateLimitConfig::per_minute(100),
        };

        // Mock servers accept oversized pages; the real provider caps at 100
        let max_page_size = match environment {
            Environment::Development => MAX_PAGE_SIZE,
            Environment::Staging | Environment::Production => 100,
        };

        Ok(Self {
            base_url,
            api_key,
            api_secret,
            timeout,
            max_page_size,
            retry,
            rate_limit,
            environment,
        })
    }

    /// Create development configuration (local mock catalog)
    #[must_use]
    pub fn development() -> Self {
        Self {
            base_url: "http://localhost:8030/v1".to_string(),
            api_key: env::var("BOMMATCH_API_KEY").ok(),
            api_secret: env::var("BOMMATCH_API_SECRET").ok(),
            timeout: Duration::from_secs(10),
            max_page_size: MAX_PAGE_SIZE,
            retry: RetryConfig::interactive(),
            rate_limit: RateLimitConfig::per_minute(1000),
            environment: Environment::Development,
        }
    }

    /// Create production configuration
    #[must_use]
    pub fn production() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_key: env::var("BOMMATCH_API_KEY").ok(),
            api_secret: env::var("BOMMATCH_API_SECRET").ok(),
            timeout: Duration::from_secs(30),
            max_page_size: 100,
            retry: RetryConfig::batch(),
            rate_limit: RateLimitConfig::per_minute(100),
            environment: Environment::Production,
        }
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set credentials
    #[must_use]
    pub fn with_credentials(
        mut self,
        key: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        self.api_key = Some(key.into());
        self.api_secret = Some(secret.into());
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set retry config
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Builder-style method to set rate limit config
    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.base_url.is_empty() {
            return Err(ApiError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::config(
                "base_url must start with http:// or https://",
            ));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        if self.max_page_size == 0 || self.max_page_size > MAX_PAGE_SIZE {
            return Err(ApiError::config(format!(
                "max_page_size must be in 1..={}",
                MAX_PAGE_SIZE
            )));
        }

        Ok(())
    }
}
