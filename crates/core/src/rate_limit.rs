//! Rate limiting for catalog provider calls
//!
//! The catalog provider enforces a requests-per-minute quota. This module
//! provides a token-bucket limiter keyed per endpoint, plus a helper to
//! derive a safe worker-pool size from the configured quota.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Rate limiter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
    /// Burst allowance (extra requests allowed in short bursts)
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(60),
            burst: 10,
        }
    }
}

impl RateLimitConfig {
    /// Create a strict rate limit (no burst)
    #[must_use]
    pub fn strict(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            burst: 0,
        }
    }

    /// Per-minute rate limit, matching how catalog providers quote quotas
    #[must_use]
    pub fn per_minute(max: u32) -> Self {
        Self {
            max_requests: max,
            window: Duration::from_secs(60),
            burst: max / 4,
        }
    }

    /// Per-second rate limit
    #[must_use]
    pub fn per_second(max: u32) -> Self {
        Self {
            max_requests: max,
            window: Duration::from_secs(1),
            burst: max / 2,
        }
    }

    /// Worker-pool size that keeps in-flight requests within the quota.
    ///
    /// A batch run holding this many concurrent requests cannot exceed the
    /// provider's per-window limit even if every request completes
    /// instantly. Always at least 1.
    #[must_use]
    pub fn suggested_concurrency(&self) -> usize {
        let per_second = f64::from(self.max_requests) / self.window.as_secs_f64().max(1.0);
        (per_second.floor() as usize).max(1)
    }
}

/// Token bucket state
#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
    config: RateLimitConfig,
}

impl TokenBucket {
    fn new(config: RateLimitConfig) -> Self {
        Self {
            tokens: f64::from(config.max_requests + config.burst),
            last_update: Instant::now(),
            config,
        }
    }

    fn try_acquire(&mut self, tokens: u32) -> bool {
        self.refill();

        if self.tokens >= f64::from(tokens) {
            self.tokens -= f64::from(tokens);
            true
        } else {
            false
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update);
        let refill_rate = f64::from(self.config.max_requests) / self.config.window.as_secs_f64();
        let new_tokens = elapsed.as_secs_f64() * refill_rate;

        self.tokens = (self.tokens + new_tokens)
            .min(f64::from(self.config.max_requests + self.config.burst));
        self.last_update = now;
    }

    fn available(&mut self) -> u32 {
        self.refill();
        self.tokens as u32
    }

    fn time_until_available(&mut self, tokens: u32) -> Duration {
        self.refill();

        if self.tokens >= f64::from(tokens) {
            return Duration::ZERO;
        }

        let needed = f64::from(tokens) - self.tokens;
        let refill_rate = f64::from(self.config.max_requests) / self.config.window.as_secs_f64();
        Duration::from_secs_f64(needed / refill_rate)
    }
}

/// Rate limiter with one bucket per endpoint key
pub struct RateLimiter {
    buckets: Arc<RwLock<HashMap<String, TokenBucket>>>,
    default_config: RateLimitConfig,
}

impl RateLimiter {
    /// Create a new rate limiter
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            buckets: Arc::new(RwLock::new(HashMap::new())),
            default_config: config,
        }
    }

    /// Try to acquire a token for the given key
    #[must_use]
    pub fn try_acquire(&self, key: &str) -> bool {
        self.try_acquire_n(key, 1)
    }

    /// Try to acquire multiple tokens
    #[must_use]
    pub fn try_acquire_n(&self, key: &str, tokens: u32) -> bool {
        // Recover data from a poisoned lock; bucket state stays valid after a panic
        let mut buckets = self.buckets.write().unwrap_or_else(|e| e.into_inner());
        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::new(self.default_config.clone()));
        bucket.try_acquire(tokens)
    }

    /// Get available tokens for a key
    #[must_use]
    pub fn available(&self, key: &str) -> u32 {
        let mut buckets = self.buckets.write().unwrap_or_else(|e| e.into_inner());
        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::new(self.default_config.clone()));
        bucket.available()
    }

    /// Get time until tokens are available
    #[must_use]
    pub fn time_until_available(&self, key: &str, tokens: u32) -> Duration {
        let mut buckets = self.buckets.write().unwrap_or_else(|e| e.into_inner());
        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::new(self.default_config.clone()));
        bucket.time_until_available(tokens)
    }

    /// Reset rate limit for a key
    pub fn reset(&self, key: &str) {
        let mut buckets = self.buckets.write().unwrap_or_else(|e| e.into_inner());
        buckets.remove(key);
    }

    /// Reset all rate limits
    pub fn reset_all(&self) {
        let mut buckets = self.buckets.write().unwrap_or_else(|e| e.into_inner());
        buckets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_basic() {
        let config = RateLimitConfig {
            max_requests: 3,
            window: Duration::from_secs(1),
            burst: 0,
        };
        let limiter = RateLimiter::new(config);

        assert!(limiter.try_acquire("search"));
        assert!(limiter.try_acquire("search"));
        assert!(limiter.try_acquire("search"));
        assert!(!limiter.try_acquire("search"));
    }

    #[test]
    fn test_rate_limiter_with_burst() {
        let config = RateLimitConfig {
            max_requests: 2,
            window: Duration::from_secs(1),
            burst: 2,
        };
        let limiter = RateLimiter::new(config);

        // max + burst = 4 requests allowed up front
        assert!(limiter.try_acquire("search"));
        assert!(limiter.try_acquire("search"));
        assert!(limiter.try_acquire("search"));
        assert!(limiter.try_acquire("search"));
        assert!(!limiter.try_acquire("search"));
    }

    #[test]
    fn test_rate_limiter_different_keys() {
        let config = RateLimitConfig {
            max_requests: 1,
            window: Duration::from_secs(1),
            burst: 0,
        };
        let limiter = RateLimiter::new(config);

        assert!(limiter.try_acquire("search"));
        assert!(!limiter.try_acquire("search"));
        assert!(limiter.try_acquire("detail"));
    }

    #[test]
    fn test_rate_limiter_reset() {
        let config = RateLimitConfig {
            max_requests: 1,
            window: Duration::from_secs(1),
            burst: 0,
        };
        let limiter = RateLimiter::new(config);

        assert!(limiter.try_acquire("search"));
        assert!(!limiter.try_acquire("search"));

        limiter.reset("search");
        assert!(limiter.try_acquire("search"));
    }

    #[test]
    fn test_suggested_concurrency() {
        // 300 requests/minute supports 5 concurrent workers
        assert_eq!(RateLimitConfig::per_minute(300).suggested_concurrency(), 5);
        // Tiny quotas still allow one worker
        assert_eq!(RateLimitConfig::per_minute(10).suggested_concurrency(), 1);
    }
}
