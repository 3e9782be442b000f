//! Retry and pacing policy for fetch operations
//!
//! [`RequestPolicy`] is the rate/retry wrapper every fetch client is composed
//! with. Each attempt first passes the source's [`RateLimiter`], then runs
//! under the configured timeout. Failed attempts are retried with a fixed or
//! exponential delay until the retry budget is spent, at which point the last
//! error is returned tagged with the query that was in flight.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::SourceQuery;
use crate::utils::error::{CrawlerError, FetchError};
use crate::utils::rate_limit::{RateLimitConfig, RateLimiter};

/// Delay growth between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    /// Same delay before every retry
    Fixed,
    /// Delay doubles with each retry, capped by `max_delay_ms`
    #[default]
    Exponential,
}

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first call
    pub max_retries: u32,

    /// Base delay in milliseconds
    pub base_delay_ms: u64,

    /// Maximum delay in milliseconds (caps exponential growth)
    pub max_delay_ms: u64,

    pub backoff: Backoff,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30_000,
            backoff: Backoff::Exponential,
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration with custom max retries
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Create a retry configuration with custom delays
    pub fn with_delays(max_retries: u32, base_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            max_delay_ms,
            backoff: Backoff::Exponential,
        }
    }

    /// Fixed delay between every attempt
    pub fn fixed(max_retries: u32, delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms: delay_ms,
            max_delay_ms: delay_ms,
            backoff: Backoff::Fixed,
        }
    }

    /// Total calls allowed, the first one included
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Calculate delay before a given attempt (attempt 0 is the first call)
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let delay_ms = match (attempt, self.backoff) {
            (0, _) => 0,
            (_, Backoff::Fixed) => self.base_delay_ms,
            (_, Backoff::Exponential) => {
                let exponential = self.base_delay_ms as f64 * 2f64.powi((attempt - 1) as i32);
                (exponential as u64).min(self.max_delay_ms)
            }
        };

        Duration::from_millis(delay_ms)
    }
}

/// Rate limiting, timeout and retry for one source
///
/// The policy owns its limiter, so it is constructed once per source and
/// mutated through `&mut self`; sources never share counters.
#[derive(Debug)]
pub struct RequestPolicy {
    retry: RetryConfig,
    limiter: RateLimiter,
    timeout: Duration,
    last_attempts: u32,
    total_attempts: u64,
}

impl RequestPolicy {
    pub fn new(retry: RetryConfig, rate_limit: RateLimitConfig, timeout: Duration) -> Self {
        Self::with_limiter(retry, RateLimiter::new(rate_limit), timeout)
    }

    pub fn with_limiter(retry: RetryConfig, limiter: RateLimiter, timeout: Duration) -> Self {
        Self {
            retry,
            limiter,
            timeout,
            last_attempts: 0,
            total_attempts: 0,
        }
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Attempts made by the most recent [`execute`](Self::execute) call
    pub fn last_attempts(&self) -> u32 {
        self.last_attempts
    }

    /// Attempts made over the policy's lifetime
    pub fn total_attempts(&self) -> u64 {
        self.total_attempts
    }

    /// Run `operation` under the rate limit, timeout and retry budget
    ///
    /// # Errors
    ///
    /// Returns [`CrawlerError::Fetch`] with the last error once
    /// `max_retries + 1` attempts have failed.
    pub async fn execute<T, F, Fut>(
        &mut self,
        query: &SourceQuery,
        mut operation: F,
    ) -> Result<T, CrawlerError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        self.last_attempts = 0;
        let mut last_error = None;

        for attempt in 0..self.retry.max_attempts() {
            if attempt > 0 {
                let delay = self.retry.calculate_delay(attempt);
                debug!(
                    attempt = attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying fetch after delay"
                );
                tokio::time::sleep(delay).await;
            }

            let waited = self.limiter.acquire().await;
            if !waited.is_zero() {
                debug!(waited_ms = waited.as_millis() as u64, "Rate limiter delayed fetch");
            }

            self.last_attempts += 1;
            self.total_attempts += 1;

            let outcome = match tokio::time::timeout(self.timeout, operation()).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout {
                    after: self.timeout,
                }),
            };

            match outcome {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(attempt = attempt, "Fetch succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) => {
                    warn!(
                        attempt = attempt + 1,
                        max_attempts = self.retry.max_attempts(),
                        query = %query.search,
                        error = %e,
                        "Fetch attempt failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        let source = last_error
            .unwrap_or_else(|| FetchError::Transport("no attempt was made".to_string()));
        Err(CrawlerError::Fetch {
            query: query.to_string(),
            attempts: self.last_attempts,
            source,
        })
    }
}
