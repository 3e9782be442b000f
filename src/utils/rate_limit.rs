//! Rolling-window request caps
//!
//! Each source owns one [`RateLimiter`] holding a per-minute and a per-hour
//! window. A window remembers the instants of the calls it admitted; when it
//! is full, the caller sleeps until the oldest call falls out of the window.
//!
//! Counters live in process memory only and reset on restart. Time is read
//! from `tokio::time`, so tests can drive the windows with paused time.

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::debug;

/// Request caps for one source. `None` disables a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default)]
    pub requests_per_minute: Option<u32>,

    #[serde(default)]
    pub requests_per_hour: Option<u32>,
}

impl RateLimitConfig {
    pub fn new(requests_per_minute: Option<u32>, requests_per_hour: Option<u32>) -> Self {
        Self {
            requests_per_minute,
            requests_per_hour,
        }
    }

    pub fn unlimited() -> Self {
        Self::default()
    }
}

#[derive(Debug)]
struct Window {
    limit: usize,
    period: Duration,
    admitted: VecDeque<Instant>,
}

impl Window {
    fn new(limit: u32, period: Duration) -> Self {
        Self {
            limit: limit.max(1) as usize,
            period,
            admitted: VecDeque::with_capacity(limit.max(1) as usize),
        }
    }

    fn prune(&mut self, now: Instant) {
        while let Some(&oldest) = self.admitted.front() {
            if now.duration_since(oldest) >= self.period {
                self.admitted.pop_front();
            } else {
                break;
            }
        }
    }

    /// Time until this window admits another call, or `None` if it already does
    fn wait_time(&mut self, now: Instant) -> Option<Duration> {
        self.prune(now);
        if self.admitted.len() < self.limit {
            return None;
        }
        self.admitted
            .front()
            .map(|&oldest| (oldest + self.period).saturating_duration_since(now))
    }

    fn record(&mut self, now: Instant) {
        self.admitted.push_back(now);
    }
}

/// Per-minute and per-hour request counters for a single source
#[derive(Debug)]
pub struct RateLimiter {
    windows: Vec<Window>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let windows: Vec<(u32, Duration)> = [
            config.requests_per_minute.map(|limit| (limit, Duration::from_secs(60))),
            config.requests_per_hour.map(|limit| (limit, Duration::from_secs(3600))),
        ]
        .into_iter()
        .flatten()
        .collect();
        Self::with_windows(&windows)
    }

    /// Limiter with explicit windows, e.g. `[(2, 1s)]`
    pub fn with_windows(windows: &[(u32, Duration)]) -> Self {
        Self {
            windows: windows
                .iter()
                .map(|&(limit, period)| Window::new(limit, period))
                .collect(),
        }
    }

    /// Suspend until every window admits one more call, then record it.
    ///
    /// Returns how long the caller was held back.
    pub async fn acquire(&mut self) -> Duration {
        let started = Instant::now();
        let mut held = false;
        loop {
            let now = Instant::now();
            let wait = self
                .windows
                .iter_mut()
                .filter_map(|w| w.wait_time(now))
                .max();

            match wait {
                None => {
                    for window in &mut self.windows {
                        window.record(now);
                    }
                    return if held {
                        now.duration_since(started)
                    } else {
                        Duration::ZERO
                    };
                }
                Some(wait) => {
                    debug!(wait_ms = wait.as_millis() as u64, "Rate limit window full, waiting");
                    held = true;
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }
}
