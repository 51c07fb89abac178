//! Bounded retry policy with fixed or exponential backoff.
//!
//! The verifier owns its retries; the registry adapter never retries. A
//! server-directed delay (for example Gemini's `RetryInfo.retryDelay` or an
//! HTTP `Retry-After` header) always wins over the configured backoff.

use std::time::Duration;

/// Default wait between verifier attempts when the server gives no hint.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Upper bound on any server-directed delay.
pub const MAX_SERVER_DELAY: Duration = Duration::from_secs(600);

/// Default total number of verifier attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;

/// Backoff strategy between failed attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Uses a fixed delay between attempts.
    Fixed {
        delay: Duration,
    },
    /// Uses `base * factor ^ attempt`, capped at `max`.
    Exponential {
        base: Duration,
        factor: f64,
        max: Duration,
        /// Applies random jitter (+/- 50%) to the delay.
        jitter: bool,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Fixed {
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl Backoff {
    /// Delay before the attempt following `attempt` (0-based).
    pub fn delay(self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { delay } => delay,
            Self::Exponential {
                base,
                factor,
                max,
                jitter,
            } => {
                let scale = factor.powi(attempt as i32);
                let seconds = base.as_secs_f64() * scale;
                let capped_seconds = seconds.min(max.as_secs_f64());

                let mut delay = Duration::from_secs_f64(capped_seconds);

                if jitter {
                    let jitter_ms = (delay.as_millis() as f64 * 0.5) as u64;
                    let random_offset = fastrand::u64(0..=(jitter_ms * 2));
                    let total_ms =
                        delay.as_millis() as i64 + (random_offset as i64 - jitter_ms as i64);
                    delay = Duration::from_millis(total_ms.max(0) as u64);
                }

                delay
            }
        }
    }
}

/// Retry policy injected into adapters that retry transient failures.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Zero is treated as one.
    pub max_attempts: u32,
    pub backoff: Backoff,
    /// HTTP status codes that count as transient.
    pub retry_on_status: Vec<u16>,
    /// Honor a server-directed delay when one is attached to the error.
    pub honor_server_delay: bool,
    /// Server-directed delays longer than this are cut down to it.
    pub max_server_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: Backoff::default(),
            retry_on_status: vec![408, 429, 500, 502, 503, 504],
            honor_server_delay: true,
            max_server_delay: MAX_SERVER_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn fixed(delay: Duration, max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Fixed { delay },
            ..Self::default()
        }
    }

    pub fn exponential(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Exponential {
                base: Duration::from_secs(2),
                factor: 2.0,
                max: DEFAULT_RETRY_DELAY,
                jitter: true,
            },
            ..Self::default()
        }
    }

    /// Single attempt, no waiting.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_on_status.contains(&status)
    }

    /// Delay after the failed `attempt` (0-based), preferring the server hint.
    pub fn delay_for_attempt(&self, attempt: u32, server_hint: Option<Duration>) -> Duration {
        match server_hint {
            Some(hint) if self.honor_server_delay => hint.min(self.max_server_delay),
            _ => self.backoff.delay(attempt),
        }
    }
}
