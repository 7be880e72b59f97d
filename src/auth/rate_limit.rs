//! Per-identifier rate limiting for login attempts.
//!
//! Identifiers are opaque strings, in practice the client IP taken from
//! `X-Forwarded-For`. State lives in a process-wide map owned by the server
//! state; nothing is persisted across restarts.

use std::collections::HashMap;
use tokio::sync::Mutex;

use super::now_unix_ms;

/// Attempts allowed per identifier within one window.
pub const MAX_ATTEMPTS: u32 = 5;

/// Window length in milliseconds (15 minutes).
pub const WINDOW_MS: u64 = 15 * 60 * 1000;

#[derive(Debug, Clone, Copy)]
struct AttemptRecord {
    count: u32,
    /// End of the current window, epoch milliseconds.
    reset_at: u64,
}

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub allowed: bool,
    pub remaining_attempts: u32,
    /// Present only when denied, so callers can compute a retry-after.
    pub reset_at: Option<u64>,
}

/// Sliding-window login limiter.
///
/// `register_attempt` consumes one attempt and must be called exactly once
/// per login attempt; `peek` reports the current status without consuming,
/// so status displays never burn quota.
#[derive(Debug, Default)]
pub struct LoginRateLimiter {
    attempts: Mutex<HashMap<String, AttemptRecord>>,
}

impl LoginRateLimiter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one attempt for `identifier`.
    pub async fn register_attempt(&self, identifier: &str) -> RateLimitStatus {
        self.register_attempt_at(identifier, now_unix_ms()).await
    }

    pub(crate) async fn register_attempt_at(
        &self,
        identifier: &str,
        now_ms: u64,
    ) -> RateLimitStatus {
        let mut attempts = self.attempts.lock().await;
        if let Some(record) = attempts.get_mut(identifier) {
            if now_ms <= record.reset_at {
                if record.count >= MAX_ATTEMPTS {
                    return RateLimitStatus {
                        allowed: false,
                        remaining_attempts: 0,
                        reset_at: Some(record.reset_at),
                    };
                }
                record.count += 1;
                return RateLimitStatus {
                    allowed: true,
                    remaining_attempts: MAX_ATTEMPTS - record.count,
                    reset_at: None,
                };
            }
        }

        // First attempt, or the previous window has expired.
        attempts.insert(
            identifier.to_string(),
            AttemptRecord {
                count: 1,
                reset_at: now_ms + WINDOW_MS,
            },
        );
        RateLimitStatus {
            allowed: true,
            remaining_attempts: MAX_ATTEMPTS - 1,
            reset_at: None,
        }
    }

    /// Report the current status without consuming an attempt.
    pub async fn peek(&self, identifier: &str) -> RateLimitStatus {
        self.peek_at(identifier, now_unix_ms()).await
    }

    pub(crate) async fn peek_at(&self, identifier: &str, now_ms: u64) -> RateLimitStatus {
        let attempts = self.attempts.lock().await;
        match attempts.get(identifier) {
            Some(record) if now_ms <= record.reset_at => {
                if record.count >= MAX_ATTEMPTS {
                    RateLimitStatus {
                        allowed: false,
                        remaining_attempts: 0,
                        reset_at: Some(record.reset_at),
                    }
                } else {
                    RateLimitStatus {
                        allowed: true,
                        remaining_attempts: MAX_ATTEMPTS - record.count,
                        reset_at: None,
                    }
                }
            }
            _ => RateLimitStatus {
                allowed: true,
                remaining_attempts: MAX_ATTEMPTS,
                reset_at: None,
            },
        }
    }

    /// Fully restore the identifier's quota. Called after successful login.
    pub async fn reset(&self, identifier: &str) {
        self.attempts.lock().await.remove(identifier);
    }
}
