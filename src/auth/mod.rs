//! Authentication primitives shared by the site and admin trust domains.
//!
//! ## Login Rate Limiting
//!
//! Login attempts are limited to 5 per client identifier within a 15-minute
//! window. The limiter is an injectable component owned by the server state
//! (never a module-level singleton) and is mutex-guarded so two concurrent
//! requests from the same identifier cannot both slip under the limit.
//!
//! ## Error Codes
//!
//! Endpoints answer authentication failures with a fixed code and message.
//! A wrong password and a missing site configuration produce the same
//! `INVALID_CREDENTIALS` response so the failure mode is not leaked.

pub mod cookie;
pub mod password;
pub mod rate_limit;
pub mod session;
pub mod validate;

/// A fixed error code/message pair surfaced to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode {
    pub code: &'static str,
    pub message: &'static str,
}

pub const INVALID_CREDENTIALS: ErrorCode = ErrorCode {
    code: "INVALID_CREDENTIALS",
    message: "Invalid password",
};

pub const RATE_LIMITED: ErrorCode = ErrorCode {
    code: "RATE_LIMITED",
    message: "Too many attempts. Please try again later.",
};

pub const SESSION_EXPIRED: ErrorCode = ErrorCode {
    code: "SESSION_EXPIRED",
    message: "Session expired. Please log in again.",
};

pub const UNAUTHORIZED: ErrorCode = ErrorCode {
    code: "UNAUTHORIZED",
    message: "Unauthorized access",
};

pub const VALIDATION_ERROR: ErrorCode = ErrorCode {
    code: "VALIDATION_ERROR",
    message: "Invalid input data",
};

/// Milliseconds since the Unix epoch, clamped to zero on clock skew.
#[must_use]
pub fn now_unix_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(INVALID_CREDENTIALS.code, "INVALID_CREDENTIALS");
        assert_eq!(RATE_LIMITED.code, "RATE_LIMITED");
        assert_eq!(SESSION_EXPIRED.code, "SESSION_EXPIRED");
        assert_eq!(UNAUTHORIZED.code, "UNAUTHORIZED");
        assert_eq!(VALIDATION_ERROR.code, "VALIDATION_ERROR");
    }

    #[test]
    fn now_unix_ms_is_monotonic_enough() {
        let first = now_unix_ms();
        let second = now_unix_ms();
        assert!(second >= first);
        // Sanity: later than 2024-01-01.
        assert!(first > 1_704_067_200_000);
    }
}
