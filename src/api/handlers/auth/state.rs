//! Auth endpoint state and configuration.

use crate::auth::rate_limit::LoginRateLimiter;

const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";

#[derive(Clone, Debug)]
pub struct AuthConfig {
    public_base_url: String,
}

impl AuthConfig {
    #[must_use]
    pub fn new(public_base_url: String) -> Self {
        Self { public_base_url }
    }

    #[must_use]
    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }

    /// Cookies are only marked `Secure` when the site is served over HTTPS.
    #[must_use]
    pub fn session_cookie_secure(&self) -> bool {
        self.public_base_url.starts_with("https://")
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PUBLIC_BASE_URL.to_string())
    }
}

/// Server-owned auth state: configuration plus the login rate limiter.
///
/// The limiter lives here, not in a module-level global, so its lifecycle is
/// the server's lifecycle and tests can construct isolated instances.
pub struct AuthState {
    config: AuthConfig,
    rate_limiter: LoginRateLimiter,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, rate_limiter: LoginRateLimiter) -> Self {
        Self {
            config,
            rate_limiter,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub(crate) fn rate_limiter(&self) -> &LoginRateLimiter {
        &self.rate_limiter
    }
}
