//! Session cookie codec and attribute policy.
//!
//! The cookie value is the base64-encoded JSON serialization of the session
//! record, so it round-trips exactly. Decoding never validates expiry;
//! callers must check the session separately with `is_valid_session`.
//!
//! The admin cookie is path-restricted to the admin route subtree. That path
//! scoping is the trust-domain boundary: nothing else distinguishes the two
//! cookies structurally.

use axum::http::{HeaderValue, header::InvalidHeaderValue};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::session::Session;

pub const SITE_COOKIE: &str = "site_session";
pub const ADMIN_COOKIE: &str = "admin_session";

pub const SITE_COOKIE_PATH: &str = "/";
pub const ADMIN_COOKIE_PATH: &str = "/v1/admin";

/// Cookie lifetime in seconds (24 hours), matching the session duration.
pub const COOKIE_MAX_AGE_SECONDS: i64 = 24 * 60 * 60;

/// Attributes attached to a session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieOptions {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: &'static str,
    pub max_age_seconds: i64,
    pub path: &'static str,
}

impl CookieOptions {
    fn session(secure: bool, path: &'static str) -> Self {
        Self {
            http_only: true,
            secure,
            same_site: "Strict",
            max_age_seconds: COOKIE_MAX_AGE_SECONDS,
            path,
        }
    }
}

/// A `{name, value, options}` triple handed to the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: &'static str,
    pub value: String,
    pub options: CookieOptions,
}

impl SessionCookie {
    /// Render the cookie as a `Set-Cookie` header value.
    ///
    /// # Errors
    /// Returns an error if the rendered cookie is not a valid header value.
    pub fn to_set_cookie(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut cookie = format!(
            "{}={}; Path={}; SameSite={}; Max-Age={}",
            self.name, self.value, self.options.path, self.options.same_site,
            self.options.max_age_seconds
        );
        if self.options.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.options.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
    }
}

/// Serialize a session into an opaque cookie value.
#[must_use]
pub fn encode_session(session: &Session) -> String {
    match serde_json::to_vec(session) {
        Ok(bytes) => STANDARD.encode(bytes),
        Err(_) => String::new(),
    }
}

/// Reverse [`encode_session`]. Any parse failure yields `None`, never an
/// error; expiry is deliberately not checked here.
#[must_use]
pub fn decode_session(value: &str) -> Option<Session> {
    let bytes = STANDARD.decode(value.trim()).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[must_use]
pub fn site_session_cookie(session: &Session, secure: bool) -> SessionCookie {
    SessionCookie {
        name: SITE_COOKIE,
        value: encode_session(session),
        options: CookieOptions::session(secure, SITE_COOKIE_PATH),
    }
}

#[must_use]
pub fn admin_session_cookie(session: &Session, secure: bool) -> SessionCookie {
    SessionCookie {
        name: ADMIN_COOKIE,
        value: encode_session(session),
        options: CookieOptions::session(secure, ADMIN_COOKIE_PATH),
    }
}

/// An immediately-expiring cookie that clears the browser-held value.
#[must_use]
pub fn logout_cookie(name: &'static str, secure: bool) -> SessionCookie {
    let path = if name == ADMIN_COOKIE {
        ADMIN_COOKIE_PATH
    } else {
        SITE_COOKIE_PATH
    };
    SessionCookie {
        name,
        value: String::new(),
        options: CookieOptions {
            http_only: true,
            secure,
            same_site: "Strict",
            max_age_seconds: 0,
            path,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::{SESSION_DURATION_MS, Session};

    fn sample_session(is_admin: bool) -> Session {
        Session {
            is_authenticated: true,
            is_admin,
            expires_at: 1_700_000_000_000 + SESSION_DURATION_MS,
        }
    }

    #[test]
    fn encode_decode_round_trips_exactly() {
        for is_admin in [false, true] {
            let session = sample_session(is_admin);
            let decoded = decode_session(&encode_session(&session));
            assert_eq!(decoded, Some(session));
        }
    }

    #[test]
    fn garbage_decodes_to_none_without_panicking() {
        assert_eq!(decode_session(""), None);
        assert_eq!(decode_session("not base64 at all!!!"), None);
        // Valid base64, not JSON.
        assert_eq!(decode_session(&STANDARD.encode(b"hello world")), None);
        // Valid JSON, wrong shape.
        assert_eq!(decode_session(&STANDARD.encode(b"{\"foo\": 1}")), None);
    }

    #[test]
    fn decode_does_not_check_expiry() {
        let expired = Session {
            is_authenticated: true,
            is_admin: false,
            expires_at: 1,
        };
        assert_eq!(decode_session(&encode_session(&expired)), Some(expired));
    }

    #[test]
    fn scopes_differ_only_in_name_and_path() {
        let session = sample_session(false);
        let site = site_session_cookie(&session, true);
        let admin = admin_session_cookie(&session, true);

        assert_eq!(site.name, "site_session");
        assert_eq!(site.options.path, "/");
        assert_eq!(admin.name, "admin_session");
        assert_eq!(admin.options.path, "/v1/admin");
        assert_eq!(site.value, admin.value);
        assert_eq!(site.options.max_age_seconds, COOKIE_MAX_AGE_SECONDS);
        assert_eq!(admin.options.max_age_seconds, COOKIE_MAX_AGE_SECONDS);
    }

    #[test]
    fn set_cookie_header_carries_all_attributes() {
        let session = sample_session(false);
        let cookie = site_session_cookie(&session, true);
        let header = cookie.to_set_cookie().expect("valid header");
        let rendered = header.to_str().expect("ascii header");

        assert!(rendered.starts_with("site_session="));
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("SameSite=Strict"));
        assert!(rendered.contains("Max-Age=86400"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("Secure"));
    }

    #[test]
    fn insecure_mode_omits_the_secure_flag() {
        let session = sample_session(false);
        let cookie = site_session_cookie(&session, false);
        let header = cookie.to_set_cookie().expect("valid header");
        assert!(!header.to_str().expect("ascii header").contains("Secure"));
    }

    #[test]
    fn logout_cookie_clears_value_and_expires_now() {
        let cookie = logout_cookie(ADMIN_COOKIE, true);
        assert_eq!(cookie.value, "");
        assert_eq!(cookie.options.max_age_seconds, 0);
        assert_eq!(cookie.options.path, ADMIN_COOKIE_PATH);

        let header = cookie.to_set_cookie().expect("valid header");
        assert!(
            header
                .to_str()
                .expect("ascii header")
                .contains("Max-Age=0")
        );

        let site = logout_cookie(SITE_COOKIE, false);
        assert_eq!(site.options.path, SITE_COOKIE_PATH);
    }
}
