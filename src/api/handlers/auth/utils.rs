//! Header helpers shared by the auth, config, and content handlers.

use axum::http::HeaderMap;

use crate::auth::cookie::decode_session;
use crate::auth::session::Session;

/// Extract a client IP for rate limiting from common proxy headers.
///
/// Prefers the first `X-Forwarded-For` entry, falling back to `X-Real-IP`.
/// The result is treated as an opaque identifier.
pub(crate) fn extract_client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if forwarded.is_some() {
        return forwarded.map(str::to_string);
    }
    headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Pull a named cookie out of the `Cookie` request header.
pub(crate) fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(axum::http::header::COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        let (Some(key), Some(val)) = (parts.next(), parts.next()) else {
            continue;
        };
        if key.trim() == name {
            return Some(val.trim().to_string());
        }
    }
    None
}

/// Decode the named session cookie, if present. Expiry is NOT checked here.
pub(crate) fn session_from_cookie(headers: &HeaderMap, name: &str) -> Option<Session> {
    decode_session(&extract_cookie(headers, name)?)
}

/// Whole seconds until the rate-limit window resets, rounded up.
pub(crate) fn retry_after_seconds(reset_at_ms: u64, now_ms: u64) -> u64 {
    reset_at_ms.saturating_sub(now_ms).div_ceil(1000)
}
