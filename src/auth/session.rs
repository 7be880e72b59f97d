//! Stateless session records.
//!
//! A session is valid iff it is marked authenticated and has not expired;
//! expiry is checked lazily on every read, never by a background sweep.
//! Renewal produces a new value; sessions are never mutated in place.

use serde::{Deserialize, Serialize};

use super::now_unix_ms;

/// Session lifetime in milliseconds (24 hours). Fixed policy.
pub const SESSION_DURATION_MS: u64 = 24 * 60 * 60 * 1000;

/// A granted authorization, carried entirely inside a client-held cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub is_authenticated: bool,
    pub is_admin: bool,
    /// Expiry as epoch milliseconds.
    pub expires_at: u64,
}

#[must_use]
pub fn create_session(is_admin: bool) -> Session {
    create_session_at(is_admin, now_unix_ms())
}

pub(crate) fn create_session_at(is_admin: bool, now_ms: u64) -> Session {
    Session {
        is_authenticated: true,
        is_admin,
        expires_at: now_ms + SESSION_DURATION_MS,
    }
}

#[must_use]
pub fn is_valid_session(session: Option<&Session>) -> bool {
    is_valid_session_at(session, now_unix_ms())
}

pub(crate) fn is_valid_session_at(session: Option<&Session>, now_ms: u64) -> bool {
    match session {
        Some(session) => session.is_authenticated && now_ms < session.expires_at,
        None => false,
    }
}

/// An admin session is a valid session with the admin flag set.
#[must_use]
pub fn is_admin_session(session: Option<&Session>) -> bool {
    is_admin_session_at(session, now_unix_ms())
}

pub(crate) fn is_admin_session_at(session: Option<&Session>, now_ms: u64) -> bool {
    is_valid_session_at(session, now_ms) && session.is_some_and(|session| session.is_admin)
}

/// Return a renewed session with a refreshed expiry, other fields unchanged.
#[must_use]
pub fn extend_session(session: &Session) -> Session {
    Session {
        expires_at: now_unix_ms() + SESSION_DURATION_MS,
        ..*session
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_700_000_000_000;

    #[test]
    fn created_session_expires_after_duration() {
        let session = create_session_at(false, NOW);
        assert!(session.is_authenticated);
        assert!(!session.is_admin);
        assert_eq!(session.expires_at, NOW + SESSION_DURATION_MS);
    }

    #[test]
    fn validity_boundary_is_exclusive_at_expiry() {
        let session = create_session_at(false, NOW);
        let expires_at = session.expires_at;

        assert!(is_valid_session_at(Some(&session), expires_at - 1));
        assert!(!is_valid_session_at(Some(&session), expires_at));
        assert!(!is_valid_session_at(Some(&session), expires_at + 1));
    }

    #[test]
    fn missing_or_unauthenticated_sessions_are_invalid() {
        assert!(!is_valid_session_at(None, NOW));

        let session = Session {
            is_authenticated: false,
            is_admin: true,
            expires_at: NOW + SESSION_DURATION_MS,
        };
        assert!(!is_valid_session_at(Some(&session), NOW));
    }

    #[test]
    fn non_admin_session_never_satisfies_admin_check() {
        let session = create_session_at(false, NOW);
        assert!(is_valid_session_at(Some(&session), NOW));
        assert!(!is_admin_session_at(Some(&session), NOW));
    }

    #[test]
    fn admin_session_requires_validity_too() {
        let session = create_session_at(true, NOW);
        assert!(is_admin_session_at(Some(&session), NOW));
        assert!(!is_admin_session_at(Some(&session), session.expires_at));
    }

    #[test]
    fn extend_session_keeps_flags() {
        let session = create_session_at(true, NOW);
        let extended = extend_session(&session);
        assert!(extended.is_authenticated);
        assert!(extended.is_admin);
        assert!(extended.expires_at >= session.expires_at);
    }

    #[test]
    fn session_serializes_with_camel_case_fields() {
        let session = create_session_at(true, NOW);
        let json = serde_json::to_value(session).expect("session serializes");
        assert_eq!(json["isAuthenticated"], true);
        assert_eq!(json["isAdmin"], true);
        assert_eq!(json["expiresAt"], NOW + SESSION_DURATION_MS);
    }
}
