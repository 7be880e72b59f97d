//! Session check and logout endpoints for both trust domains.
//!
//! Session checks always answer 200: an absent or invalid cookie is
//! `isAuthenticated: false`, never an error status. Logout only clears the
//! browser-held cookie; stateless tokens cannot be revoked server-side.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::error;

use crate::auth::cookie::{ADMIN_COOKIE, SITE_COOKIE, logout_cookie};
use crate::auth::session::{is_admin_session, is_valid_session};

use super::state::AuthState;
use super::types::{AdminSessionStatusResponse, LogoutResponse, SessionStatusResponse};
use super::utils::session_from_cookie;

#[utoipa::path(
    get,
    path = "/v1/auth/session",
    responses(
        (status = 200, description = "Whether a valid site session is present", body = SessionStatusResponse)
    ),
    tag = "auth"
)]
pub async fn site_session(headers: HeaderMap) -> impl IntoResponse {
    let session = session_from_cookie(&headers, SITE_COOKIE);
    let is_authenticated = is_valid_session(session.as_ref());
    Json(SessionStatusResponse {
        is_authenticated,
        expires_at: session.filter(|_| is_authenticated).map(|s| s.expires_at),
    })
}

#[utoipa::path(
    get,
    path = "/v1/admin/session",
    responses(
        (status = 200, description = "Whether a valid admin session is present", body = AdminSessionStatusResponse)
    ),
    tag = "admin"
)]
pub async fn admin_session(headers: HeaderMap) -> impl IntoResponse {
    let session = session_from_cookie(&headers, ADMIN_COOKIE);
    let is_authenticated = is_valid_session(session.as_ref());
    let is_admin = is_admin_session(session.as_ref());
    Json(AdminSessionStatusResponse {
        is_authenticated,
        is_admin,
        expires_at: session.filter(|_| is_authenticated).map(|s| s.expires_at),
    })
}

#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    responses(
        (status = 200, description = "Site and admin cookies cleared", body = LogoutResponse)
    ),
    tag = "auth"
)]
pub async fn site_logout(auth_state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    // Clearing both scopes lets one logout button end everything the browser
    // holds; the admin cookie is only sent on the admin path anyway.
    clear_cookies(&auth_state, &[SITE_COOKIE, ADMIN_COOKIE])
}

#[utoipa::path(
    post,
    path = "/v1/admin/logout",
    responses(
        (status = 200, description = "Admin cookie cleared", body = LogoutResponse)
    ),
    tag = "admin"
)]
pub async fn admin_logout(auth_state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    clear_cookies(&auth_state, &[ADMIN_COOKIE])
}

fn clear_cookies(auth_state: &AuthState, names: &[&'static str]) -> Response {
    let secure = auth_state.config().session_cookie_secure();
    let mut headers = HeaderMap::new();
    for name in names {
        match logout_cookie(name, secure).to_set_cookie() {
            // append: multiple Set-Cookie headers are distinct, never merged.
            Ok(value) => {
                headers.append(SET_COOKIE, value);
            }
            Err(err) => error!("Failed to build logout cookie for {name}: {err}"),
        }
    }

    let body = LogoutResponse {
        success: true,
        message: "Logged out successfully".to_string(),
    };
    (StatusCode::OK, headers, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::state::AuthConfig;
    use crate::auth::rate_limit::LoginRateLimiter;

    #[test]
    fn clear_cookies_sets_one_header_per_scope() {
        let auth_state = AuthState::new(AuthConfig::default(), LoginRateLimiter::new());
        let response = clear_cookies(&auth_state, &[SITE_COOKIE, ADMIN_COOKIE]);

        assert_eq!(response.status(), StatusCode::OK);
        let cookies: Vec<_> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect();
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].starts_with("site_session=;"));
        assert!(cookies[1].starts_with("admin_session=;"));
        assert!(cookies.iter().all(|cookie| cookie.contains("Max-Age=0")));
        assert!(cookies[1].contains("Path=/v1/admin"));
    }
}
