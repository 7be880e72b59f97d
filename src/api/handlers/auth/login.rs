//! Login endpoints for the site and admin trust domains.
//!
//! Both flows are the same pipeline — rate-limit gate, input validation,
//! bcrypt verification against the stored hash, session mint — and differ
//! only in which hash is checked and which cookie scope is set.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, HeaderValue, StatusCode, header::{RETRY_AFTER, SET_COOKIE}},
    response::{IntoResponse, Response},
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::auth::{
    INVALID_CREDENTIALS, RATE_LIMITED, VALIDATION_ERROR,
    cookie::{SessionCookie, admin_session_cookie, site_session_cookie},
    now_unix_ms, password,
    session::{Session, create_session},
    validate::validate_password,
};
use crate::store::{self, SiteCredentials};

use super::state::AuthState;
use super::types::{ErrorResponse, LoginRequest, LoginResponse};
use super::utils::{extract_client_ip, retry_after_seconds};

/// Well-formed bcrypt hash that matches nothing. Verified against when no
/// configuration exists, so a missing config and a wrong password take the
/// same time and produce the same response.
const DUMMY_HASH: &str = "$2b$12$abcdefghijklmnopqrstuvabcdefghijklmnopqrstuvwxyz01234";

#[derive(Clone, Copy, Debug)]
enum LoginScope {
    Site,
    Admin,
}

impl LoginScope {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::Admin => "admin",
        }
    }

    const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    fn stored_hash(self, credentials: &SiteCredentials) -> &str {
        match self {
            Self::Site => &credentials.site_password_hash,
            Self::Admin => &credentials.admin_password_hash,
        }
    }

    fn session_cookie(self, session: &Session, secure: bool) -> SessionCookie {
        match self {
            Self::Site => site_session_cookie(session, secure),
            Self::Admin => admin_session_cookie(session, secure),
        }
    }

    const fn success_message(self) -> &'static str {
        match self {
            Self::Site => "Login successful",
            Self::Admin => "Admin login successful",
        }
    }
}

#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session granted", body = LoginResponse),
        (status = 400, description = "Password failed validation", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 429, description = "Too many attempts", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn site_login(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    handle_login(LoginScope::Site, &headers, &pool, &auth_state, payload).await
}

#[utoipa::path(
    post,
    path = "/v1/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Admin session granted", body = LoginResponse),
        (status = 400, description = "Password failed validation", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 429, description = "Too many attempts", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn admin_login(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    handle_login(LoginScope::Admin, &headers, &pool, &auth_state, payload).await
}

async fn handle_login(
    scope: LoginScope,
    headers: &HeaderMap,
    pool: &PgPool,
    auth_state: &AuthState,
    payload: Option<Json<LoginRequest>>,
) -> Response {
    let client_ip = extract_client_ip(headers).unwrap_or_else(|| "unknown".to_string());

    // One consumed attempt per login request, successful or not.
    let status = auth_state.rate_limiter().register_attempt(&client_ip).await;
    if !status.allowed {
        let reset_at = status.reset_at.unwrap_or_else(now_unix_ms);
        warn!(client_ip = %client_ip, scope = scope.as_str(), "login rate limited");

        let mut response_headers = HeaderMap::new();
        let retry_after = retry_after_seconds(reset_at, now_unix_ms());
        if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
            response_headers.insert(RETRY_AFTER, value);
        }

        let body = ErrorResponse {
            reset_time: Some(reset_at),
            ..ErrorResponse::from_code(RATE_LIMITED)
        };
        return (StatusCode::TOO_MANY_REQUESTS, response_headers, Json(body)).into_response();
    }

    let password = match payload {
        Some(Json(request)) if !request.password.is_empty() => request.password,
        _ => return validation_error("Password is required"),
    };

    let validation = validate_password(&password);
    if !validation.is_valid {
        let message = validation
            .errors
            .first()
            .cloned()
            .unwrap_or_else(|| VALIDATION_ERROR.message.to_string());
        return validation_error(&message);
    }

    let credentials = match store::get_credentials(pool).await {
        Ok(credentials) => credentials,
        Err(err) => {
            error!("Failed to load site credentials: {err}");
            return internal_error();
        }
    };

    // Missing configuration answers exactly like a wrong password; the dummy
    // verify keeps the timing of the two cases indistinguishable.
    let stored_hash = credentials
        .as_ref()
        .map_or(DUMMY_HASH.to_string(), |creds| {
            scope.stored_hash(creds).to_string()
        });
    let config_present = credentials.is_some();
    let verified = verify_blocking(password, stored_hash).await && config_present;

    if !verified {
        warn!(client_ip = %client_ip, scope = scope.as_str(), "invalid login attempt");
        let body = ErrorResponse {
            remaining_attempts: Some(status.remaining_attempts),
            ..ErrorResponse::from_code(INVALID_CREDENTIALS)
        };
        return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    }

    auth_state.rate_limiter().reset(&client_ip).await;

    let session = create_session(scope.is_admin());
    let cookie = scope.session_cookie(&session, auth_state.config().session_cookie_secure());

    let mut response_headers = HeaderMap::new();
    match cookie.to_set_cookie() {
        Ok(value) => {
            response_headers.insert(SET_COOKIE, value);
        }
        Err(err) => {
            error!("Failed to build session cookie: {err}");
            return internal_error();
        }
    }

    info!(scope = scope.as_str(), "login successful");
    let body = LoginResponse {
        success: true,
        message: scope.success_message().to_string(),
        expires_at: session.expires_at,
    };
    (StatusCode::OK, response_headers, Json(body)).into_response()
}

/// bcrypt at cost 12 takes hundreds of milliseconds; keep it off the
/// async executor threads.
async fn verify_blocking(password: String, hash: String) -> bool {
    tokio::task::spawn_blocking(move || password::verify_password(&password, &hash))
        .await
        .unwrap_or(false)
}

fn validation_error(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::with_message(VALIDATION_ERROR, message)),
    )
        .into_response()
}

fn internal_error() -> Response {
    let body = ErrorResponse {
        error: "INTERNAL_ERROR".to_string(),
        message: "Login failed due to server error".to_string(),
        remaining_attempts: None,
        reset_time: None,
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
