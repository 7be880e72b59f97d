//! Admin configuration endpoints.
//!
//! Reads return the stored configuration with both password hashes stripped.
//! Writes are partial patches: omitted and empty fields, password fields
//! included, leave the stored values untouched, so an update can never erase
//! credentials by accident. Plaintext passwords are validated and hashed
//! here; storage only ever sees the hash.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{
    UNAUTHORIZED, VALIDATION_ERROR,
    cookie::ADMIN_COOKIE,
    password,
    session::is_admin_session,
    validate::{sanitize_string, validate_folders, validate_github_repo, validate_password},
};
use crate::store::{self, SiteConfig, SiteConfigPatch};

use super::auth::types::ErrorResponse;
use super::auth::utils::session_from_cookie;

const DISPLAY_FIELD_MAX_CHARS: usize = 255;

/// The configuration as exposed to the admin panel: everything except the
/// password hashes.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SiteConfigView {
    pub id: Uuid,
    pub title: String,
    pub logo_url: Option<String>,
    pub slogan: Option<String>,
    pub help_text: Option<String>,
    pub github_repo: String,
    pub branch: String,
    pub folders: Vec<String>,
    pub iframe_url: Option<String>,
    pub auto_refresh_enabled: bool,
    pub refresh_interval_minutes: i32,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SiteConfig> for SiteConfigView {
    fn from(config: SiteConfig) -> Self {
        Self {
            id: config.id,
            title: config.title,
            logo_url: config.logo_url,
            slogan: config.slogan,
            help_text: config.help_text,
            github_repo: config.github_repo,
            branch: config.branch,
            folders: config.folders,
            iframe_url: config.iframe_url,
            auto_refresh_enabled: config.auto_refresh_enabled,
            refresh_interval_minutes: config.refresh_interval_minutes,
            last_sync_at: config.last_sync_at,
            created_at: config.created_at,
            updated_at: config.updated_at,
        }
    }
}

/// Incoming update. Every field is optional; plaintext passwords are hashed
/// before they reach storage.
#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct ConfigUpdateRequest {
    pub title: Option<String>,
    pub logo_url: Option<String>,
    pub slogan: Option<String>,
    pub help_text: Option<String>,
    pub github_repo: Option<String>,
    pub branch: Option<String>,
    pub folders: Option<Vec<String>>,
    pub iframe_url: Option<String>,
    pub auto_refresh_enabled: Option<bool>,
    pub refresh_interval_minutes: Option<i32>,
    pub site_password: Option<String>,
    pub admin_password: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ConfigUpdateResponse {
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/v1/admin/config",
    responses(
        (status = 200, description = "Stored configuration without secrets", body = SiteConfigView),
        (status = 401, description = "No valid admin session", body = ErrorResponse),
        (status = 404, description = "No configuration stored yet", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn get_admin_config(headers: HeaderMap, pool: Extension<PgPool>) -> impl IntoResponse {
    if let Err(response) = require_admin(&headers) {
        return response;
    }

    match store::get_config(&pool).await {
        Ok(Some(config)) => (StatusCode::OK, Json(SiteConfigView::from(config))).into_response(),
        Ok(None) => config_not_found(),
        Err(err) => {
            error!("Failed to load site config: {err}");
            internal_error()
        }
    }
}

#[utoipa::path(
    put,
    path = "/v1/admin/config",
    request_body = ConfigUpdateRequest,
    responses(
        (status = 200, description = "Configuration patched", body = ConfigUpdateResponse),
        (status = 400, description = "A supplied field failed validation", body = ErrorResponse),
        (status = 401, description = "No valid admin session", body = ErrorResponse),
        (status = 404, description = "No configuration stored yet", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn update_admin_config(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    payload: Option<Json<ConfigUpdateRequest>>,
) -> impl IntoResponse {
    if let Err(response) = require_admin(&headers) {
        return response;
    }

    let Some(Json(request)) = payload else {
        return validation_error("Missing payload");
    };

    let patch = match build_patch(request).await {
        Ok(patch) => patch,
        Err(response) => return response,
    };

    if patch.is_empty() {
        let body = ConfigUpdateResponse {
            message: "Configuration unchanged".to_string(),
        };
        return (StatusCode::OK, Json(body)).into_response();
    }

    match store::update_config(&pool, patch).await {
        Ok(true) => {
            info!("site configuration updated");
            let body = ConfigUpdateResponse {
                message: "Configuration updated successfully".to_string(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Ok(false) => config_not_found(),
        Err(err) => {
            error!("Failed to update site config: {err}");
            internal_error()
        }
    }
}

/// Admin access is decided by the path-scoped cookie alone.
fn require_admin(headers: &HeaderMap) -> Result<(), Response> {
    let session = session_from_cookie(headers, ADMIN_COOKIE);
    if is_admin_session(session.as_ref()) {
        Ok(())
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::from_code(UNAUTHORIZED)),
        )
            .into_response())
    }
}

/// Turn the request into a storage patch, validating and hashing as needed.
/// Empty strings are treated as absent.
async fn build_patch(request: ConfigUpdateRequest) -> Result<SiteConfigPatch, Response> {
    let mut patch = SiteConfigPatch {
        title: clean_display_field(request.title),
        logo_url: non_empty(request.logo_url),
        slogan: clean_display_field(request.slogan),
        help_text: clean_display_field(request.help_text),
        branch: non_empty(request.branch),
        iframe_url: non_empty(request.iframe_url),
        auto_refresh_enabled: request.auto_refresh_enabled,
        refresh_interval_minutes: request.refresh_interval_minutes,
        ..SiteConfigPatch::default()
    };

    if let Some(repo) = non_empty(request.github_repo) {
        if let Err(message) = validate_github_repo(&repo) {
            return Err(validation_error(&message));
        }
        patch.github_repo = Some(repo);
    }

    if let Some(folders) = request.folders {
        let validation = validate_folders(&folders);
        if !validation.is_valid {
            let message = validation
                .errors
                .first()
                .cloned()
                .unwrap_or_else(|| VALIDATION_ERROR.message.to_string());
            return Err(validation_error(&message));
        }
        patch.folders = Some(folders);
    }

    patch.site_password_hash = hash_new_password(request.site_password).await?;
    patch.admin_password_hash = hash_new_password(request.admin_password).await?;

    Ok(patch)
}

/// Validate and hash a new plaintext password. `None` or empty input means
/// "no change" and produces no patch field.
async fn hash_new_password(plaintext: Option<String>) -> Result<Option<String>, Response> {
    let Some(plaintext) = non_empty(plaintext) else {
        return Ok(None);
    };

    let validation = validate_password(&plaintext);
    if !validation.is_valid {
        let message = validation
            .errors
            .first()
            .cloned()
            .unwrap_or_else(|| VALIDATION_ERROR.message.to_string());
        return Err(validation_error(&message));
    }

    let hashed = tokio::task::spawn_blocking(move || password::hash_password(&plaintext)).await;
    match hashed {
        Ok(Ok(hash)) => Ok(Some(hash)),
        Ok(Err(err)) => {
            error!("Failed to hash new password: {err}");
            Err(internal_error())
        }
        Err(err) => {
            error!("Password hashing task failed: {err}");
            Err(internal_error())
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn clean_display_field(value: Option<String>) -> Option<String> {
    non_empty(value).map(|v| sanitize_string(&v, DISPLAY_FIELD_MAX_CHARS))
}

fn validation_error(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::with_message(VALIDATION_ERROR, message)),
    )
        .into_response()
}

fn config_not_found() -> Response {
    let body = ErrorResponse {
        error: "CONFIG_NOT_FOUND".to_string(),
        message: "Configuration not found".to_string(),
        remaining_attempts: None,
        reset_time: None,
    };
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

fn internal_error() -> Response {
    let body = ErrorResponse {
        error: "INTERNAL_ERROR".to_string(),
        message: "Internal server error".to_string(),
        remaining_attempts: None,
        reset_time: None,
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use crate::auth::cookie::encode_session;
    use crate::auth::session::create_session;

    fn headers_with_admin_cookie(is_admin: bool) -> HeaderMap {
        let session = create_session(is_admin);
        let cookie = format!("{ADMIN_COOKIE}={}", encode_session(&session));
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_str(&cookie).expect("valid header"),
        );
        headers
    }

    #[test]
    fn require_admin_accepts_admin_sessions_only() {
        assert!(require_admin(&headers_with_admin_cookie(true)).is_ok());
        assert!(require_admin(&headers_with_admin_cookie(false)).is_err());
        assert!(require_admin(&HeaderMap::new()).is_err());
    }

    #[tokio::test]
    async fn empty_fields_drop_out_of_the_patch() {
        let request = ConfigUpdateRequest {
            title: Some("  ".to_string()),
            site_password: Some(String::new()),
            admin_password: None,
            ..ConfigUpdateRequest::default()
        };
        let patch = build_patch(request).await.expect("patch builds");
        assert!(patch.is_empty());
    }

    #[tokio::test]
    async fn new_password_is_validated_then_hashed() {
        let request = ConfigUpdateRequest {
            site_password: Some("correct horse battery staple".to_string()),
            ..ConfigUpdateRequest::default()
        };
        let patch = build_patch(request).await.expect("patch builds");
        let hash = patch.site_password_hash.expect("hash present");
        assert!(hash.starts_with("$2"));
        assert!(password::verify_password(
            "correct horse battery staple",
            &hash
        ));
        assert!(patch.admin_password_hash.is_none());
    }

    #[tokio::test]
    async fn weak_password_is_rejected_before_hashing() {
        let request = ConfigUpdateRequest {
            admin_password: Some("qwerty".to_string()),
            ..ConfigUpdateRequest::default()
        };
        let response = build_patch(request).await.expect_err("weak password");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn bad_repo_url_is_rejected() {
        let request = ConfigUpdateRequest {
            github_repo: Some("https://gitlab.com/acme/docs".to_string()),
            ..ConfigUpdateRequest::default()
        };
        let response = build_patch(request).await.expect_err("bad repo");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn bad_folder_names_are_rejected() {
        let request = ConfigUpdateRequest {
            folders: Some(vec!["../etc".to_string()]),
            ..ConfigUpdateRequest::default()
        };
        let response = build_patch(request).await.expect_err("bad folders");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn display_fields_are_sanitized() {
        let request = ConfigUpdateRequest {
            title: Some("  <b>Docs</b>  ".to_string()),
            ..ConfigUpdateRequest::default()
        };
        let patch = build_patch(request).await.expect("patch builds");
        assert_eq!(patch.title.as_deref(), Some("bDocs/b"));
    }

    #[test]
    fn view_strips_password_hashes() {
        let config = SiteConfig {
            id: Uuid::nil(),
            title: "Docs".to_string(),
            logo_url: None,
            slogan: None,
            help_text: None,
            github_repo: "https://github.com/acme/docs".to_string(),
            branch: "main".to_string(),
            folders: vec!["docs".to_string()],
            iframe_url: None,
            auto_refresh_enabled: true,
            refresh_interval_minutes: 15,
            last_sync_at: None,
            site_password_hash: "$2b$12$site".to_string(),
            admin_password_hash: "$2b$12$admin".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(SiteConfigView::from(config)).expect("serializes");
        assert!(json.get("site_password_hash").is_none());
        assert!(json.get("admin_password_hash").is_none());
        assert_eq!(json["title"], "Docs");
    }
}
