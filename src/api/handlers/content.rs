//! Authenticated markdown delivery.
//!
//! The flow is: site session gate → path validation → GitHub fetch →
//! content validation → sanitized response. Content is never partially
//! rendered: either the whole sanitized document is returned or nothing is.

use axum::{
    Json,
    extract::{Extension, Query},
    http::{HeaderMap, HeaderValue, StatusCode, header::CACHE_CONTROL},
    response::{IntoResponse, Response},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::{IntoParams, ToSchema};

use crate::auth::{UNAUTHORIZED, VALIDATION_ERROR, cookie::SITE_COOKIE, session::is_valid_session};
use crate::content::{extract_title, reading_time_minutes, validate_markdown};
use crate::github::{FetchError, GitHubClient};
use crate::store;

use super::auth::types::ErrorResponse;
use super::auth::utils::session_from_cookie;

const FILE_NOT_FOUND: &str = "FILE_NOT_FOUND";
const RATE_LIMITED: &str = "RATE_LIMITED";
const CONTENT_VALIDATION_ERROR: &str = "CONTENT_VALIDATION_ERROR";
const GITHUB_FETCH_ERROR: &str = "GITHUB_FETCH_ERROR";

/// Validated content responses may be cached privately for ten minutes.
const CACHE_CONTROL_VALUE: &str = "private, max-age=600";

/// GitHub access settings shared by content handlers.
#[derive(Debug, Clone)]
pub struct ContentConfig {
    pub github_api_base: String,
    pub github_token: Option<SecretString>,
}

#[derive(Deserialize, IntoParams, Debug)]
pub struct ContentQuery {
    /// Repository-relative path of the markdown file.
    pub path: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    pub success: bool,
    /// The sanitized document, safe to hand to a renderer.
    pub content: String,
    #[schema(value_type = Object)]
    pub frontmatter: Map<String, Value>,
    pub warnings: Vec<String>,
    pub path: String,
    pub repository: String,
    pub branch: String,
    pub title: String,
    pub reading_time_minutes: u32,
}

#[utoipa::path(
    get,
    path = "/v1/content",
    params(ContentQuery),
    responses(
        (status = 200, description = "Validated and sanitized markdown", body = ContentResponse),
        (status = 400, description = "Bad path or dangerous content", body = ErrorResponse),
        (status = 401, description = "No valid site session", body = ErrorResponse),
        (status = 404, description = "File not found in the repository", body = ErrorResponse),
        (status = 429, description = "GitHub API quota exhausted", body = ErrorResponse)
    ),
    tag = "content"
)]
pub async fn get_content(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    content_config: Extension<Arc<ContentConfig>>,
    query: Option<Query<ContentQuery>>,
) -> impl IntoResponse {
    let session = session_from_cookie(&headers, SITE_COOKIE);
    if !is_valid_session(session.as_ref()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::from_code(UNAUTHORIZED)),
        )
            .into_response();
    }

    let path = match query {
        Some(Query(ContentQuery { path })) if !path.trim().is_empty() => path,
        _ => return bad_request(VALIDATION_ERROR.code, "File path is required"),
    };

    if !is_safe_markdown_path(&path) {
        warn!(path = %path, "rejected content path");
        return bad_request(VALIDATION_ERROR.code, "Invalid file path");
    }

    let config = match store::get_config(&pool).await {
        Ok(Some(config)) => config,
        Ok(None) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                GITHUB_FETCH_ERROR,
                "Site not configured",
            );
        }
        Err(err) => {
            error!("Failed to load site config: {err}");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                GITHUB_FETCH_ERROR,
                "Failed to load site configuration",
            );
        }
    };

    let client = match GitHubClient::new(
        &config.github_repo,
        &config.branch,
        &content_config.github_api_base,
        content_config.github_token.clone(),
    ) {
        Ok(client) => client,
        Err(err) => {
            error!("Failed to build GitHub client: {err}");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                GITHUB_FETCH_ERROR,
                "Failed to reach the content repository",
            );
        }
    };

    let raw = match client.fetch_file(&path).await {
        Ok(raw) => raw,
        Err(err) => return fetch_error_response(&err),
    };

    let validation = validate_markdown(&raw, Some(&path));
    if !validation.is_valid {
        warn!(path = %path, errors = ?validation.errors, "content failed validation");
        return error_response(
            StatusCode::BAD_REQUEST,
            CONTENT_VALIDATION_ERROR,
            &format!("Content validation failed: {}", validation.errors.join(", ")),
        );
    }

    // Best effort; a failed stamp never blocks content delivery.
    if let Err(err) = store::touch_last_sync(&pool).await {
        warn!("Failed to update last sync timestamp: {err}");
    }

    let content = validation.sanitized_content.unwrap_or(raw);
    let body = ContentResponse {
        success: true,
        title: extract_title(&content, Some(&path)),
        reading_time_minutes: reading_time_minutes(&content),
        frontmatter: validation.frontmatter.unwrap_or_default(),
        warnings: validation.warnings,
        path,
        repository: client.repository(),
        branch: client.branch().to_string(),
        content,
    };

    let mut response_headers = HeaderMap::new();
    response_headers.insert(CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_VALUE));
    (StatusCode::OK, response_headers, Json(body)).into_response()
}

/// Only relative markdown paths without traversal are ever forwarded to the
/// repository.
fn is_safe_markdown_path(path: &str) -> bool {
    if path.contains("..") || path.starts_with('/') || path.contains('\\') {
        return false;
    }
    if path.chars().any(char::is_control) {
        return false;
    }
    path.ends_with(".md") || path.ends_with(".markdown")
}

fn fetch_error_response(err: &FetchError) -> Response {
    match err {
        FetchError::NotFound(_) => {
            error_response(StatusCode::NOT_FOUND, FILE_NOT_FOUND, &err.to_string())
        }
        FetchError::RateLimited => {
            error_response(StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED, &err.to_string())
        }
        FetchError::Upstream(message) => {
            error!("GitHub fetch failed: {message}");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                GITHUB_FETCH_ERROR,
                "Failed to fetch content",
            )
        }
    }
}

fn bad_request(code: &str, message: &str) -> Response {
    error_response(StatusCode::BAD_REQUEST, code, message)
}

fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    let body = ErrorResponse {
        error: code.to_string(),
        message: message.to_string(),
        remaining_attempts: None,
        reset_time: None,
    };
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_paths_are_relative_markdown_files() {
        assert!(is_safe_markdown_path("docs/intro.md"));
        assert!(is_safe_markdown_path("guides/deep/dive.markdown"));
        assert!(is_safe_markdown_path("README.md"));
    }

    #[test]
    fn unsafe_paths_are_rejected() {
        for path in [
            "../secrets.md",
            "docs/../../etc/passwd.md",
            "/absolute.md",
            "docs\\windows.md",
            "docs/script.js",
            "docs/page.html",
            "docs/ctrl\u{0007}.md",
            "",
        ] {
            assert!(!is_safe_markdown_path(path), "{path:?} should be rejected");
        }
    }

    #[test]
    fn fetch_errors_map_to_contract_codes() {
        let response = fetch_error_response(&FetchError::NotFound("a.md".to_string()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = fetch_error_response(&FetchError::RateLimited);
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let response = fetch_error_response(&FetchError::Upstream("boom".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn content_response_serializes_camel_case() {
        let body = ContentResponse {
            success: true,
            content: "# Hi".to_string(),
            frontmatter: Map::new(),
            warnings: vec![],
            path: "docs/hi.md".to_string(),
            repository: "acme/docs".to_string(),
            branch: "main".to_string(),
            title: "Hi".to_string(),
            reading_time_minutes: 1,
        };
        let json = serde_json::to_value(&body).expect("serializes");
        assert_eq!(json["readingTimeMinutes"], 1);
        assert_eq!(json["repository"], "acme/docs");
    }
}
