//! GitHub content fetching.
//!
//! The gateway only ever needs one thing from GitHub: the raw text of a
//! single file on a branch. This module wraps the REST contents API behind
//! that narrow surface and classifies failures into the three cases the
//! content endpoint distinguishes. No retries; retry policy belongs to the
//! caller if it belongs anywhere.

use anyhow::{Context, Result};
use axum::http::StatusCode;
use regex::Regex;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};
use std::sync::OnceLock;
use tracing::{Instrument, info_span};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Raw-content media type for the contents API.
const RAW_CONTENT_ACCEPT: &str = "application/vnd.github.raw+json";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("GitHub API rate limit exceeded")]
    RateLimited,
    #[error("GitHub fetch failed: {0}")]
    Upstream(String),
}

/// Extract `(owner, repo)` from a GitHub repository URL. The `.git` suffix
/// is tolerated and stripped.
#[must_use]
pub fn parse_repo_url(url: &str) -> Option<(String, String)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let regex = RE.get_or_init(|| {
        Regex::new(r"github\.com/([^/]+)/([^/]+)").expect("Failed to compile repo URL regex")
    });

    let captures = regex.captures(url)?;
    let owner = captures.get(1)?.as_str().to_string();
    let repo = captures
        .get(2)?
        .as_str()
        .trim_end_matches('/')
        .trim_end_matches(".git")
        .to_string();
    if owner.is_empty() || repo.is_empty() {
        return None;
    }
    Some((owner, repo))
}

/// A client bound to one repository and branch.
pub struct GitHubClient {
    client: Client,
    api_base: String,
    owner: String,
    repo: String,
    branch: String,
    token: Option<SecretString>,
}

impl GitHubClient {
    /// Build a client for the repository named in the site configuration.
    ///
    /// # Errors
    /// Returns an error when the repository URL cannot be parsed or the HTTP
    /// client cannot be constructed.
    pub fn new(
        repo_url: &str,
        branch: &str,
        api_base: &str,
        token: Option<SecretString>,
    ) -> Result<Self> {
        let (owner, repo) = parse_repo_url(repo_url)
            .with_context(|| format!("Invalid GitHub repository URL: {repo_url}"))?;

        let client = Client::builder()
            .use_rustls_tls()
            .user_agent(crate::APP_USER_AGENT)
            .build()
            .context("Failed to build GitHub HTTP client")?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            owner,
            repo,
            branch: branch.to_string(),
            token,
        })
    }

    /// Fetch the raw text of one file on the configured branch.
    ///
    /// # Errors
    /// `NotFound` for missing files, `RateLimited` when the API quota is
    /// exhausted, `Upstream` for everything else.
    pub async fn fetch_file(&self, path: &str) -> Result<String, FetchError> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base, self.owner, self.repo, path
        );
        let span = info_span!("github.fetch", http.method = "GET", path = %path);

        async {
            let mut request = self
                .client
                .get(&url)
                .query(&[("ref", self.branch.as_str())])
                .header(ACCEPT, RAW_CONTENT_ACCEPT);
            if let Some(token) = &self.token {
                request = request.header(
                    AUTHORIZATION,
                    format!("Bearer {}", token.expose_secret()),
                );
            }

            let response = request
                .send()
                .await
                .map_err(|err| FetchError::Upstream(err.to_string()))?;

            let status = response.status();
            let rate_remaining = response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);

            classify_status(status, rate_remaining.as_deref(), path)?;

            response
                .text()
                .await
                .map_err(|err| FetchError::Upstream(err.to_string()))
        }
        .instrument(span)
        .await
    }

    #[must_use]
    pub fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    #[must_use]
    pub fn branch(&self) -> &str {
        &self.branch
    }
}

/// Map a contents-API status to the fetch error taxonomy.
///
/// GitHub reports quota exhaustion as 403 with `x-ratelimit-remaining: 0`
/// (newer endpoints use 429 directly); both are `RateLimited`.
fn classify_status(
    status: StatusCode,
    rate_remaining: Option<&str>,
    path: &str,
) -> Result<(), FetchError> {
    if status.is_success() {
        return Ok(());
    }
    if status == StatusCode::NOT_FOUND {
        return Err(FetchError::NotFound(path.to_string()));
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(FetchError::RateLimited);
    }
    if status == StatusCode::FORBIDDEN && rate_remaining == Some("0") {
        return Err(FetchError::RateLimited);
    }
    Err(FetchError::Upstream(format!(
        "unexpected status {status} for {path}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_repo_url_accepts_common_forms() {
        assert_eq!(
            parse_repo_url("https://github.com/acme/docs"),
            Some(("acme".to_string(), "docs".to_string()))
        );
        assert_eq!(
            parse_repo_url("https://github.com/acme/docs/"),
            Some(("acme".to_string(), "docs".to_string()))
        );
        assert_eq!(
            parse_repo_url("https://github.com/acme/docs.git"),
            Some(("acme".to_string(), "docs".to_string()))
        );
    }

    #[test]
    fn parse_repo_url_rejects_non_github_urls() {
        assert_eq!(parse_repo_url("https://gitlab.com/acme/docs"), None);
        assert_eq!(parse_repo_url("https://github.com/acme"), None);
        assert_eq!(parse_repo_url(""), None);
    }

    #[test]
    fn classify_status_maps_the_error_taxonomy() {
        assert!(classify_status(StatusCode::OK, None, "a.md").is_ok());

        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, None, "a.md"),
            Err(FetchError::NotFound(path)) if path == "a.md"
        ));
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, None, "a.md"),
            Err(FetchError::RateLimited)
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, Some("0"), "a.md"),
            Err(FetchError::RateLimited)
        ));
        // A 403 with remaining quota is not a rate limit.
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, Some("42"), "a.md"),
            Err(FetchError::Upstream(_))
        ));
        assert!(matches!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR, None, "a.md"),
            Err(FetchError::Upstream(_))
        ));
    }

    #[test]
    fn client_exposes_repository_and_branch() -> Result<()> {
        let client = GitHubClient::new(
            "https://github.com/acme/docs",
            "main",
            DEFAULT_API_BASE,
            None,
        )?;
        assert_eq!(client.repository(), "acme/docs");
        assert_eq!(client.branch(), "main");
        Ok(())
    }

    #[test]
    fn client_rejects_invalid_repo_url() {
        let result = GitHubClient::new("not-a-url", "main", DEFAULT_API_BASE, None);
        assert!(result.is_err());
    }
}
