//! Site configuration storage.
//!
//! A single `site_config` row holds everything the gateway needs: display
//! fields, the GitHub source, and the two password hashes. Updates are
//! partial patches: absent fields keep their stored values, so a config
//! update can never accidentally erase credentials.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::Instrument;
use uuid::Uuid;

/// The stored site configuration.
#[derive(Debug, Clone, Serialize)]
pub struct SiteConfig {
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
    pub site_password_hash: String,
    pub admin_password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The credential subset handed to the login handlers. Hashes are opaque
/// strings; plaintext never reaches storage.
#[derive(Debug, Clone)]
pub struct SiteCredentials {
    pub site_password_hash: String,
    pub admin_password_hash: String,
}

/// A partial update. `None` fields are left untouched in storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteConfigPatch {
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
    pub site_password_hash: Option<String>,
    pub admin_password_hash: Option<String>,
}

impl SiteConfigPatch {
    /// True when the patch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

const SELECT_COLUMNS: &str = "id, title, logo_url, slogan, help_text, github_repo, branch, \
     folders, iframe_url, auto_refresh_enabled, refresh_interval_minutes, last_sync_at, \
     site_password_hash, admin_password_hash, created_at, updated_at";

fn config_from_row(row: &PgRow) -> SiteConfig {
    SiteConfig {
        id: row.get("id"),
        title: row.get("title"),
        logo_url: row.get("logo_url"),
        slogan: row.get("slogan"),
        help_text: row.get("help_text"),
        github_repo: row.get("github_repo"),
        branch: row.get("branch"),
        folders: row.get("folders"),
        iframe_url: row.get("iframe_url"),
        auto_refresh_enabled: row.get("auto_refresh_enabled"),
        refresh_interval_minutes: row.get("refresh_interval_minutes"),
        last_sync_at: row.get("last_sync_at"),
        site_password_hash: row.get("site_password_hash"),
        admin_password_hash: row.get("admin_password_hash"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Fetch the site configuration, if one has been created.
///
/// # Errors
/// Returns an error when the query itself fails; an absent row is `None`.
pub async fn get_config(pool: &PgPool) -> Result<Option<SiteConfig>> {
    let query = format!("SELECT {SELECT_COLUMNS} FROM site_config LIMIT 1");
    let span = tracing::info_span!("db.query", db.system = "postgresql", db.operation = "SELECT");
    let row = sqlx::query(&query)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to fetch site config")?;

    Ok(row.as_ref().map(config_from_row))
}

/// Fetch only the password hashes used by the login handlers.
///
/// # Errors
/// Returns an error when the query fails; an absent row is `None`.
pub async fn get_credentials(pool: &PgPool) -> Result<Option<SiteCredentials>> {
    let query = "SELECT site_password_hash, admin_password_hash FROM site_config LIMIT 1";
    let span = tracing::info_span!("db.query", db.system = "postgresql", db.operation = "SELECT");
    let row = sqlx::query(query)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to fetch site credentials")?;

    Ok(row.map(|row| SiteCredentials {
        site_password_hash: row.get("site_password_hash"),
        admin_password_hash: row.get("admin_password_hash"),
    }))
}

/// Apply a partial patch to the stored configuration.
///
/// `COALESCE` keeps stored values wherever the patch carries `None`, which is
/// what makes empty password fields safe to omit. Returns `false` when no
/// configuration row exists yet.
///
/// # Errors
/// Returns an error when the update query fails.
pub async fn update_config(pool: &PgPool, patch: SiteConfigPatch) -> Result<bool> {
    let query = "UPDATE site_config SET \
         title = COALESCE($1, title), \
         logo_url = COALESCE($2, logo_url), \
         slogan = COALESCE($3, slogan), \
         help_text = COALESCE($4, help_text), \
         github_repo = COALESCE($5, github_repo), \
         branch = COALESCE($6, branch), \
         folders = COALESCE($7, folders), \
         iframe_url = COALESCE($8, iframe_url), \
         auto_refresh_enabled = COALESCE($9, auto_refresh_enabled), \
         refresh_interval_minutes = COALESCE($10, refresh_interval_minutes), \
         site_password_hash = COALESCE($11, site_password_hash), \
         admin_password_hash = COALESCE($12, admin_password_hash), \
         updated_at = NOW()";
    let span = tracing::info_span!("db.query", db.system = "postgresql", db.operation = "UPDATE");
    let result = sqlx::query(query)
        .bind(patch.title)
        .bind(patch.logo_url)
        .bind(patch.slogan)
        .bind(patch.help_text)
        .bind(patch.github_repo)
        .bind(patch.branch)
        .bind(patch.folders)
        .bind(patch.iframe_url)
        .bind(patch.auto_refresh_enabled)
        .bind(patch.refresh_interval_minutes)
        .bind(patch.site_password_hash)
        .bind(patch.admin_password_hash)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to update site config")?;

    Ok(result.rows_affected() > 0)
}

/// Stamp the last successful content sync.
///
/// # Errors
/// Returns an error when the update query fails.
pub async fn touch_last_sync(pool: &PgPool) -> Result<bool> {
    let query = "UPDATE site_config SET last_sync_at = NOW(), updated_at = NOW()";
    let span = tracing::info_span!("db.query", db.system = "postgresql", db.operation = "UPDATE");
    let result = sqlx::query(query)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to update last sync timestamp")?;

    Ok(result.rows_affected() > 0)
}
