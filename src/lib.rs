//! # Docgate (Documentation Gateway)
//!
//! `docgate` is a password-protected, read-only documentation gateway. It
//! fronts a markdown repository hosted on GitHub and only serves content to
//! clients holding a valid session cookie.
//!
//! ## Trust Domains
//!
//! Two independent trust domains are kept apart by cookie path scoping:
//!
//! - **Site** (`site_session`, `Path=/`): read access to rendered content.
//! - **Admin** (`admin_session`, `Path=/v1/admin`): configuration changes.
//!
//! The cookies are structurally identical stateless tokens; the path
//! restriction is the boundary, so a site cookie is never presented to the
//! admin subtree and vice versa.
//!
//! ## Sessions
//!
//! Sessions are self-contained: the cookie value is the base64-encoded
//! session record, there is no server-side session table, and tokens cannot
//! be revoked before their 24-hour expiry. Logout only clears the browser
//! cookie. This is an accepted tradeoff, not an oversight.
//!
//! ## Content Safety
//!
//! Markdown fetched from GitHub is untrusted. Before a document is returned
//! for rendering it passes a validation pipeline (size caps, frontmatter
//! inspection, dangerous-markup scan with code spans excluded, suspicious
//! link detection) and a sanitization pass that strips script blocks, inline
//! event handlers, and `javascript:`/`data:` URLs.

pub mod api;
pub mod auth;
pub mod cli;
pub mod content;
pub mod github;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
