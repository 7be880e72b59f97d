//! Command-line argument dispatch and server initialization.
//!
//! This module parses validated CLI arguments and maps them to the
//! appropriate action, such as starting the gateway with its full
//! configuration state.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{auth, github};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let public_base_url = matches
        .get_one::<String>(auth::ARG_PUBLIC_BASE_URL)
        .cloned()
        .context("missing required argument: --public-base-url")?;

    let github_token = matches
        .get_one::<String>(github::ARG_GITHUB_TOKEN)
        .cloned()
        .map(SecretString::from);

    let github_api_url = matches
        .get_one::<String>(github::ARG_GITHUB_API_URL)
        .cloned()
        .context("missing required argument: --github-api-url")?;

    Ok(Action::Server(Args {
        port,
        dsn,
        public_base_url,
        github_token,
        github_api_url,
    }))
}
