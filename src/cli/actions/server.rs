use crate::api;
use crate::api::handlers::{auth::AuthConfig, content::ContentConfig};
use anyhow::Result;
use secrecy::SecretString;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub public_base_url: String,
    pub github_token: Option<SecretString>,
    pub github_api_url: String,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    debug!(
        port = args.port,
        public_base_url = %args.public_base_url,
        github_api_url = %args.github_api_url,
        "starting gateway"
    );

    let auth_config = AuthConfig::new(args.public_base_url);
    let content_config = ContentConfig {
        github_api_base: args.github_api_url,
        github_token: args.github_token,
    };

    api::new(args.port, args.dsn, auth_config, content_config).await
}
