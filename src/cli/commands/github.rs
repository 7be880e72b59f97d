use clap::{Arg, Command};

pub const ARG_GITHUB_TOKEN: &str = "github-token";
pub const ARG_GITHUB_API_URL: &str = "github-api-url";

pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_GITHUB_TOKEN)
                .long("github-token")
                .help("GitHub API token; optional for public repositories")
                .env("DOCGATE_GITHUB_TOKEN"),
        )
        .arg(
            Arg::new(ARG_GITHUB_API_URL)
                .long("github-api-url")
                .help("GitHub API base URL (override for GitHub Enterprise)")
                .env("DOCGATE_GITHUB_API_URL")
                .default_value(crate::github::DEFAULT_API_BASE),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_optional_and_api_url_defaults() {
        temp_env::with_vars(
            [
                ("DOCGATE_GITHUB_TOKEN", None::<&str>),
                ("DOCGATE_GITHUB_API_URL", None::<&str>),
            ],
            || {
                let command = with_args(Command::new("docgate"));
                let matches = command.get_matches_from(vec!["docgate"]);
                assert_eq!(matches.get_one::<String>(ARG_GITHUB_TOKEN), None);
                assert_eq!(
                    matches.get_one::<String>(ARG_GITHUB_API_URL).cloned(),
                    Some("https://api.github.com".to_string())
                );
            },
        );
    }
}
