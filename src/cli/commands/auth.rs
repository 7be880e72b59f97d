use clap::{Arg, Command};

pub const ARG_PUBLIC_BASE_URL: &str = "public-base-url";

pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_PUBLIC_BASE_URL)
            .long("public-base-url")
            .help("Public URL the site is served from; governs CORS and the Secure cookie flag")
            .env("DOCGATE_PUBLIC_BASE_URL")
            .default_value("http://localhost:3000"),
    )
}
