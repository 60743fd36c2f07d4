//! ereddicator - log in to the Reddit API.
//!
//! Reads Reddit script-app credentials from `reddit_credentials.ini` (or
//! prompts for them with `--interactive`), logs in, and verifies the login
//! before reporting which account is authenticated.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ereddicator_core::{authenticate, AuthError, CredentialSource, Settings};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "ereddicator", version, about = "Authenticate against the Reddit API")]
struct Cli {
    /// Prompt for credentials instead of reading the credentials file
    #[arg(short, long)]
    interactive: bool,

    /// Path to the credentials file
    #[arg(short, long, value_name = "PATH")]
    credentials: Option<PathBuf>,

    /// User agent sent with every Reddit request
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Apply command line overrides on top of environment settings
    fn apply(&self, mut settings: Settings) -> Settings {
        if self.interactive {
            settings.interactive = true;
        }
        if let Some(ref path) = self.credentials {
            settings.credentials_path = path.clone();
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = user_agent.clone();
        }
        settings
    }
}

/// Initialize the tracing subscriber for logging
fn init_tracing(verbose: bool) {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Print the user-facing explanation for a failed login and return the exit status
fn report_failure(err: &AuthError) -> u8 {
    println!("{}", err.user_message());
    err.exit_code()
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = cli.apply(Settings::from_env());
    debug!(?settings, "Settings resolved");

    let source = CredentialSource::from_settings(&settings);
    match authenticate(source, &settings).await {
        Ok(session) => {
            info!(username = %session.username(), "Session ready");
            println!("Logged in as u/{}", session.username());
            ExitCode::SUCCESS
        }
        Err(err) => ExitCode::from(report_failure(&err)),
    }
}
