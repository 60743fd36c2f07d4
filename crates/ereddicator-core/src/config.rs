//! Runtime settings.
//!
//! Settings start from built-in defaults and can be overridden through
//! `EREDDICATOR_*` environment variables (a `.env` file is honored by the
//! binary). Command line flags are applied on top by the caller.
//!
//! When no credentials path is configured, `reddit_credentials.ini` in the
//! working directory is used, falling back to
//! `~/.config/ereddicator/reddit_credentials.ini` if only that one exists.

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

/// Application name used for the config directory path
const APP_NAME: &str = "ereddicator";

/// Credentials file name
pub const DEFAULT_CREDENTIALS_FILE: &str = "reddit_credentials.ini";

pub const DEFAULT_USER_AGENT: &str = "ereddicator";

/// Host serving the OAuth token endpoint
pub const DEFAULT_AUTH_BASE_URL: &str = "https://www.reddit.com";

/// Host serving authenticated API calls
pub const DEFAULT_API_BASE_URL: &str = "https://oauth.reddit.com";

/// HTTP request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_CREDENTIALS: &str = "EREDDICATOR_CREDENTIALS";
const ENV_USER_AGENT: &str = "EREDDICATOR_USER_AGENT";
const ENV_INTERACTIVE: &str = "EREDDICATOR_INTERACTIVE";
const ENV_AUTH_URL: &str = "EREDDICATOR_AUTH_URL";
const ENV_API_URL: &str = "EREDDICATOR_API_URL";
const ENV_TIMEOUT_SECS: &str = "EREDDICATOR_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub credentials_path: PathBuf,
    pub user_agent: String,
    /// Prompt for credentials instead of reading the credentials file
    pub interactive: bool,
    pub auth_base_url: String,
    pub api_base_url: String,
    pub timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_FILE),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            interactive: false,
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), Self::default_credentials_path)
    }

    /// Build settings from `lookup`; `default_path` picks the credentials file
    /// when none is configured
    fn from_lookup<F, D>(lookup: F, default_path: D) -> Self
    where
        F: Fn(&str) -> Option<String>,
        D: FnOnce() -> PathBuf,
    {
        let mut settings = Self::default();
        let lookup = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        settings.credentials_path = match lookup(ENV_CREDENTIALS) {
            Some(path) => PathBuf::from(path),
            None => default_path(),
        };
        if let Some(user_agent) = lookup(ENV_USER_AGENT) {
            settings.user_agent = user_agent;
        }
        if let Some(flag) = lookup(ENV_INTERACTIVE) {
            settings.interactive = parse_flag(&flag);
        }
        if let Some(url) = lookup(ENV_AUTH_URL) {
            settings.auth_base_url = url;
        }
        if let Some(url) = lookup(ENV_API_URL) {
            settings.api_base_url = url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            match secs.parse::<u64>() {
                Ok(secs) if secs > 0 => settings.timeout = Duration::from_secs(secs),
                _ => warn!(value = %secs, "Ignoring invalid {}", ENV_TIMEOUT_SECS),
            }
        }
        settings
    }

    /// Credentials file to use when none is configured
    pub fn default_credentials_path() -> PathBuf {
        let local = PathBuf::from(DEFAULT_CREDENTIALS_FILE);
        if local.exists() {
            return local;
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_NAME).join(DEFAULT_CREDENTIALS_FILE))
            .filter(|path| path.exists())
            .unwrap_or(local)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
