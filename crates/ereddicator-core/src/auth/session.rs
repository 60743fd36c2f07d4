//! Verified Reddit sessions.
//!
//! A `Session` is only handed out after the access token has been used for
//! a successful `/api/v1/me` lookup.

use std::io::{self, Write};

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::api::{Identity, RedditClient};
use crate::config::Settings;

use super::{AuthError, CredentialSource};

/// Buffer before expiry at which the token is fetched again (seconds)
const TOKEN_REFRESH_BUFFER_SECS: i64 = 60;

#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub scope: String,
    pub created_at: DateTime<Utc>,
    pub expires_in_secs: i64,
}

impl AccessToken {
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::seconds(self.expires_in_secs)
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at()
    }

    /// Check if the token will expire soon and should be refreshed
    pub fn needs_refresh(&self) -> bool {
        Utc::now() > self.expires_at() - Duration::seconds(TOKEN_REFRESH_BUFFER_SECS)
    }
}

/// A Reddit client whose credentials have been verified.
pub struct Session {
    client: RedditClient,
    identity: Identity,
}

impl Session {
    /// Name of the account the session is logged in as
    pub fn username(&self) -> &str {
        &self.identity.name
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn client(&mut self) -> &mut RedditClient {
        &mut self.client
    }

    pub fn into_client(self) -> RedditClient {
        self.client
    }
}

/// Resolve credentials, log in and verify the login, printing progress to stdout.
pub async fn authenticate(source: CredentialSource, settings: &Settings) -> Result<Session, AuthError> {
    authenticate_with_output(source, settings, &mut io::stdout()).await
}

/// Same as [`authenticate`] with progress messages written to `out`.
///
/// Building the client never contacts Reddit, so the session is only
/// returned after a successful `/api/v1/me` lookup.
pub async fn authenticate_with_output<W: Write>(
    mut source: CredentialSource,
    settings: &Settings,
    out: &mut W,
) -> Result<Session, AuthError> {
    let credentials = source.resolve()?;
    credentials.validate()?;

    writeln!(out, "Retrieving Reddit Authentication instance...")?;
    out.flush()?;

    let mut client = RedditClient::new(settings, &credentials)?;
    let identity = client.me().await.map_err(|e| {
        warn!(error = %e, username = %credentials.username, "Reddit authentication failed");
        AuthError::from(e)
    })?;

    info!(username = %identity.name, "Authenticated with Reddit");
    writeln!(out, "Successfully authenticated.")?;

    Ok(Session { client, identity })
}
