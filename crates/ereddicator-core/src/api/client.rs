//! API client for communicating with the Reddit REST API.
//!
//! Reddit "script" applications authenticate with the OAuth password grant:
//! the client id and secret go in a basic auth header, the account username
//! and password in the form body. The returned bearer token is then used
//! against `oauth.reddit.com`.

use chrono::Utc;
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::debug;

use crate::auth::{AccessToken, CredentialBundle};
use crate::config::Settings;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Token endpoint, relative to the auth base URL
const TOKEN_PATH: &str = "/api/v1/access_token";

/// Self-lookup endpoint, relative to the API base URL
const ME_PATH: &str = "/api/v1/me";

/// Lifetime assumed when the token response omits `expires_in`.
/// Reddit issues one-day tokens for the password grant.
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 86_400;

/// Upper bound on a token lifetime taken from the server (one year)
const MAX_TOKEN_LIFETIME_SECS: i64 = DEFAULT_TOKEN_LIFETIME_SECS * 365;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
    scope: Option<String>,
    // Reddit sends either a string ("invalid_grant") or a number here
    error: Option<serde_json::Value>,
    message: Option<String>,
}

/// The account behind an access token, as returned by `/api/v1/me`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Identity {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
}

/// API client for Reddit.
pub struct RedditClient {
    client: Client,
    auth_base_url: String,
    api_base_url: String,
    client_id: String,
    client_secret: String,
    username: String,
    login_password: String,
    token: Option<AccessToken>,
}

impl RedditClient {
    /// Create a new client for the given credentials.
    ///
    /// No request is made here; the credentials are only checked by the
    /// first authenticated call.
    pub fn new(settings: &Settings, credentials: &CredentialBundle) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.timeout)
            .build()?;

        Ok(Self {
            client,
            auth_base_url: settings.auth_base_url.trim_end_matches('/').to_string(),
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.clone(),
            username: credentials.username.clone(),
            login_password: credentials.login_password(),
            token: None,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// The current access token, if one has been fetched
    pub fn token(&self) -> Option<&AccessToken> {
        self.token.as_ref()
    }

    /// Exchange the account credentials for a bearer token
    pub async fn fetch_token(&mut self) -> Result<&AccessToken, ApiError> {
        let url = format!("{}{}", self.auth_base_url, TOKEN_PATH);
        debug!(%url, username = %self.username, "Requesting access token");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(header::ACCEPT, "application/json")
            .form(&[
                ("grant_type", "password"),
                ("username", self.username.as_str()),
                ("password", self.login_password.as_str()),
            ])
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let body = response.text().await?;
        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("token response: {}", e)))?;

        let token = Self::token_from_response(parsed)?;
        debug!(scope = %token.scope, expires_in = token.expires_in_secs, "Access token received");
        Ok(&*self.token.insert(token))
    }

    fn token_from_response(parsed: TokenResponse) -> Result<AccessToken, ApiError> {
        if let Some(error) = parsed.error {
            let reason = match error {
                serde_json::Value::String(s) => s,
                other => parsed.message.unwrap_or_else(|| other.to_string()),
            };
            return Err(ApiError::OAuth(reason));
        }

        let access_token = parsed
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::InvalidResponse("token response has no access_token".into()))?;

        Ok(AccessToken {
            token: access_token,
            scope: parsed.scope.unwrap_or_default(),
            created_at: Utc::now(),
            expires_in_secs: parsed
                .expires_in
                .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS)
                .clamp(0, MAX_TOKEN_LIFETIME_SECS),
        })
    }

    /// Return a usable bearer token, fetching a new one when missing or about to expire
    async fn bearer(&mut self) -> Result<String, ApiError> {
        if let Some(token) = self.token.as_ref().filter(|t| !t.needs_refresh()) {
            return Ok(token.token.clone());
        }
        Ok(self.fetch_token().await?.token.clone())
    }

    /// Look up the account the credentials belong to.
    ///
    /// This is the call that proves the credentials are valid.
    pub async fn me(&mut self) -> Result<Identity, ApiError> {
        self.get(ME_PATH).await
    }

    /// Authenticated GET against the API host
    pub async fn get<T: DeserializeOwned>(&mut self, path: &str) -> Result<T, ApiError> {
        let token = self.bearer().await?;
        let url = format!("{}{}", self.api_base_url, path);
        debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", path, e)))
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }
}
