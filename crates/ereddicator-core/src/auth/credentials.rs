//! The credential bundle and the two-factor password merge.

use std::fmt;

use super::AuthError;

/// Second-factor value meaning "this account has no two-factor code"
pub const NO_TWO_FACTOR: &str = "None";

/// Everything needed to log in to Reddit as a script application.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialBundle {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    pub two_factor_code: String,
}

impl CredentialBundle {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            username: username.into(),
            password: password.into(),
            two_factor_code: NO_TWO_FACTOR.to_string(),
        }
    }

    pub fn with_two_factor_code(mut self, code: impl Into<String>) -> Self {
        self.two_factor_code = code.into();
        self
    }

    /// Check that every required field is filled in
    pub fn validate(&self) -> Result<(), AuthError> {
        let required = [
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("username", &self.username),
            ("password", &self.password),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(AuthError::IncompleteCredentials(*field)),
            None => Ok(()),
        }
    }

    /// The second-factor code with all whitespace removed, or `None` when the
    /// account does not use one (empty, blank, or any casing of "none").
    pub fn two_factor(&self) -> Option<String> {
        let code: String = self
            .two_factor_code
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        if code.is_empty() || code.eq_ignore_ascii_case(NO_TWO_FACTOR) {
            None
        } else {
            Some(code)
        }
    }

    /// Password as sent to the token endpoint.
    ///
    /// Reddit expects `password:code` for accounts with TOTP enabled.
    pub fn login_password(&self) -> String {
        match self.two_factor() {
            Some(code) => format!("{}:{}", self.password, code),
            None => self.password.clone(),
        }
    }
}

impl fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("two_factor", &self.two_factor().map(|_| "<redacted>"))
            .finish()
    }
}
