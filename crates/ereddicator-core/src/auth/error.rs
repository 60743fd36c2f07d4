//! Errors returned while resolving credentials or logging in.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::api::ApiError;

/// Expected layout of the credentials file, shown when it is missing
pub const CREDENTIALS_TEMPLATE: &str = "[reddit]
client_id = YOUR-CLIENT-ID
client_secret = YOUR-CLIENT-SECRET
username = YOUR-USERNAME
password = YOUR-PASSWORD
# Leave as None if you don't use two-factor authentication
two_factor_code = None";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Credentials file not found: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("Invalid credentials file {}: {reason}", .path.display())]
    InvalidSource { path: PathBuf, reason: String },

    #[error("Missing required credential: {0}")]
    IncompleteCredentials(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Authentication rejected: {0}")]
    Rejected(#[source] ApiError),

    #[error("Could not complete authentication request: {0}")]
    Transport(#[source] ApiError),
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        if err.is_rejection() {
            AuthError::Rejected(err)
        } else {
            AuthError::Transport(err)
        }
    }
}

impl AuthError {
    /// Process exit status for this failure. Every failure ends the run.
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// Text to show the user, including remediation where there is one
    pub fn user_message(&self) -> String {
        match self {
            AuthError::MissingSource(path) => format!(
                "Please create a file named '{}' with the following format:\n{}",
                path.display(),
                CREDENTIALS_TEMPLATE
            ),
            AuthError::InvalidSource { .. } => format!(
                "{}\nThe credentials file must use the following format:\n{}",
                self, CREDENTIALS_TEMPLATE
            ),
            AuthError::Rejected(err) => format!(
                "Failed to authenticate with Reddit. Please check your credentials.\nError details: {}",
                err
            ),
            AuthError::IncompleteCredentials(field) => format!(
                "The Reddit credential '{}' is empty. Please provide all of client_id, client_secret, username and password.",
                field
            ),
            AuthError::Io(_) | AuthError::Transport(_) => self.to_string(),
        }
    }
}
