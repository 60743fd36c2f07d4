//! Authentication module for Reddit script applications.
//!
//! This module provides:
//! - `CredentialBundle`: client id/secret, username, password and optional second factor
//! - `CredentialSource`: reads a bundle from the INI file or an interactive prompt
//! - `Session`: a Reddit client whose login has been verified with `/api/v1/me`
//!
//! Failures are returned as `AuthError`; deciding whether to exit is left to the caller.

pub mod credentials;
pub mod error;
pub mod prompt;
pub mod session;
pub mod source;

pub use credentials::{CredentialBundle, NO_TWO_FACTOR};
pub use error::{AuthError, CREDENTIALS_TEMPLATE};
pub use prompt::{Prompter, TerminalPrompter};
pub use session::{authenticate, authenticate_with_output, AccessToken, Session};
pub use source::{CredentialSource, FileSource, InteractiveSource};
