//! Core library for ereddicator.
//!
//! Resolves Reddit API credentials from an INI file or an interactive
//! prompt, builds an authenticated [`RedditClient`] and verifies it with a
//! self-lookup before handing a [`Session`] back to the caller.

pub mod api;
pub mod auth;
pub mod config;

pub use api::{ApiError, Identity, RedditClient};
pub use auth::{
    authenticate, authenticate_with_output, AuthError, CredentialBundle, CredentialSource,
    FileSource, InteractiveSource, Prompter, Session, TerminalPrompter,
};
pub use config::Settings;
