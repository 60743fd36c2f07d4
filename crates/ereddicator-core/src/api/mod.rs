//! REST API client module for Reddit.
//!
//! This module provides the `RedditClient` used to obtain an OAuth access
//! token through the password grant and to call authenticated endpoints on
//! `oauth.reddit.com`.

pub mod client;
pub mod error;

pub use client::{Identity, RedditClient};
pub use error::ApiError;
