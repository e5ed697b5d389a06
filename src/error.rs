//! Error types for peer-review-bot

use thiserror::Error;

/// Errors produced by the bot, its platform services and its configuration
#[derive(Debug, Error)]
pub enum Error {
    /// GitHub API returned an error or unexpected payload
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// GitLab API returned an error or unexpected payload
    #[error("GitLab API error: {0}")]
    GitLabApi(String),

    /// Platform-agnostic service failure
    #[error("platform error: {0}")]
    Platform(String),

    /// Error surfaced by octocrab
    #[error("GitHub API error: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No usable token could be found
    #[error("authentication error: {0}")]
    Auth(String),

    /// Invalid or unreadable configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Repository URL does not point at a supported platform
    #[error("no supported platform for repository: {0}")]
    NoSupportedRemotes(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;
