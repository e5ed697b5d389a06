//! Platform services for GitHub and GitLab
//!
//! Provides a unified interface for the PR/MR operations the bot needs.

mod detection;
mod factory;
mod github;
mod gitlab;

pub use detection::{detect_platform, parse_repo_info, parse_repo_info_with};
pub use factory::create_platform_service;
pub use github::GitHubService;
pub use gitlab::GitLabService;

use crate::error::Result;
use crate::types::{Label, MergeMethod, MergeResult, PlatformConfig, PrComment, PullRequest};
use async_trait::async_trait;

/// Platform service trait for PR/MR operations
///
/// This trait abstracts GitHub and GitLab operations so that the review
/// policy in [`crate::bot`] works unchanged on either platform. Each method
/// maps to a single API request (or a paginated listing).
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// List all open PRs in the repository
    async fn list_open_prs(&self) -> Result<Vec<PullRequest>>;

    /// Fetch a single PR
    async fn get_pr(&self, pr_number: u64) -> Result<PullRequest>;

    /// List labels currently applied to a PR
    async fn list_pr_labels(&self, pr_number: u64) -> Result<Vec<Label>>;

    /// Add labels to a PR
    async fn add_pr_labels(&self, pr_number: u64, labels: &[String]) -> Result<()>;

    /// Remove a single label from a PR
    async fn remove_pr_label(&self, pr_number: u64, label: &str) -> Result<()>;

    /// List comments on a PR
    async fn list_pr_comments(&self, pr_number: u64) -> Result<Vec<PrComment>>;

    /// Create a comment on a PR
    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<()>;

    /// Merge a PR with the specified method
    async fn merge_pr(&self, pr_number: u64, method: MergeMethod) -> Result<MergeResult>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
