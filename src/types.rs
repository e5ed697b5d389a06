//! Core types for peer-review-bot

use serde::{Deserialize, Serialize};

/// A label attached to a pull request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Label {
    /// Label name
    pub name: String,
    /// Hex color without `#`, when the platform reports one
    pub color: Option<String>,
}

impl Label {
    /// Label with just a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
        }
    }
}

/// A pull request / merge request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR/MR number
    pub number: u64,
    /// PR/MR title
    pub title: String,
    /// Web URL for the PR/MR
    pub html_url: String,
    /// Login of the PR author, if known
    pub author: Option<String>,
    /// Labels currently applied
    pub labels: Vec<Label>,
    /// Whether PR is a draft
    pub is_draft: bool,
    /// Head branch name
    pub head_ref: String,
    /// Base branch name
    pub base_ref: String,
}

/// A comment on a pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrComment {
    /// Comment ID
    pub id: u64,
    /// Login of the commenter, if known
    pub author: Option<String>,
    /// Comment body text
    pub body: String,
}

/// Review-related label classification for a single PR
///
/// Derived fresh on every run from the PR's current labels.
#[derive(Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct LabelResult {
    /// PR carries the "reviewed" label
    pub labeled_reviewed: bool,
    /// PR carries the "exclude" label
    pub labeled_exclude: bool,
    /// PR carries the "needs review" label
    pub labeled_needs_review: bool,
    /// All labels on the PR
    pub labels: Vec<Label>,
}

impl LabelResult {
    /// Names of all labels on the PR, in platform order
    pub fn label_names(&self) -> Vec<String> {
        self.labels.iter().map(|l| l.name.clone()).collect()
    }
}

/// A single change to a PR's label set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelModification {
    /// Add the label
    Add(String),
    /// Remove the label
    Remove(String),
}

impl std::fmt::Display for LabelModification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add(name) => write!(f, "+{name}"),
            Self::Remove(name) => write!(f, "-{name}"),
        }
    }
}

/// Detected platform type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// GitHub or GitHub Enterprise
    GitHub,
    /// GitLab or self-hosted GitLab
    GitLab,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GitHub => write!(f, "GitHub"),
            Self::GitLab => write!(f, "GitLab"),
        }
    }
}

/// Platform configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Platform type
    pub platform: Platform,
    /// Repository owner (user, organization or GitLab group path)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com/gitlab.com)
    pub host: Option<String>,
}

/// Result of a merge operation
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// Whether the merge was successful
    pub merged: bool,
    /// The SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Message from the merge operation (especially on failure)
    pub message: Option<String>,
}

/// Merge strategy/method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    /// Create a merge commit
    #[default]
    Merge,
    /// Squash all commits into one
    Squash,
    /// Rebase commits onto base branch
    Rebase,
}

impl std::fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Squash => write!(f, "squash"),
            Self::Merge => write!(f, "merge"),
            Self::Rebase => write!(f, "rebase"),
        }
    }
}
