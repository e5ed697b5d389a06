//! Bot configuration
//!
//! Loaded from TOML. Resolution order for the file: explicit `--config` path,
//! `./peer-review-bot.toml`, then `<config dir>/peer-review-bot/config.toml`.
//! When no file exists the defaults apply. CLI flags and env vars are layered
//! on top by the binary.

use crate::error::{Error, Result};
use crate::platform::parse_repo_info_with;
use crate::types::{MergeMethod, Platform, PlatformConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config filename looked up in the working directory
const LOCAL_CONFIG_FILE: &str = "peer-review-bot.toml";

/// Directory name under the user config dir
const CONFIG_DIR: &str = "peer-review-bot";

/// Config filename under [`CONFIG_DIR`]
const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotConfig {
    /// Repository URL or `owner/repo` shorthand
    #[serde(default)]
    pub repository: Option<String>,
    /// Force the platform instead of detecting it from the repository host
    #[serde(default)]
    pub platform: Option<Platform>,
    /// Review policy
    #[serde(default)]
    pub review: ReviewConfig,
    /// Label names used to track review state
    #[serde(default)]
    pub labels: LabelNames,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Review policy settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Distinct approving reviewers required
    #[serde(default = "default_reviews_needed")]
    pub reviews_needed: usize,
    /// Comment fragments that count as approval (matched case-insensitively)
    #[serde(default = "default_approval_markers")]
    pub approval_markers: Vec<String>,
    /// Body of the instructions comment
    ///
    /// `{reviews_needed}` and `{reviewed_label}` are substituted.
    #[serde(default = "default_instructions")]
    pub instructions_comment: String,
    /// Merge PRs as soon as they are approved
    #[serde(default)]
    pub merge_on_review: bool,
    /// Merge method used when merging on review
    #[serde(default)]
    pub merge_method: MergeMethod,
}

fn default_reviews_needed() -> usize {
    1
}

fn default_approval_markers() -> Vec<String> {
    vec!["LGTM".into(), ":+1:".into(), "👍".into()]
}

fn default_instructions() -> String {
    "Thanks for the pull request! This repository uses peer review. \
     Once {reviews_needed} reviewer(s) other than the author comment with `LGTM` or :+1:, \
     this pull request will be labeled `{reviewed_label}`."
        .into()
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            reviews_needed: default_reviews_needed(),
            approval_markers: default_approval_markers(),
            instructions_comment: default_instructions(),
            merge_on_review: false,
            merge_method: MergeMethod::default(),
        }
    }
}

/// Label names the bot reads and writes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelNames {
    /// Applied once the PR has enough approvals
    #[serde(default = "default_reviewed_label")]
    pub reviewed: String,
    /// Applied while the PR is waiting for approvals
    #[serde(default = "default_needs_review_label")]
    pub needs_review: String,
    /// PRs carrying this label are ignored
    #[serde(default = "default_exclude_label")]
    pub exclude: String,
}

fn default_reviewed_label() -> String {
    "peer-reviewed".into()
}

fn default_needs_review_label() -> String {
    "needs-peer-review".into()
}

fn default_exclude_label() -> String {
    "peer-review-excluded".into()
}

impl Default for LabelNames {
    fn default() -> Self {
        Self {
            reviewed: default_reviewed_label(),
            needs_review: default_needs_review_label(),
            exclude: default_exclude_label(),
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_listen() -> String {
    "0.0.0.0:3000".into()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl BotConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("invalid config: {e}")))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Load configuration using the standard search order
    ///
    /// An explicit path must exist; the implicit locations are optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config");
            return Self::from_file(path);
        }

        for candidate in [Some(PathBuf::from(LOCAL_CONFIG_FILE)), user_config_path()]
            .into_iter()
            .flatten()
        {
            if candidate.is_file() {
                debug!(path = %candidate.display(), "loading config");
                return Self::from_file(&candidate);
            }
        }

        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Check invariants the rest of the bot relies on
    pub fn validate(&self) -> Result<()> {
        if self.review.reviews_needed == 0 {
            return Err(Error::Config("review.reviews_needed must be at least 1".into()));
        }
        if self.review.approval_markers.iter().all(|m| m.trim().is_empty()) {
            return Err(Error::Config(
                "review.approval_markers must contain at least one marker".into(),
            ));
        }

        let LabelNames {
            reviewed,
            needs_review,
            exclude,
        } = &self.labels;
        for name in [reviewed, needs_review, exclude] {
            if name.trim().is_empty() {
                return Err(Error::Config("label names must not be empty".into()));
            }
        }
        if reviewed.eq_ignore_ascii_case(needs_review)
            || reviewed.eq_ignore_ascii_case(exclude)
            || needs_review.eq_ignore_ascii_case(exclude)
        {
            return Err(Error::Config("label names must be distinct".into()));
        }

        Ok(())
    }

    /// Resolve the configured repository to a platform configuration
    pub fn platform_config(&self) -> Result<PlatformConfig> {
        let repository = self
            .repository
            .as_deref()
            .ok_or_else(|| Error::Config("no repository configured".into()))?;
        let config = parse_repo_info_with(repository, self.platform)?;

        // GitLab has no per-request rebase merge
        if config.platform == Platform::GitLab && self.review.merge_method == MergeMethod::Rebase {
            return Err(Error::Config(
                "review.merge_method \"rebase\" is not supported on GitLab".into(),
            ));
        }
        Ok(config)
    }

    /// Instructions comment with placeholders filled in
    pub fn rendered_instructions(&self) -> String {
        self.review
            .instructions_comment
            .replace("{reviews_needed}", &self.review.reviews_needed.to_string())
            .replace("{reviewed_label}", &self.labels.reviewed)
    }
}

/// `<config dir>/peer-review-bot/config.toml`, if the platform has a config dir
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = BotConfig::default();
        assert_eq!(config.review.reviews_needed, 1);
        assert!(!config.review.merge_on_review);
        assert_eq!(config.review.merge_method, MergeMethod::Merge);
        assert_eq!(config.labels.reviewed, "peer-reviewed");
        assert_eq!(config.labels.needs_review, "needs-peer-review");
        assert_eq!(config.labels.exclude, "peer-review-excluded");
        assert_eq!(config.server.listen, "0.0.0.0:3000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BotConfig::from_toml(
            r#"
repository = "acme/widgets"

[review]
merge_on_review = true
merge_method = "squash"

[labels]
reviewed = "approved"
"#,
        )
        .unwrap();

        assert_eq!(config.repository.as_deref(), Some("acme/widgets"));
        assert!(config.review.merge_on_review);
        assert_eq!(config.review.merge_method, MergeMethod::Squash);
        assert_eq!(config.review.reviews_needed, 1);
        assert_eq!(config.labels.reviewed, "approved");
        assert_eq!(config.labels.needs_review, "needs-peer-review");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = BotConfig::from_toml("review = 3").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_file_and_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bot.toml");
        std::fs::write(&path, "[review]\nreviews_needed = 2\n").unwrap();

        let config = BotConfig::load(Some(&path)).unwrap();
        assert_eq!(config.review.reviews_needed, 2);

        let missing = temp.path().join("missing.toml");
        assert!(matches!(BotConfig::load(Some(&missing)), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_reviews() {
        let mut config = BotConfig::default();
        config.review.reviews_needed = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_labels() {
        let mut config = BotConfig::default();
        config.labels.needs_review = "Peer-Reviewed".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_markers() {
        let mut config = BotConfig::default();
        config.review.approval_markers = vec!["  ".into()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_platform_config_requires_repository() {
        let mut config = BotConfig::default();
        assert!(matches!(config.platform_config(), Err(Error::Config(_))));

        config.repository = Some("https://gitlab.com/group/project.git".into());
        let platform = config.platform_config().unwrap();
        assert_eq!(platform.platform, Platform::GitLab);
        assert_eq!(platform.owner, "group");
        assert_eq!(platform.repo, "project");
    }

    #[test]
    fn test_platform_config_rejects_rebase_on_gitlab() {
        let mut config = BotConfig::default();
        config.review.merge_method = MergeMethod::Rebase;

        config.repository = Some("https://gitlab.com/group/project.git".into());
        let err = config.platform_config().unwrap_err();
        assert!(err.to_string().contains("rebase"), "got {err}");

        config.repository = Some("acme/widgets".into());
        assert_eq!(config.platform_config().unwrap().platform, Platform::GitHub);
    }

    #[test]
    fn test_rendered_instructions_fills_placeholders() {
        let mut config = BotConfig::default();
        config.review.reviews_needed = 2;
        let text = config.rendered_instructions();
        assert!(text.contains("Once 2 reviewer(s)"));
        assert!(text.contains("`peer-reviewed`"));
        assert!(!text.contains('{'));
    }
}
