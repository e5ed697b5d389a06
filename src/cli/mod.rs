//! CLI commands

pub mod auth;
pub mod context;
pub mod scan;
pub mod serve;
pub mod style;

use clap::Subcommand;
use std::path::PathBuf;

/// Options shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Explicit config file
    pub config: Option<PathBuf>,
    /// Repository override
    pub repository: Option<String>,
    /// Force merge-on-review on
    pub merge_on_review: bool,
}

/// Platform to check credentials for
#[derive(Debug, Clone, Subcommand)]
pub enum AuthPlatform {
    /// GitHub (GITHUB_TOKEN, GH_TOKEN or gh CLI)
    Github {
        /// GitHub Enterprise host
        #[arg(long)]
        host: Option<String>,
    },
    /// GitLab (GITLAB_TOKEN, GL_TOKEN or glab CLI)
    Gitlab {
        /// Self-hosted GitLab host
        #[arg(long)]
        host: Option<String>,
    },
}
