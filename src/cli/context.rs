//! Shared command context for CLI commands
//!
//! Extracts the setup shared by serve and scan.

use crate::cli::GlobalArgs;
use peer_review_bot::bot::{HostingClient, ReviewBot};
use peer_review_bot::config::BotConfig;
use peer_review_bot::error::Result;
use peer_review_bot::platform::create_platform_service;
use peer_review_bot::review::{Coordinator, ReviewOptions};
use peer_review_bot::types::PlatformConfig;
use std::sync::Arc;

/// Shared context for CLI commands that interact with the platform
///
/// This performs the common setup:
/// - Load config and apply CLI/env overrides
/// - Validate it
/// - Resolve the repository and create the platform service
/// - Build the review bot on top of it
pub struct CommandContext {
    /// Effective configuration
    pub config: BotConfig,
    /// Repository being managed
    pub platform_config: PlatformConfig,
    /// Hosting client used by the coordinator
    pub bot: Arc<ReviewBot>,
}

impl CommandContext {
    /// Create a new command context
    pub async fn new(globals: &GlobalArgs) -> Result<Self> {
        let mut config = BotConfig::load(globals.config.as_deref())?;

        if let Some(ref repository) = globals.repository {
            config.repository = Some(repository.clone());
        }
        if globals.merge_on_review {
            config.review.merge_on_review = true;
        }
        config.validate()?;

        let platform_config = config.platform_config()?;
        let platform = create_platform_service(&platform_config).await?;
        let bot = Arc::new(ReviewBot::new(platform, &config)?);

        Ok(Self {
            config,
            platform_config,
            bot,
        })
    }

    /// Build a coordinator for this repository
    pub fn coordinator(&self) -> Coordinator {
        let client: Arc<dyn HostingClient> = self.bot.clone();
        Coordinator::new(
            client,
            ReviewOptions {
                merge_on_review: self.config.review.merge_on_review,
            },
        )
    }

    /// `owner/repo` for display
    pub fn repo_slug(&self) -> String {
        format!("{}/{}", self.platform_config.owner, self.platform_config.repo)
    }
}
