//! Platform service construction

use crate::auth::{get_github_auth, get_gitlab_auth};
use crate::error::Result;
use crate::platform::{GitHubService, GitLabService, PlatformService};
use crate::types::{Platform, PlatformConfig};
use std::sync::Arc;
use tracing::debug;

/// Resolve credentials for `config` and build the matching platform service
pub async fn create_platform_service(config: &PlatformConfig) -> Result<Arc<dyn PlatformService>> {
    debug!(platform = %config.platform, owner = %config.owner, repo = %config.repo, "creating platform service");
    match config.platform {
        Platform::GitHub => {
            let auth = get_github_auth(config.host.as_deref()).await?;
            debug!(source = %auth.source, "resolved GitHub token");
            Ok(Arc::new(GitHubService::new(
                &auth.token,
                config.owner.clone(),
                config.repo.clone(),
                config.host.clone(),
            )?))
        }
        Platform::GitLab => {
            let auth = get_gitlab_auth(config.host.as_deref()).await?;
            debug!(source = %auth.source, "resolved GitLab token");
            Ok(Arc::new(GitLabService::new(
                auth.token,
                config.owner.clone(),
                config.repo.clone(),
                config.host.clone(),
            )?))
        }
    }
}
