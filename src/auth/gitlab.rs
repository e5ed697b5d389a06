//! GitLab token resolution

use super::{AuthSource, token_from_cli, token_from_env};
use crate::error::{Error, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Resolved GitLab credentials
#[derive(Debug, Clone)]
pub struct GitLabAuthConfig {
    /// Personal, project or group access token
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
    /// GitLab host (e.g. "gitlab.com")
    pub host: String,
}

/// Resolve a GitLab token
///
/// Order: `GITLAB_TOKEN`, `GL_TOKEN`, then `glab config get token`.
pub async fn get_gitlab_auth(host: Option<&str>) -> Result<GitLabAuthConfig> {
    let host = host.unwrap_or("gitlab.com").to_string();

    if let Some(token) = token_from_env(&["GITLAB_TOKEN", "GL_TOKEN"]) {
        return Ok(GitLabAuthConfig {
            token,
            source: AuthSource::EnvVar,
            host,
        });
    }

    debug!(host, "trying glab CLI for token");
    let token = token_from_cli("glab", &["config", "get", "token", "--host", &host])
        .await
        .ok_or_else(|| {
            Error::Auth(
                "no GitLab token found: set GITLAB_TOKEN or run 'glab auth login'".to_string(),
            )
        })?;

    Ok(GitLabAuthConfig {
        token,
        source: AuthSource::Cli,
        host,
    })
}

/// Verify a GitLab token by fetching the authenticated user
///
/// Returns the user's username.
pub async fn test_gitlab_auth(config: &GitLabAuthConfig) -> Result<String> {
    #[derive(Deserialize)]
    struct CurrentUser {
        username: String,
    }

    let user: CurrentUser = Client::new()
        .get(format!("https://{}/api/v4/user", config.host))
        .header("PRIVATE-TOKEN", &config.token)
        .send()
        .await?
        .error_for_status()
        .map_err(|e| Error::GitLabApi(e.to_string()))?
        .json()
        .await?;

    debug!(username = %user.username, "GitLab token verified");
    Ok(user.username)
}
