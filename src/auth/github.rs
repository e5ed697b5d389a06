//! GitHub token resolution

use super::{AuthSource, token_from_cli, token_from_env};
use crate::error::{Error, Result};
use octocrab::Octocrab;
use tracing::debug;

/// Resolved GitHub credentials
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// Personal access token or app installation token
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}

/// Resolve a GitHub token
///
/// Order: `GITHUB_TOKEN`, `GH_TOKEN`, then `gh auth token`.
pub async fn get_github_auth(host: Option<&str>) -> Result<GitHubAuthConfig> {
    if let Some(token) = token_from_env(&["GITHUB_TOKEN", "GH_TOKEN"]) {
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::EnvVar,
            host: host.map(String::from),
        });
    }

    let mut args = vec!["auth", "token"];
    if let Some(h) = host {
        args.extend(["--hostname", h]);
    }

    debug!(?host, "trying gh CLI for token");
    let token = token_from_cli("gh", &args).await.ok_or_else(|| {
        Error::Auth(
            "no GitHub token found: set GITHUB_TOKEN or run 'gh auth login'".to_string(),
        )
    })?;

    Ok(GitHubAuthConfig {
        token,
        source: AuthSource::Cli,
        host: host.map(String::from),
    })
}

/// Verify a GitHub token by fetching the authenticated user
///
/// Returns the user's login.
pub async fn test_github_auth(config: &GitHubAuthConfig) -> Result<String> {
    let mut builder = Octocrab::builder().personal_token(config.token.clone());
    if let Some(ref h) = config.host {
        builder = builder
            .base_uri(format!("https://{h}/api/v3"))
            .map_err(|e| Error::GitHubApi(e.to_string()))?;
    }
    let client = builder
        .build()
        .map_err(|e| Error::GitHubApi(e.to_string()))?;

    let user = client.current().user().await?;
    debug!(login = %user.login, "GitHub token verified");
    Ok(user.login)
}
