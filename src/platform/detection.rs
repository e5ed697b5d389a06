//! Repository URL parsing and platform detection

use crate::error::{Error, Result};
use crate::types::{Platform, PlatformConfig};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// `owner/repo` shorthand, always resolved against github.com
static SHORTHAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+$").expect("valid regex"));

const GITHUB_HOST: &str = "github.com";
const GITLAB_HOST: &str = "gitlab.com";

/// Detect the platform from a repository URL
///
/// Returns `None` when the host is not recognisably GitHub or GitLab.
pub fn detect_platform(url: &str) -> Option<Platform> {
    let (host, _) = split_remote(url)?;
    platform_for_host(&host)
}

/// Parse a repository URL into a [`PlatformConfig`]
///
/// Accepts `https://host/owner/repo`, `ssh://git@host/owner/repo`,
/// `git@host:owner/repo` (each with or without `.git`), GitLab nested groups,
/// and the `owner/repo` shorthand for github.com.
pub fn parse_repo_info(url: &str) -> Result<PlatformConfig> {
    parse_repo_info_with(url, None)
}

/// Parse a repository URL, forcing the platform when `platform` is set
///
/// Self-hosted instances often live on hosts that do not mention
/// "github" or "gitlab"; an explicit platform skips host detection.
pub fn parse_repo_info_with(url: &str, platform: Option<Platform>) -> Result<PlatformConfig> {
    let (host, path) =
        split_remote(url).ok_or_else(|| Error::NoSupportedRemotes(url.to_string()))?;

    let platform = platform
        .or_else(|| platform_for_host(&host))
        .ok_or_else(|| Error::NoSupportedRemotes(url.to_string()))?;

    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let (owner, repo) = path
        .rsplit_once('/')
        .filter(|(owner, repo)| !owner.is_empty() && !repo.is_empty())
        .ok_or_else(|| Error::NoSupportedRemotes(url.to_string()))?;

    let default_host = match platform {
        Platform::GitHub => GITHUB_HOST,
        Platform::GitLab => GITLAB_HOST,
    };

    Ok(PlatformConfig {
        platform,
        owner: owner.to_string(),
        repo: repo.to_string(),
        host: (host != default_host).then_some(host),
    })
}

fn platform_for_host(host: &str) -> Option<Platform> {
    let host = host.to_ascii_lowercase();
    if host.contains("gitlab") {
        Some(Platform::GitLab)
    } else if host.contains("github") {
        Some(Platform::GitHub)
    } else {
        None
    }
}

/// Split a remote into `(host, path)`
fn split_remote(url: &str) -> Option<(String, String)> {
    let trimmed = url.trim().trim_end_matches('/');

    if let Some(rest) = trimmed.strip_prefix("git@") {
        let (host, path) = rest.split_once(':')?;
        return Some((host.to_string(), path.to_string()));
    }

    if trimmed.contains("://") {
        let parsed = Url::parse(trimmed).ok()?;
        let host = parsed.host_str()?.to_string();
        return Some((host, parsed.path().to_string()));
    }

    if SHORTHAND.is_match(trimmed) {
        return Some((GITHUB_HOST.to_string(), trimmed.to_string()));
    }

    None
}
