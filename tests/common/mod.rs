//! Shared test helpers

#![allow(dead_code)]

mod mock_hosting;
mod mock_platform;

pub use mock_hosting::{HostingCall, MockHostingClient};
pub use mock_platform::{MergePrCall, MockPlatformService};

use peer_review_bot::config::BotConfig;
use peer_review_bot::types::{Label, LabelResult, Platform, PlatformConfig, PrComment, PullRequest};

/// GitHub config for `test/repo`
pub fn github_config() -> PlatformConfig {
    PlatformConfig {
        platform: Platform::GitHub,
        owner: "test".to_string(),
        repo: "repo".to_string(),
        host: None,
    }
}

/// Open PR authored by `author`
pub fn make_pr(number: u64, author: &str) -> PullRequest {
    PullRequest {
        number,
        title: format!("PR {number}"),
        html_url: format!("https://github.com/test/repo/pull/{number}"),
        author: Some(author.to_string()),
        labels: vec![],
        is_draft: false,
        head_ref: format!("feature-{number}"),
        base_ref: "main".to_string(),
    }
}

/// Comment by `author`
pub fn make_comment(id: u64, author: &str, body: &str) -> PrComment {
    PrComment {
        id,
        author: Some(author.to_string()),
        body: body.to_string(),
    }
}

/// Labels from names
pub fn labels(names: &[&str]) -> Vec<Label> {
    names.iter().map(|n| Label::named(*n)).collect()
}

/// Label classification with no review labels set
pub fn unlabeled() -> LabelResult {
    LabelResult::default()
}

/// Default config pointing at `test/repo`
pub fn test_config() -> BotConfig {
    BotConfig {
        repository: Some("test/repo".to_string()),
        ..BotConfig::default()
    }
}
