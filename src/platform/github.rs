//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    Label, MergeMethod, MergeResult, Platform, PlatformConfig, PrComment, PullRequest,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use tracing::debug;

/// Page size for list endpoints (GitHub maximum)
const PER_PAGE: u8 = 100;

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
}

impl GitHubService {
    /// Create a new GitHub service
    pub fn new(token: &str, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        if let Some(ref h) = host {
            let base_url = format!("https://{h}/api/v3");
            builder = builder
                .base_uri(&base_url)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
        }

        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self {
            client,
            config: PlatformConfig {
                platform: Platform::GitHub,
                owner,
                repo,
                host,
            },
        })
    }
}

fn label_from_octocrab(label: &octocrab::models::Label) -> Label {
    Label {
        name: label.name.clone(),
        color: Some(label.color.clone()).filter(|c| !c.is_empty()),
    }
}

/// Helper to convert octocrab PR to our `PullRequest` type
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        title: pr.title.as_deref().unwrap_or_default().to_string(),
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        author: pr.user.as_ref().map(|u| u.login.clone()),
        labels: pr
            .labels
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(label_from_octocrab)
            .collect(),
        is_draft: pr.draft.unwrap_or(false),
        head_ref: pr.head.ref_field.clone(),
        base_ref: pr.base.ref_field.clone(),
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn list_open_prs(&self) -> Result<Vec<PullRequest>> {
        debug!(owner = %self.config.owner, repo = %self.config.repo, "listing open PRs");
        let first_page = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .state(octocrab::params::State::Open)
            .per_page(PER_PAGE)
            .send()
            .await?;

        let prs = self.client.all_pages(first_page).await?;
        let result: Vec<PullRequest> = prs.iter().map(pr_from_octocrab).collect();
        debug!(count = result.len(), "listed open PRs");
        Ok(result)
    }

    async fn get_pr(&self, pr_number: u64) -> Result<PullRequest> {
        debug!(pr_number, "getting PR");
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .get(pr_number)
            .await?;
        Ok(pr_from_octocrab(&pr))
    }

    async fn list_pr_labels(&self, pr_number: u64) -> Result<Vec<Label>> {
        debug!(pr_number, "listing PR labels");
        let first_page = self
            .client
            .issues(&self.config.owner, &self.config.repo)
            .list_labels_for_issue(pr_number)
            .per_page(PER_PAGE)
            .send()
            .await?;

        let labels = self.client.all_pages(first_page).await?;
        let result: Vec<Label> = labels.iter().map(label_from_octocrab).collect();
        debug!(pr_number, count = result.len(), "listed PR labels");
        Ok(result)
    }

    async fn add_pr_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        debug!(pr_number, ?labels, "adding PR labels");
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .add_labels(pr_number, labels)
            .await?;
        Ok(())
    }

    async fn remove_pr_label(&self, pr_number: u64, label: &str) -> Result<()> {
        debug!(pr_number, label, "removing PR label");
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .remove_label(pr_number, label)
            .await?;
        Ok(())
    }

    async fn list_pr_comments(&self, pr_number: u64) -> Result<Vec<PrComment>> {
        debug!(pr_number, "listing PR comments");
        let first_page = self
            .client
            .issues(&self.config.owner, &self.config.repo)
            .list_comments(pr_number)
            .per_page(PER_PAGE)
            .send()
            .await?;

        let comments = self.client.all_pages(first_page).await?;
        let result: Vec<PrComment> = comments
            .into_iter()
            .map(|c| PrComment {
                id: c.id.0,
                author: Some(c.user.login),
                body: c.body.unwrap_or_default(),
            })
            .collect();
        debug!(pr_number, count = result.len(), "listed PR comments");
        Ok(result)
    }

    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        debug!(pr_number, "creating PR comment");
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .create_comment(pr_number, body)
            .await?;
        debug!(pr_number, "created PR comment");
        Ok(())
    }

    async fn merge_pr(&self, pr_number: u64, method: MergeMethod) -> Result<MergeResult> {
        debug!(pr_number, %method, "merging PR");

        let octocrab_method = match method {
            MergeMethod::Squash => octocrab::params::pulls::MergeMethod::Squash,
            MergeMethod::Merge => octocrab::params::pulls::MergeMethod::Merge,
            MergeMethod::Rebase => octocrab::params::pulls::MergeMethod::Rebase,
        };

        let result = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .merge(pr_number)
            .method(octocrab_method)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Merge failed: {e}")))?;

        let merge_result = MergeResult {
            merged: result.merged,
            sha: result.sha,
            message: result.message,
        };

        debug!(
            pr_number,
            merged = merge_result.merged,
            sha = ?merge_result.sha,
            "merge complete"
        );
        Ok(merge_result)
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
