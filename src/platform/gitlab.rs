//! GitLab platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    Label, MergeMethod, MergeResult, Platform, PlatformConfig, PrComment, PullRequest,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// GitLab service using reqwest
pub struct GitLabService {
    client: Client,
    token: String,
    api_base: String,
    config: PlatformConfig,
    project_path: String,
}

#[derive(Deserialize)]
struct GitLabUser {
    username: String,
}

#[derive(Deserialize)]
struct MergeRequest {
    iid: u64,
    web_url: String,
    source_branch: String,
    target_branch: String,
    title: String,
    #[serde(default)]
    draft: bool,
    #[serde(default)]
    labels: Vec<String>,
    author: Option<GitLabUser>,
}

#[derive(Deserialize)]
struct MrNote {
    id: u64,
    body: String,
    system: bool,
    author: Option<GitLabUser>,
}

/// Merge response
#[derive(Deserialize)]
struct MergeResponse {
    state: String,
    merge_commit_sha: Option<String>,
    squash_commit_sha: Option<String>,
}

impl From<MergeRequest> for PullRequest {
    fn from(mr: MergeRequest) -> Self {
        Self {
            number: mr.iid,
            title: mr.title,
            html_url: mr.web_url,
            author: mr.author.map(|a| a.username),
            // GitLab returns label names only
            labels: mr.labels.into_iter().map(Label::named).collect(),
            is_draft: mr.draft,
            head_ref: mr.source_branch,
            base_ref: mr.target_branch,
        }
    }
}

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Page size for list endpoints (GitLab maximum)
const PER_PAGE: &str = "100";

/// Response header carrying the next page number, empty on the last page
const NEXT_PAGE_HEADER: &str = "x-next-page";

impl GitLabService {
    /// Create a new GitLab service
    pub fn new(token: String, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let host = host.unwrap_or_else(|| "gitlab.com".to_string());
        let project_path = format!("{owner}/{repo}");

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::GitLabApi(format!("failed to create HTTP client: {e}")))?;

        let config_host = if host == "gitlab.com" {
            None
        } else {
            Some(host.clone())
        };

        Ok(Self {
            client,
            token,
            api_base: format!("https://{host}/api/v4"),
            config: PlatformConfig {
                platform: Platform::GitLab,
                owner,
                repo,
                host: config_host,
            },
            project_path,
        })
    }

    /// Send requests to `api_base` (e.g. `http://127.0.0.1:8080/api/v4`)
    /// instead of `https://{host}/api/v4`
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn encoded_project(&self) -> String {
        urlencoding::encode(&self.project_path).into_owned()
    }

    fn mr_url(&self, pr_number: u64, suffix: &str) -> String {
        self.api_url(&format!(
            "/projects/{}/merge_requests/{}{}",
            self.encoded_project(),
            pr_number,
            suffix
        ))
    }

    async fn fetch_mr(&self, pr_number: u64) -> Result<MergeRequest> {
        let mr = self
            .client
            .get(self.mr_url(pr_number, ""))
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?
            .json()
            .await?;
        Ok(mr)
    }

    /// GET a list endpoint, following `X-Next-Page` until the last page
    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = "1".to_string();

        loop {
            let response = self
                .client
                .get(url)
                .header("PRIVATE-TOKEN", &self.token)
                .query(query)
                .query(&[("per_page", PER_PAGE), ("page", page.as_str())])
                .send()
                .await?
                .error_for_status()
                .map_err(|e| Error::GitLabApi(e.to_string()))?;

            let next_page = response
                .headers()
                .get(NEXT_PAGE_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty() && *v != page)
                .map(String::from);

            let batch: Vec<T> = response.json().await?;
            items.extend(batch);

            match next_page {
                Some(next) => page = next,
                None => break,
            }
        }

        Ok(items)
    }

    /// Update the MR's labels via `add_labels` / `remove_labels`
    async fn put_labels(&self, pr_number: u64, field: &str, labels: &str) -> Result<()> {
        self.client
            .put(self.mr_url(pr_number, ""))
            .header("PRIVATE-TOKEN", &self.token)
            .json(&serde_json::json!({ field: labels }))
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl PlatformService for GitLabService {
    async fn list_open_prs(&self) -> Result<Vec<PullRequest>> {
        debug!(project = %self.project_path, "listing open MRs");
        let url = self.api_url(&format!(
            "/projects/{}/merge_requests",
            self.encoded_project()
        ));

        let mrs: Vec<MergeRequest> = self.get_all_pages(&url, &[("state", "opened")]).await?;

        let result: Vec<PullRequest> = mrs.into_iter().map(Into::into).collect();
        debug!(count = result.len(), "listed open MRs");
        Ok(result)
    }

    async fn get_pr(&self, pr_number: u64) -> Result<PullRequest> {
        debug!(mr_iid = pr_number, "getting MR");
        Ok(self.fetch_mr(pr_number).await?.into())
    }

    async fn list_pr_labels(&self, pr_number: u64) -> Result<Vec<Label>> {
        debug!(mr_iid = pr_number, "listing MR labels");
        let mr = self.fetch_mr(pr_number).await?;
        Ok(mr.labels.into_iter().map(Label::named).collect())
    }

    async fn add_pr_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        debug!(mr_iid = pr_number, ?labels, "adding MR labels");
        self.put_labels(pr_number, "add_labels", &labels.join(","))
            .await
    }

    async fn remove_pr_label(&self, pr_number: u64, label: &str) -> Result<()> {
        debug!(mr_iid = pr_number, label, "removing MR label");
        self.put_labels(pr_number, "remove_labels", label).await
    }

    async fn list_pr_comments(&self, pr_number: u64) -> Result<Vec<PrComment>> {
        debug!(mr_iid = pr_number, "listing MR comments");

        // Oldest first, matching GitHub's comment order
        let notes: Vec<MrNote> = self
            .get_all_pages(
                &self.mr_url(pr_number, "/notes"),
                &[("sort", "asc"), ("order_by", "created_at")],
            )
            .await?;

        let comments: Vec<PrComment> = notes
            .into_iter()
            .filter(|n| !n.system)
            .map(|n| PrComment {
                id: n.id,
                author: n.author.map(|a| a.username),
                body: n.body,
            })
            .collect();
        debug!(
            mr_iid = pr_number,
            count = comments.len(),
            "listed MR comments"
        );
        Ok(comments)
    }

    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        debug!(mr_iid = pr_number, "creating MR comment");

        self.client
            .post(self.mr_url(pr_number, "/notes"))
            .header("PRIVATE-TOKEN", &self.token)
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?;

        debug!(mr_iid = pr_number, "created MR comment");
        Ok(())
    }

    async fn merge_pr(&self, pr_number: u64, method: MergeMethod) -> Result<MergeResult> {
        debug!(mr_iid = pr_number, %method, "merging MR");

        // The merge endpoint has no per-request merge method; rebasing is a
        // project setting
        let body = match method {
            MergeMethod::Squash => serde_json::json!({ "squash": true }),
            MergeMethod::Merge => serde_json::json!({}),
            MergeMethod::Rebase => {
                return Err(Error::Config(
                    "merge_method \"rebase\" is not supported on GitLab".into(),
                ));
            }
        };

        let response: MergeResponse = self
            .client
            .put(self.mr_url(pr_number, "/merge"))
            .header("PRIVATE-TOKEN", &self.token)
            .json(&body)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(format!("Merge failed: {e}")))?
            .json()
            .await?;

        let merged = response.state == "merged";
        let merge_result = MergeResult {
            merged,
            sha: response.squash_commit_sha.or(response.merge_commit_sha),
            message: (!merged).then(|| format!("merge request is {}", response.state)),
        };

        debug!(
            mr_iid = pr_number,
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
