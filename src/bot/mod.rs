//! Review bot - the hosting client the coordinator talks to
//!
//! [`HostingClient`] is the seam between the review coordinator and the
//! hosting platform. [`ReviewBot`] implements it on top of any
//! [`PlatformService`], owning the label, approval and instructions policy.

mod approval;
mod labels;

pub use approval::ApprovalPolicy;
pub use labels::{classify_labels, plan_label_changes};

use crate::config::{BotConfig, LabelNames};
use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::{
    LabelModification, LabelResult, MergeMethod, MergeResult, PrComment, PullRequest,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Hidden marker identifying the bot's instructions comment
pub const INSTRUCTIONS_MARKER: &str = "<!-- peer-review-bot:instructions -->";

/// Whether a comment body is the bot's instructions comment
pub fn is_instructions_comment(body: &str) -> bool {
    body.contains(INSTRUCTIONS_MARKER)
}

/// Operations the review coordinator needs from the hosting side
#[async_trait]
pub trait HostingClient: Send + Sync {
    /// List open pull requests
    async fn get_pull_requests(&self) -> Result<Vec<PullRequest>>;

    /// Classify a PR's labels
    async fn check_for_label(&self, pr_number: u64) -> Result<LabelResult>;

    /// Whether the PR's comments amount to approval
    async fn check_for_approval_comments(&self, pr_number: u64) -> Result<bool>;

    /// Whether the instructions comment was already posted
    async fn check_for_instructions_comment(&self, pr_number: u64) -> Result<bool>;

    /// Post the instructions comment
    async fn post_instructions_comment(&self, pr_number: u64) -> Result<()>;

    /// Bring the PR's review labels in line with its approval state
    ///
    /// Returns the modifications that were applied.
    async fn update_labels(
        &self,
        pr_number: u64,
        approved: bool,
        current_labels: &[String],
    ) -> Result<Vec<LabelModification>>;

    /// Merge the PR
    async fn merge(&self, pr_number: u64) -> Result<MergeResult>;
}

/// [`HostingClient`] backed by a platform service
///
/// PR authors are remembered from the last listing so the approval check
/// does not refetch each PR. Comments fetched by the approval check are
/// handed to the instructions check that follows it, then dropped.
pub struct ReviewBot {
    platform: Arc<dyn PlatformService>,
    approval: ApprovalPolicy,
    labels: LabelNames,
    instructions: String,
    merge_method: MergeMethod,
    authors: Mutex<HashMap<u64, Option<String>>>,
    comments: Mutex<HashMap<u64, Vec<PrComment>>>,
}

impl ReviewBot {
    /// Create a bot using the review policy from `config`
    pub fn new(platform: Arc<dyn PlatformService>, config: &BotConfig) -> Result<Self> {
        let approval = ApprovalPolicy::new(
            &config.review.approval_markers,
            config.review.reviews_needed,
        )?;

        Ok(Self {
            platform,
            approval,
            labels: config.labels.clone(),
            instructions: format!("{}\n\n{INSTRUCTIONS_MARKER}", config.rendered_instructions()),
            merge_method: config.review.merge_method,
            authors: Mutex::new(HashMap::new()),
            comments: Mutex::new(HashMap::new()),
        })
    }

    async fn author_of(&self, pr_number: u64) -> Result<Option<String>> {
        if let Some(author) = self.authors.lock().await.get(&pr_number) {
            return Ok(author.clone());
        }
        let author = self.platform.get_pr(pr_number).await?.author;
        self.authors.lock().await.insert(pr_number, author.clone());
        Ok(author)
    }
}

#[async_trait]
impl HostingClient for ReviewBot {
    async fn get_pull_requests(&self) -> Result<Vec<PullRequest>> {
        let prs = self.platform.list_open_prs().await?;
        *self.authors.lock().await = prs
            .iter()
            .map(|pr| (pr.number, pr.author.clone()))
            .collect();
        Ok(prs)
    }

    async fn check_for_label(&self, pr_number: u64) -> Result<LabelResult> {
        let labels = self.platform.list_pr_labels(pr_number).await?;
        let result = classify_labels(labels, &self.labels);
        debug!(
            pr_number,
            reviewed = result.labeled_reviewed,
            exclude = result.labeled_exclude,
            needs_review = result.labeled_needs_review,
            "classified labels"
        );
        Ok(result)
    }

    async fn check_for_approval_comments(&self, pr_number: u64) -> Result<bool> {
        let author = self.author_of(pr_number).await?;
        let comments = self.platform.list_pr_comments(pr_number).await?;

        let approvals = self.approval.count_approvals(&comments, author.as_deref());
        let approved = approvals >= self.approval.reviews_needed();
        debug!(
            pr_number,
            approvals,
            needed = self.approval.reviews_needed(),
            approved,
            "checked approval comments"
        );
        self.comments.lock().await.insert(pr_number, comments);
        Ok(approved)
    }

    async fn check_for_instructions_comment(&self, pr_number: u64) -> Result<bool> {
        let handed_off = self.comments.lock().await.remove(&pr_number);
        let comments = match handed_off {
            Some(comments) => comments,
            None => self.platform.list_pr_comments(pr_number).await?,
        };
        Ok(comments.iter().any(|c| is_instructions_comment(&c.body)))
    }

    async fn post_instructions_comment(&self, pr_number: u64) -> Result<()> {
        self.platform
            .create_pr_comment(pr_number, &self.instructions)
            .await?;
        info!(pr_number, "posted instructions comment");
        Ok(())
    }

    async fn update_labels(
        &self,
        pr_number: u64,
        approved: bool,
        current_labels: &[String],
    ) -> Result<Vec<LabelModification>> {
        let changes = plan_label_changes(approved, current_labels, &self.labels);
        if changes.is_empty() {
            debug!(pr_number, approved, "labels already up to date");
            return Ok(changes);
        }

        let mut additions = Vec::new();
        for change in &changes {
            match change {
                LabelModification::Remove(name) => {
                    self.platform.remove_pr_label(pr_number, name).await?;
                }
                LabelModification::Add(name) => additions.push(name.clone()),
            }
        }
        if !additions.is_empty() {
            self.platform.add_pr_labels(pr_number, &additions).await?;
        }

        info!(
            pr_number,
            approved,
            changes = %changes.iter().map(ToString::to_string).collect::<Vec<_>>().join(" "),
            "updated labels"
        );
        Ok(changes)
    }

    async fn merge(&self, pr_number: u64) -> Result<MergeResult> {
        let result = self.platform.merge_pr(pr_number, self.merge_method).await?;
        info!(pr_number, merged = result.merged, sha = ?result.sha, "merge requested");
        Ok(result)
    }
}
