//! Mock platform service for testing
//!
//! Keeps an in-memory repository: open PRs, their labels and comments.
//! Label and comment writes mutate that state, so a second pass over the
//! same mock sees the first pass's effects.

use async_trait::async_trait;
use peer_review_bot::error::{Error, Result};
use peer_review_bot::platform::PlatformService;
use peer_review_bot::types::{
    Label, MergeMethod, MergeResult, PlatformConfig, PrComment, PullRequest,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Login the mock uses for comments it creates
pub const BOT_LOGIN: &str = "review-bot";

/// Call record for `merge_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePrCall {
    pub pr_number: u64,
    pub method: MergeMethod,
}

/// Simple mock platform service for testing
///
/// This manually implements `PlatformService` rather than using mockall,
/// because mockall has issues with methods returning references.
///
/// Features:
/// - In-memory PRs, labels and comments
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: PlatformConfig,
    next_comment_id: AtomicU64,
    prs: Mutex<Vec<PullRequest>>,
    labels: Mutex<HashMap<u64, Vec<Label>>>,
    comments: Mutex<HashMap<u64, Vec<PrComment>>>,
    merge_responses: Mutex<HashMap<u64, MergeResult>>,
    // Call tracking
    added_labels: Mutex<Vec<(u64, Vec<String>)>>,
    removed_labels: Mutex<Vec<(u64, String)>>,
    created_comments: Mutex<Vec<(u64, String)>>,
    merge_pr_calls: Mutex<Vec<MergePrCall>>,
    get_pr_calls: Mutex<Vec<u64>>,
    list_comments_calls: Mutex<Vec<u64>>,
    // Error injection
    error_on_list_prs: Mutex<Option<String>>,
    error_on_add_labels: Mutex<Option<String>>,
    error_on_merge_pr: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            next_comment_id: AtomicU64::new(1000),
            prs: Mutex::new(Vec::new()),
            labels: Mutex::new(HashMap::new()),
            comments: Mutex::new(HashMap::new()),
            merge_responses: Mutex::new(HashMap::new()),
            added_labels: Mutex::new(Vec::new()),
            removed_labels: Mutex::new(Vec::new()),
            created_comments: Mutex::new(Vec::new()),
            merge_pr_calls: Mutex::new(Vec::new()),
            get_pr_calls: Mutex::new(Vec::new()),
            list_comments_calls: Mutex::new(Vec::new()),
            error_on_list_prs: Mutex::new(None),
            error_on_add_labels: Mutex::new(None),
            error_on_merge_pr: Mutex::new(None),
        }
    }

    // === Setup methods ===

    /// Add an open PR with the given labels
    pub fn add_pr(&self, pr: PullRequest, labels: Vec<Label>) {
        self.labels.lock().unwrap().insert(pr.number, labels);
        self.prs.lock().unwrap().push(pr);
    }

    /// Set the comments on a PR
    pub fn set_comments(&self, pr_number: u64, comments: Vec<PrComment>) {
        self.comments.lock().unwrap().insert(pr_number, comments);
    }

    /// Set the response for `merge_pr` for a specific PR
    pub fn set_merge_response(&self, pr_number: u64, result: MergeResult) {
        self.merge_responses
            .lock()
            .unwrap()
            .insert(pr_number, result);
    }

    // === Error injection methods ===

    /// Make `list_open_prs` return an error
    pub fn fail_list_prs(&self, msg: &str) {
        *self.error_on_list_prs.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `add_pr_labels` return an error
    pub fn fail_add_labels(&self, msg: &str) {
        *self.error_on_add_labels.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `merge_pr` return an error
    pub fn fail_merge_pr(&self, msg: &str) {
        *self.error_on_merge_pr.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    /// Current label names on a PR
    pub fn label_names(&self, pr_number: u64) -> Vec<String> {
        self.labels
            .lock()
            .unwrap()
            .get(&pr_number)
            .map(|ls| ls.iter().map(|l| l.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Current comments on a PR
    pub fn list_comments_snapshot(&self, pr_number: u64) -> Vec<PrComment> {
        self.comments
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .unwrap_or_default()
    }

    /// All `add_pr_labels` calls
    pub fn get_added_labels(&self) -> Vec<(u64, Vec<String>)> {
        self.added_labels.lock().unwrap().clone()
    }

    /// All `remove_pr_label` calls
    pub fn get_removed_labels(&self) -> Vec<(u64, String)> {
        self.removed_labels.lock().unwrap().clone()
    }

    /// All `create_pr_comment` calls
    pub fn get_created_comments(&self) -> Vec<(u64, String)> {
        self.created_comments.lock().unwrap().clone()
    }

    /// All `merge_pr` calls
    /// PR numbers passed to `get_pr`, in call order
    pub fn get_pr_calls(&self) -> Vec<u64> {
        self.get_pr_calls.lock().unwrap().clone()
    }

    /// PR numbers passed to `list_pr_comments`, in call order
    pub fn list_comments_calls(&self) -> Vec<u64> {
        self.list_comments_calls.lock().unwrap().clone()
    }

    pub fn get_merge_pr_calls(&self) -> Vec<MergePrCall> {
        self.merge_pr_calls.lock().unwrap().clone()
    }

    /// Assert that `merge_pr` was called for a specific PR
    pub fn assert_merge_called(&self, pr_number: u64) {
        let calls = self.get_merge_pr_calls();
        assert!(
            calls.iter().any(|c| c.pr_number == pr_number),
            "Expected merge_pr({pr_number}) but got: {calls:?}"
        );
    }

    /// Assert that `merge_pr` was NOT called for a specific PR
    pub fn assert_merge_not_called(&self, pr_number: u64) {
        let calls = self.get_merge_pr_calls();
        assert!(
            !calls.iter().any(|c| c.pr_number == pr_number),
            "Expected merge_pr({pr_number}) NOT to be called but it was: {calls:?}"
        );
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn list_open_prs(&self) -> Result<Vec<PullRequest>> {
        if let Some(msg) = self.error_on_list_prs.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }
        Ok(self.prs.lock().unwrap().clone())
    }

    async fn get_pr(&self, pr_number: u64) -> Result<PullRequest> {
        self.get_pr_calls.lock().unwrap().push(pr_number);
        self.prs
            .lock()
            .unwrap()
            .iter()
            .find(|pr| pr.number == pr_number)
            .cloned()
            .ok_or_else(|| Error::Platform(format!("get_pr: no PR #{pr_number}")))
    }

    async fn list_pr_labels(&self, pr_number: u64) -> Result<Vec<Label>> {
        Ok(self
            .labels
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_pr_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        self.added_labels
            .lock()
            .unwrap()
            .push((pr_number, labels.to_vec()));

        if let Some(msg) = self.error_on_add_labels.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        let mut all = self.labels.lock().unwrap();
        let current = all.entry(pr_number).or_default();
        current.extend(labels.iter().map(Label::named));
        Ok(())
    }

    async fn remove_pr_label(&self, pr_number: u64, label: &str) -> Result<()> {
        self.removed_labels
            .lock()
            .unwrap()
            .push((pr_number, label.to_string()));

        let mut all = self.labels.lock().unwrap();
        if let Some(current) = all.get_mut(&pr_number) {
            current.retain(|l| l.name != label);
        }
        Ok(())
    }

    async fn list_pr_comments(&self, pr_number: u64) -> Result<Vec<PrComment>> {
        self.list_comments_calls.lock().unwrap().push(pr_number);
        Ok(self
            .comments
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        self.created_comments
            .lock()
            .unwrap()
            .push((pr_number, body.to_string()));

        let id = self.next_comment_id.fetch_add(1, Ordering::SeqCst);
        self.comments
            .lock()
            .unwrap()
            .entry(pr_number)
            .or_default()
            .push(PrComment {
                id,
                author: Some(BOT_LOGIN.to_string()),
                body: body.to_string(),
            });
        Ok(())
    }

    async fn merge_pr(&self, pr_number: u64, method: MergeMethod) -> Result<MergeResult> {
        self.merge_pr_calls
            .lock()
            .unwrap()
            .push(MergePrCall { pr_number, method });

        if let Some(msg) = self.error_on_merge_pr.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        Ok(self
            .merge_responses
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .unwrap_or(MergeResult {
                merged: true,
                sha: Some(format!("merged_sha_{pr_number}")),
                message: None,
            }))
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
