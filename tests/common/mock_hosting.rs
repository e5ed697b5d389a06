//! Mock hosting client for coordinator tests
//!
//! Answers the coordinator's questions from per-PR fixtures and records
//! every call in order, so tests can assert exactly which collaborator
//! operations a PR triggered.

use async_trait::async_trait;
use peer_review_bot::bot::HostingClient;
use peer_review_bot::error::{Error, Result};
use peer_review_bot::types::{LabelModification, LabelResult, MergeResult, PullRequest};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// A recorded call to the hosting client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostingCall {
    CheckForLabel(u64),
    CheckForApproval(u64),
    CheckForInstructions(u64),
    PostInstructions(u64),
    UpdateLabels {
        pr_number: u64,
        approved: bool,
        labels: Vec<String>,
    },
    Merge(u64),
}

impl HostingCall {
    fn pr_number(&self) -> u64 {
        match self {
            Self::CheckForLabel(n)
            | Self::CheckForApproval(n)
            | Self::CheckForInstructions(n)
            | Self::PostInstructions(n)
            | Self::Merge(n) => *n,
            Self::UpdateLabels { pr_number, .. } => *pr_number,
        }
    }
}

#[derive(Default)]
struct Fixture {
    labels: LabelResult,
    approved: bool,
    has_instructions: bool,
}

/// Hosting client with scripted answers
#[derive(Default)]
pub struct MockHostingClient {
    prs: Mutex<Vec<PullRequest>>,
    fixtures: Mutex<HashMap<u64, Fixture>>,
    calls: Mutex<Vec<HostingCall>>,
    // Error injection
    error_on_list: Mutex<Option<String>>,
    failing_label_checks: Mutex<HashSet<u64>>,
    failing_instruction_checks: Mutex<HashSet<u64>>,
    failing_posts: Mutex<HashSet<u64>>,
    failing_label_updates: Mutex<HashSet<u64>>,
    unmerged: Mutex<HashMap<u64, String>>,
}

impl MockHostingClient {
    pub fn new() -> Self {
        Self::default()
    }

    // === Setup methods ===

    /// Add an open PR with its label state, approval and instructions state
    pub fn add_pr(&self, pr: PullRequest, labels: LabelResult, approved: bool, has_instructions: bool) {
        self.fixtures.lock().unwrap().insert(
            pr.number,
            Fixture {
                labels,
                approved,
                has_instructions,
            },
        );
        self.prs.lock().unwrap().push(pr);
    }

    // === Error injection methods ===

    pub fn fail_list(&self, msg: &str) {
        *self.error_on_list.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_label_check(&self, pr_number: u64) {
        self.failing_label_checks.lock().unwrap().insert(pr_number);
    }

    pub fn fail_instructions_check(&self, pr_number: u64) {
        self.failing_instruction_checks
            .lock()
            .unwrap()
            .insert(pr_number);
    }

    pub fn fail_post_instructions(&self, pr_number: u64) {
        self.failing_posts.lock().unwrap().insert(pr_number);
    }

    pub fn fail_update_labels(&self, pr_number: u64) {
        self.failing_label_updates.lock().unwrap().insert(pr_number);
    }

    /// Make `merge` answer with `merged: false`
    pub fn refuse_merge(&self, pr_number: u64, reason: &str) {
        self.unmerged
            .lock()
            .unwrap()
            .insert(pr_number, reason.to_string());
    }

    // === Call verification methods ===

    pub fn calls(&self) -> Vec<HostingCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls for one PR, in order
    pub fn calls_for(&self, pr_number: u64) -> Vec<HostingCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.pr_number() == pr_number)
            .collect()
    }

    fn record(&self, call: HostingCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn with_fixture<T>(&self, pr_number: u64, f: impl FnOnce(&Fixture) -> T) -> Result<T> {
        self.fixtures
            .lock()
            .unwrap()
            .get(&pr_number)
            .map(f)
            .ok_or_else(|| Error::Platform(format!("no fixture for PR #{pr_number}")))
    }
}

#[async_trait]
impl HostingClient for MockHostingClient {
    async fn get_pull_requests(&self) -> Result<Vec<PullRequest>> {
        if let Some(msg) = self.error_on_list.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }
        Ok(self.prs.lock().unwrap().clone())
    }

    async fn check_for_label(&self, pr_number: u64) -> Result<LabelResult> {
        self.record(HostingCall::CheckForLabel(pr_number));
        if self.failing_label_checks.lock().unwrap().contains(&pr_number) {
            return Err(Error::Platform("label lookup failed".into()));
        }
        self.with_fixture(pr_number, |f| f.labels.clone())
    }

    async fn check_for_approval_comments(&self, pr_number: u64) -> Result<bool> {
        self.record(HostingCall::CheckForApproval(pr_number));
        self.with_fixture(pr_number, |f| f.approved)
    }

    async fn check_for_instructions_comment(&self, pr_number: u64) -> Result<bool> {
        self.record(HostingCall::CheckForInstructions(pr_number));
        if self
            .failing_instruction_checks
            .lock()
            .unwrap()
            .contains(&pr_number)
        {
            return Err(Error::Platform("comment listing failed".into()));
        }
        self.with_fixture(pr_number, |f| f.has_instructions)
    }

    async fn post_instructions_comment(&self, pr_number: u64) -> Result<()> {
        self.record(HostingCall::PostInstructions(pr_number));
        if self.failing_posts.lock().unwrap().contains(&pr_number) {
            return Err(Error::Platform("comment rejected".into()));
        }
        Ok(())
    }

    async fn update_labels(
        &self,
        pr_number: u64,
        approved: bool,
        current_labels: &[String],
    ) -> Result<Vec<LabelModification>> {
        self.record(HostingCall::UpdateLabels {
            pr_number,
            approved,
            labels: current_labels.to_vec(),
        });
        if self.failing_label_updates.lock().unwrap().contains(&pr_number) {
            return Err(Error::Platform("label update failed".into()));
        }
        let name = if approved { "peer-reviewed" } else { "needs-peer-review" };
        Ok(vec![LabelModification::Add(name.to_string())])
    }

    async fn merge(&self, pr_number: u64) -> Result<MergeResult> {
        self.record(HostingCall::Merge(pr_number));
        let refused = self.unmerged.lock().unwrap().get(&pr_number).cloned();
        Ok(match refused {
            Some(reason) => MergeResult {
                merged: false,
                sha: None,
                message: Some(reason),
            },
            None => MergeResult {
                merged: true,
                sha: Some(format!("sha{pr_number}")),
                message: None,
            },
        })
    }
}
