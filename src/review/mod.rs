//! Review coordinator
//!
//! Three-phase pattern per PR:
//! 1. Gather - label classification, approval and instructions state (effectful)
//! 2. Plan - `gate()` and `create_review_plan()` (pure, testable)
//! 3. Execute - `execute_review()` (effectful)
//!
//! Each PR runs as its own task; nothing is shared between them except the
//! hosting client.

mod execute;
mod plan;

pub use execute::{ReviewOutcome, StepFailure, execute_review};
pub use plan::{ReviewOptions, ReviewPlan, ReviewStep, SkipReason, create_review_plan, gate};

use crate::bot::HostingClient;
use crate::error::Result;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// What happened to one PR during a scan
#[derive(Debug, Clone)]
pub enum PrOutcome {
    /// Stopped at the label gate
    Skipped {
        /// PR number
        pr_number: u64,
        /// Why
        reason: SkipReason,
    },
    /// Plan was built and executed
    Reviewed {
        /// The plan that ran
        plan: ReviewPlan,
        /// What came of it
        outcome: ReviewOutcome,
    },
    /// Gathering state failed before a plan existed
    Failed {
        /// PR number
        pr_number: u64,
        /// Error message
        error: String,
    },
}

impl PrOutcome {
    /// PR number this outcome belongs to
    pub const fn pr_number(&self) -> u64 {
        match self {
            Self::Skipped { pr_number, .. } | Self::Failed { pr_number, .. } => *pr_number,
            Self::Reviewed { plan, .. } => plan.pr_number,
        }
    }

    /// Human-readable messages describing the outcome
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Skipped { pr_number, reason } => {
                vec![format!("PR {pr_number} {reason}, stopping")]
            }
            Self::Reviewed { plan, outcome } => {
                let mut messages = outcome.messages.clone();
                if plan.awaiting_review {
                    messages.push(format!(
                        "PR {} already marked as needing review, stopping",
                        plan.pr_number
                    ));
                }
                messages
            }
            Self::Failed { pr_number, error } => {
                vec![format!("Failed to process PR {pr_number}: {error}")]
            }
        }
    }
}

/// Runs the review procedure over all open PRs
pub struct Coordinator {
    client: Arc<dyn HostingClient>,
    options: ReviewOptions,
}

impl Coordinator {
    /// Create a coordinator over a hosting client
    pub fn new(client: Arc<dyn HostingClient>, options: ReviewOptions) -> Self {
        Self { client, options }
    }

    /// Planning options in effect
    pub const fn options(&self) -> &ReviewOptions {
        &self.options
    }

    /// List open PRs and start one review task per PR
    ///
    /// Returns as soon as the tasks are spawned. Only listing the PRs can
    /// fail here; per-PR failures end up in each task's [`PrOutcome`].
    pub async fn scan(&self) -> Result<ScanHandle> {
        let pull_requests = self.client.get_pull_requests().await?;
        let mut tasks = JoinSet::new();

        for pr in &pull_requests {
            let client = Arc::clone(&self.client);
            let options = self.options;
            let pr_number = pr.number;
            tasks.spawn(async move { process_pull_request(client.as_ref(), pr_number, &options).await });
        }

        info!(count = pull_requests.len(), "processing pull requests");
        Ok(ScanHandle {
            pr_count: pull_requests.len(),
            tasks,
        })
    }
}

/// Run the full decision procedure for one PR
pub async fn process_pull_request(
    client: &dyn HostingClient,
    pr_number: u64,
    options: &ReviewOptions,
) -> PrOutcome {
    match review_pull_request(client, pr_number, options).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(pr_number, error = %e, "failed to process PR");
            PrOutcome::Failed {
                pr_number,
                error: e.to_string(),
            }
        }
    }
}

async fn review_pull_request(
    client: &dyn HostingClient,
    pr_number: u64,
    options: &ReviewOptions,
) -> Result<PrOutcome> {
    let labels = client.check_for_label(pr_number).await?;

    if let Some(reason) = gate(&labels) {
        debug!(pr_number, %reason, "stopping");
        return Ok(PrOutcome::Skipped { pr_number, reason });
    }

    let approved = client.check_for_approval_comments(pr_number).await?;

    // A failed lookup only rules out posting; labels and merge still go ahead
    let (has_instructions, instructions_error) =
        match client.check_for_instructions_comment(pr_number).await {
            Ok(found) => {
                if !found {
                    debug!(pr_number, "no instructions comment found");
                }
                (Some(found), None)
            }
            Err(e) => (None, Some(e)),
        };

    let plan = create_review_plan(pr_number, &labels, approved, has_instructions, options);
    if plan.awaiting_review {
        debug!(pr_number, "already marked as needing review, stopping");
    }

    let mut outcome = execute_review(&plan, client).await;
    if let Some(e) = instructions_error {
        outcome.record_failure(
            &ReviewStep::PostInstructions,
            format!("could not check for an existing instructions comment: {e}"),
        );
    }
    Ok(PrOutcome::Reviewed { plan, outcome })
}

/// Spawned per-PR review tasks from one scan
pub struct ScanHandle {
    pr_count: usize,
    tasks: JoinSet<PrOutcome>,
}

impl ScanHandle {
    /// Number of PRs being processed
    pub const fn pr_count(&self) -> usize {
        self.pr_count
    }

    /// The acknowledgement sent to whoever triggered the scan
    pub fn message(&self) -> String {
        format!("Processing {} PRs.", self.pr_count)
    }

    /// Wait for every PR to finish, in completion order
    pub async fn join_all(mut self) -> Vec<PrOutcome> {
        let mut outcomes = Vec::with_capacity(self.pr_count);
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => warn!(error = %e, "review task did not complete"),
            }
        }
        outcomes
    }

    /// Let the tasks finish in the background, logging each outcome
    pub fn detach(mut self) {
        tokio::spawn(async move {
            while let Some(joined) = self.tasks.join_next().await {
                match joined {
                    Ok(outcome) => log_outcome(&outcome),
                    Err(e) => warn!(error = %e, "review task did not complete"),
                }
            }
        });
    }
}

/// Emit a log line for a finished PR
pub fn log_outcome(outcome: &PrOutcome) {
    match outcome {
        PrOutcome::Skipped { pr_number, reason } => debug!(pr_number, %reason, "PR skipped"),
        PrOutcome::Reviewed { plan, outcome } if outcome.is_success() => info!(
            pr_number = plan.pr_number,
            approved = plan.approved,
            steps = plan.steps.len(),
            "PR processed"
        ),
        PrOutcome::Reviewed { plan, outcome } => warn!(
            pr_number = plan.pr_number,
            failures = outcome.failures.len(),
            merged = ?outcome.merged,
            "PR processed with errors"
        ),
        PrOutcome::Failed { pr_number, error } => warn!(pr_number, %error, "PR failed"),
    }
}
