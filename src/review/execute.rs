//! Review execution - effectful operations
//!
//! Takes a `ReviewPlan` and performs its steps through the hosting client.
//! Steps are independent: a failing step is recorded and the remaining
//! steps still run.

use crate::bot::HostingClient;
use crate::review::plan::{ReviewPlan, ReviewStep};
use crate::types::LabelModification;
use tracing::warn;

/// A step that failed
#[derive(Debug, Clone)]
pub struct StepFailure {
    /// The step that failed
    pub step: ReviewStep,
    /// Error message
    pub error: String,
}

/// Result of executing a review plan
#[derive(Debug, Clone, Default)]
pub struct ReviewOutcome {
    /// PR number
    pub pr_number: u64,
    /// Human-readable record of what was done
    pub messages: Vec<String>,
    /// Whether the instructions comment was posted
    pub posted_instructions: bool,
    /// Label modifications applied
    pub label_changes: Vec<LabelModification>,
    /// `Some(merged)` when a merge was attempted and answered
    pub merged: Option<bool>,
    /// Steps that failed
    pub failures: Vec<StepFailure>,
}

impl ReviewOutcome {
    /// Check if every step succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.merged != Some(false)
    }

    /// Record a failed step and its message
    pub(crate) fn record_failure(&mut self, step: &ReviewStep, error: impl ToString) {
        let error = error.to_string();
        warn!(pr_number = self.pr_number, %step, %error, "review step failed");
        self.messages
            .push(format!("Failed to {step} for PR {}: {error}", self.pr_number));
        self.failures.push(StepFailure {
            step: step.clone(),
            error,
        });
    }
}

/// Execute the review plan (EFFECTFUL)
pub async fn execute_review(plan: &ReviewPlan, client: &dyn HostingClient) -> ReviewOutcome {
    let pr_number = plan.pr_number;
    let mut outcome = ReviewOutcome {
        pr_number,
        ..ReviewOutcome::default()
    };

    for step in &plan.steps {
        match step {
            ReviewStep::PostInstructions => {
                outcome
                    .messages
                    .push(format!("Posting instructions comment on PR {pr_number}"));
                match client.post_instructions_comment(pr_number).await {
                    Ok(()) => outcome.posted_instructions = true,
                    Err(e) => outcome.record_failure(step, e),
                }
            }
            ReviewStep::UpdateLabels { approved, labels } => {
                outcome
                    .messages
                    .push(format!("Updating labels for PR {pr_number}"));
                match client.update_labels(pr_number, *approved, labels).await {
                    Ok(changes) => outcome.label_changes = changes,
                    Err(e) => outcome.record_failure(step, e),
                }
            }
            ReviewStep::Merge => {
                outcome
                    .messages
                    .push("Merging on review set to true, PR approved, merging".to_string());
                match client.merge(pr_number).await {
                    Ok(result) if result.merged => outcome.merged = Some(true),
                    Ok(result) => {
                        let reason = result.message.as_deref().unwrap_or("no reason given");
                        warn!(pr_number, reason, "merge was not performed");
                        outcome
                            .messages
                            .push(format!("PR {pr_number} was not merged: {reason}"));
                        outcome.merged = Some(false);
                    }
                    Err(e) => outcome.record_failure(step, e),
                }
            }
        }
    }

    outcome
}
