//! Review planning - pure functions for deciding what to do with a PR
//!
//! No I/O happens here. The coordinator gathers label and comment state,
//! these functions turn it into a `ReviewPlan`, and `execute_review()`
//! carries the plan out.

use crate::types::LabelResult;

/// Why a PR was left alone before its comments were even read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Already carries the reviewed label
    AlreadyReviewed,
    /// Carries the exclude label
    Excluded,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyReviewed => write!(f, "already marked as reviewed"),
            Self::Excluded => write!(f, "labeled to be excluded from the bot"),
        }
    }
}

/// Options for review planning
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewOptions {
    /// Merge approved PRs
    pub merge_on_review: bool,
}

/// A single action to take on a PR
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewStep {
    /// Post the one-time instructions comment
    PostInstructions,
    /// Update review labels
    UpdateLabels {
        /// Approval state to apply
        approved: bool,
        /// Label names currently on the PR
        labels: Vec<String>,
    },
    /// Merge the PR
    Merge,
}

impl std::fmt::Display for ReviewStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PostInstructions => write!(f, "post instructions"),
            Self::UpdateLabels { approved, .. } => write!(f, "update labels (approved: {approved})"),
            Self::Merge => write!(f, "merge"),
        }
    }
}

/// What to do with one PR
#[derive(Debug, Clone)]
pub struct ReviewPlan {
    /// PR number
    pub pr_number: u64,
    /// Approval state the plan was built from
    pub approved: bool,
    /// Steps in execution order
    pub steps: Vec<ReviewStep>,
    /// Label and merge actions were held back because the PR is already
    /// marked as needing review and still lacks approval
    pub awaiting_review: bool,
}

impl ReviewPlan {
    /// Whether there is nothing to do
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether the plan merges the PR
    #[must_use]
    pub fn will_merge(&self) -> bool {
        self.steps.contains(&ReviewStep::Merge)
    }
}

/// Decide whether a PR is out of the bot's hands based on its labels alone
///
/// Reviewed wins over excluded when both labels are present.
#[must_use]
pub const fn gate(labels: &LabelResult) -> Option<SkipReason> {
    if labels.labeled_reviewed {
        Some(SkipReason::AlreadyReviewed)
    } else if labels.labeled_exclude {
        Some(SkipReason::Excluded)
    } else {
        None
    }
}

/// Create a review plan (PURE - no I/O, easily testable)
///
/// Expects a PR that passed [`gate`]. The instructions comment is planned
/// whenever it is known to be missing, independent of the needs-review
/// hold. `has_instructions` is `None` when the lookup failed; nothing is
/// posted then, and the remaining steps are planned as usual. Label update
/// and merge are held back for a PR already labeled needs-review that is
/// still unapproved.
#[must_use]
pub fn create_review_plan(
    pr_number: u64,
    labels: &LabelResult,
    approved: bool,
    has_instructions: Option<bool>,
    options: &ReviewOptions,
) -> ReviewPlan {
    let mut steps = Vec::new();

    if has_instructions == Some(false) {
        steps.push(ReviewStep::PostInstructions);
    }

    let awaiting_review = labels.labeled_needs_review && !approved;
    if !awaiting_review {
        steps.push(ReviewStep::UpdateLabels {
            approved,
            labels: labels.label_names(),
        });

        if approved && options.merge_on_review {
            steps.push(ReviewStep::Merge);
        }
    }

    ReviewPlan {
        pr_number,
        approved,
        steps,
        awaiting_review,
    }
}
