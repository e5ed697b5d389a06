//! Label classification and label update policy - pure functions

use crate::config::LabelNames;
use crate::types::{Label, LabelModification, LabelResult};

fn has_label<'a>(mut names: impl Iterator<Item = &'a str>, wanted: &str) -> bool {
    names.any(|n| n.eq_ignore_ascii_case(wanted))
}

/// Classify a PR's labels against the configured review labels
pub fn classify_labels(labels: Vec<Label>, names: &LabelNames) -> LabelResult {
    let check = |wanted: &str| has_label(labels.iter().map(|l| l.name.as_str()), wanted);

    LabelResult {
        labeled_reviewed: check(&names.reviewed),
        labeled_exclude: check(&names.exclude),
        labeled_needs_review: check(&names.needs_review),
        labels,
    }
}

/// Compute the label changes for a PR given its approval state
///
/// Approved PRs lose the needs-review label and gain the reviewed label;
/// unapproved PRs the reverse. Only changes against `current` are returned,
/// removals first.
pub fn plan_label_changes(
    approved: bool,
    current: &[String],
    names: &LabelNames,
) -> Vec<LabelModification> {
    let (add, remove) = if approved {
        (&names.reviewed, &names.needs_review)
    } else {
        (&names.needs_review, &names.reviewed)
    };

    let mut changes = Vec::new();
    // Remove using the PR's own spelling; platforms match case-insensitively
    if let Some(existing) = current.iter().find(|n| n.eq_ignore_ascii_case(remove)) {
        changes.push(LabelModification::Remove(existing.clone()));
    }
    if !has_label(current.iter().map(String::as_str), add) {
        changes.push(LabelModification::Add(add.clone()));
    }
    changes
}
