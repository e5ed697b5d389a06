//! Approval detection - pure functions over PR comments

use crate::bot::is_instructions_comment;
use crate::error::{Error, Result};
use crate::types::PrComment;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

/// Decides whether a PR's comments amount to approval
#[derive(Debug, Clone)]
pub struct ApprovalPolicy {
    markers: Regex,
    reviews_needed: usize,
}

impl ApprovalPolicy {
    /// Build a policy from literal marker strings
    ///
    /// Markers are matched as literal text, case-insensitively, anywhere in
    /// the comment body. Blank markers are ignored.
    pub fn new(markers: &[String], reviews_needed: usize) -> Result<Self> {
        let alternation = markers
            .iter()
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|");

        if alternation.is_empty() {
            return Err(Error::Config("no approval markers configured".into()));
        }

        let markers = RegexBuilder::new(&alternation)
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::Config(format!("invalid approval marker: {e}")))?;

        Ok(Self {
            markers,
            reviews_needed: reviews_needed.max(1),
        })
    }

    /// Whether a single comment body signals approval
    pub fn is_approval(&self, body: &str) -> bool {
        self.markers.is_match(body)
    }

    /// Count distinct approving reviewers
    ///
    /// Comments by `pr_author` and bot instructions comments never count.
    /// Comments without a known author count individually.
    pub fn count_approvals(&self, comments: &[PrComment], pr_author: Option<&str>) -> usize {
        let mut reviewers = HashSet::new();
        let mut anonymous = 0;

        for comment in comments {
            if is_instructions_comment(&comment.body) || !self.is_approval(&comment.body) {
                continue;
            }
            match comment.author.as_deref() {
                Some(author) if pr_author.is_some_and(|a| a.eq_ignore_ascii_case(author)) => {}
                Some(author) => {
                    reviewers.insert(author.to_ascii_lowercase());
                }
                None => anonymous += 1,
            }
        }

        reviewers.len() + anonymous
    }

    /// Whether the comments reach the required number of approvals
    pub fn is_approved(&self, comments: &[PrComment], pr_author: Option<&str>) -> bool {
        self.count_approvals(comments, pr_author) >= self.reviews_needed
    }

    /// Approvals required
    pub const fn reviews_needed(&self) -> usize {
        self.reviews_needed
    }
}
