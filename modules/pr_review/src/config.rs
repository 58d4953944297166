use anyhow::ensure;
use serde::{Deserialize, Serialize};

use crate::domain::service::MAX_REVIEWERS;

/// Configuration for the pr_review module (`modules.pr_review`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrReviewConfig {
    /// Upper bound of reviewers picked when a pull request is created, `1..=2`.
    #[serde(default = "default_max_reviewers")]
    pub max_reviewers: usize,
    /// Open Postgres transactions at SERIALIZABLE isolation. SQLite ignores it.
    #[serde(default = "default_serializable")]
    pub serializable_transactions: bool,
}

impl Default for PrReviewConfig {
    fn default() -> Self {
        Self {
            max_reviewers: default_max_reviewers(),
            serializable_transactions: default_serializable(),
        }
    }
}

impl PrReviewConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            (1..=MAX_REVIEWERS).contains(&self.max_reviewers),
            "pr_review.max_reviewers must be between 1 and {MAX_REVIEWERS}, got {}",
            self.max_reviewers
        );
        Ok(())
    }
}

fn default_max_reviewers() -> usize {
    MAX_REVIEWERS
}

fn default_serializable() -> bool {
    true
}
