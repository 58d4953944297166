use async_trait::async_trait;

use crate::contract::{
    error::PrReviewError,
    model::{PullRequest, PullRequestShort, Team, User},
};

/// Public API of the pr_review module for in-process consumers.
#[async_trait]
pub trait PrReviewApi: Send + Sync {
    /// Create a team and upsert its members into it.
    async fn create_team(&self, team: Team) -> Result<Team, PrReviewError>;

    async fn get_team(&self, name: &str) -> Result<Team, PrReviewError>;

    async fn set_user_active(&self, user_id: &str, is_active: bool)
        -> Result<User, PrReviewError>;

    /// Pull requests the user currently reviews.
    async fn get_user_reviews(&self, user_id: &str)
        -> Result<Vec<PullRequestShort>, PrReviewError>;

    /// Create a pull request with up to the configured number of reviewers.
    async fn create_pull_request(
        &self,
        id: &str,
        name: &str,
        author_id: &str,
    ) -> Result<PullRequest, PrReviewError>;

    async fn merge_pull_request(&self, id: &str) -> Result<PullRequest, PrReviewError>;

    /// Replace one reviewer; returns the refreshed pull request and the new reviewer id.
    async fn reassign_reviewer(
        &self,
        pr_id: &str,
        old_user_id: &str,
    ) -> Result<(PullRequest, String), PrReviewError>;
}
