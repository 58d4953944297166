use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::contract::model::{PullRequest, PullRequestShort, Team, User};

/// Port for the domain layer: the transactional store the engines run against.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Open a unit of work. Every engine decision is made from reads issued
    /// through the returned handle, in the same transaction that writes.
    async fn begin(&self) -> anyhow::Result<Box<dyn ReviewTx>>;
}

/// One open transaction. Dropping it without `commit` rolls back.
#[async_trait]
pub trait ReviewTx: Send + Sync {
    async fn get_user(&self, id: &str) -> anyhow::Result<Option<User>>;

    /// Team with its members, or `None` if the name is unknown.
    async fn get_team(&self, name: &str) -> anyhow::Result<Option<Team>>;

    /// Full roster of a team, active or not, ordered by user id.
    async fn get_team_members(&self, team_name: &str) -> anyhow::Result<Vec<User>>;

    /// Pull request with its current reviewer set.
    async fn get_pull_request(&self, id: &str) -> anyhow::Result<Option<PullRequest>>;

    /// Same as `get_pull_request`, additionally locking the pull request row
    /// until the transaction ends where the engine supports row locks.
    async fn get_pull_request_for_update(&self, id: &str) -> anyhow::Result<Option<PullRequest>>;

    /// Pull requests on which the user is an assigned reviewer.
    async fn list_reviewer_assignments(&self, user_id: &str)
        -> anyhow::Result<Vec<PullRequestShort>>;

    async fn save_team(&self, name: &str) -> anyhow::Result<()>;

    /// Insert the user, or overwrite name, flag and team of an existing one.
    async fn upsert_user(&self, user: &User) -> anyhow::Result<()>;

    /// Returns false if the user does not exist.
    async fn set_user_active(&self, id: &str, is_active: bool) -> anyhow::Result<bool>;

    /// Insert the pull request row only; reviewers go through `save_reviewer_links`.
    async fn save_pull_request(&self, pr: &PullRequest) -> anyhow::Result<()>;

    async fn save_reviewer_links(&self, pr_id: &str, user_ids: &[String]) -> anyhow::Result<()>;

    /// Returns false if no such link existed.
    async fn remove_reviewer_link(&self, pr_id: &str, user_id: &str) -> anyhow::Result<bool>;

    async fn add_reviewer_link(&self, pr_id: &str, user_id: &str) -> anyhow::Result<()>;

    /// Conditional OPEN → MERGED transition. Returns false if the pull request
    /// was not OPEN (or does not exist).
    async fn mark_merged(&self, pr_id: &str, at: DateTime<Utc>) -> anyhow::Result<bool>;

    async fn commit(self: Box<Self>) -> anyhow::Result<()>;
}
