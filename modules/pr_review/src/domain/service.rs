use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, instrument};

use crate::contract::model::{
    PullRequest, PullRequestShort, PullRequestStatus, Team, User,
};
use crate::domain::error::DomainError;
use crate::domain::repo::{ReviewRepository, ReviewTx};
use crate::domain::selector::{self, Exclusion};

/// Reviewer assignment and reassignment engines plus the team/user plumbing
/// around them. Stateless apart from the repository handle; safe to share.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn ReviewRepository>,
    config: ServiceConfig,
}

/// Hard ceiling on reviewers assigned at creation.
pub const MAX_REVIEWERS: usize = 2;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Clamped to `MAX_REVIEWERS`.
    pub max_reviewers: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_reviewers: MAX_REVIEWERS,
        }
    }
}

fn storage(e: anyhow::Error) -> DomainError {
    DomainError::storage(e)
}

/// Timestamps are kept at microsecond precision, the finest both stores keep.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

impl Service {
    pub fn new(repo: Arc<dyn ReviewRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    async fn begin(&self) -> Result<Box<dyn ReviewTx>, DomainError> {
        self.repo.begin().await.map_err(storage)
    }

    /// Team roster of `user`; a user outside any team has nobody to pick from.
    async fn roster_of(tx: &dyn ReviewTx, user: &User) -> Result<Vec<User>, DomainError> {
        match &user.team_name {
            Some(team) => tx.get_team_members(team).await.map_err(storage),
            None => Ok(Vec::new()),
        }
    }

    #[instrument(
        name = "pr_review.service.create_pull_request",
        skip(self),
        fields(pr_id = %id, author_id = %author_id)
    )]
    pub async fn create_pull_request(
        &self,
        id: &str,
        name: &str,
        author_id: &str,
    ) -> Result<PullRequest, DomainError> {
        debug!("Creating pull request");
        let tx = self.begin().await?;

        let author = tx
            .get_user(author_id)
            .await
            .map_err(storage)?
            .ok_or_else(|| DomainError::user_not_found(author_id))?;

        if tx.get_pull_request(id).await.map_err(storage)?.is_some() {
            return Err(DomainError::pull_request_exists(id));
        }

        let roster = Self::roster_of(&*tx, &author).await?;
        let mut reviewers = {
            let candidates = selector::eligible(&roster, Exclusion::author_only(&author.id));
            debug!(eligible = candidates.len(), "selecting reviewers");
            let mut rng = StdRng::from_os_rng();
            selector::pick(
                &candidates,
                self.config.max_reviewers.min(MAX_REVIEWERS),
                &mut rng,
            )
        };
        reviewers.sort();

        let pr = PullRequest {
            id: id.to_string(),
            name: name.to_string(),
            author_id: author.id,
            status: PullRequestStatus::Open,
            assigned_reviewers: reviewers,
            created_at: now(),
            merged_at: None,
        };

        tx.save_pull_request(&pr).await.map_err(storage)?;
        tx.save_reviewer_links(&pr.id, &pr.assigned_reviewers)
            .await
            .map_err(storage)?;
        tx.commit().await.map_err(storage)?;

        info!(reviewers = ?pr.assigned_reviewers, "pull request created");
        Ok(pr)
    }

    #[instrument(
        name = "pr_review.service.reassign_reviewer",
        skip(self),
        fields(pr_id = %pr_id, old_user_id = %old_user_id)
    )]
    pub async fn reassign_reviewer(
        &self,
        pr_id: &str,
        old_user_id: &str,
    ) -> Result<(PullRequest, String), DomainError> {
        debug!("Reassigning reviewer");
        let tx = self.begin().await?;

        let pr = tx
            .get_pull_request_for_update(pr_id)
            .await
            .map_err(storage)?
            .ok_or_else(|| DomainError::pull_request_not_found(pr_id))?;
        if pr.is_merged() {
            return Err(DomainError::pull_request_merged(pr_id));
        }
        if !pr.has_reviewer(old_user_id) {
            return Err(DomainError::reviewer_not_assigned(pr_id, old_user_id));
        }

        let old = tx
            .get_user(old_user_id)
            .await
            .map_err(storage)?
            .ok_or_else(|| DomainError::user_not_found(old_user_id))?;
        let roster = Self::roster_of(&*tx, &old).await?;

        let replacement = {
            let candidates = selector::eligible(
                &roster,
                Exclusion {
                    author_id: &pr.author_id,
                    assigned: &pr.assigned_reviewers,
                },
            );
            debug!(eligible = candidates.len(), "selecting replacement");
            let mut rng = StdRng::from_os_rng();
            selector::pick_one(&candidates, &mut rng)
        }
        .ok_or_else(|| DomainError::no_candidates(pr_id))?;

        if !tx
            .remove_reviewer_link(pr_id, old_user_id)
            .await
            .map_err(storage)?
        {
            // link vanished between the read and the delete
            return Err(DomainError::reviewer_not_assigned(pr_id, old_user_id));
        }
        tx.add_reviewer_link(pr_id, &replacement)
            .await
            .map_err(storage)?;

        let refreshed = tx
            .get_pull_request(pr_id)
            .await
            .map_err(storage)?
            .ok_or_else(|| DomainError::pull_request_not_found(pr_id))?;
        tx.commit().await.map_err(storage)?;

        info!(replaced_by = %replacement, "reviewer reassigned");
        Ok((refreshed, replacement))
    }

    /// OPEN → MERGED. Merging an already merged pull request returns it unchanged.
    #[instrument(name = "pr_review.service.merge_pull_request", skip(self), fields(pr_id = %id))]
    pub async fn merge_pull_request(&self, id: &str) -> Result<PullRequest, DomainError> {
        debug!("Merging pull request");
        let tx = self.begin().await?;

        let pr = tx
            .get_pull_request_for_update(id)
            .await
            .map_err(storage)?
            .ok_or_else(|| DomainError::pull_request_not_found(id))?;
        if pr.is_merged() {
            debug!("already merged");
            tx.commit().await.map_err(storage)?;
            return Ok(pr);
        }

        if !tx.mark_merged(id, now()).await.map_err(storage)? {
            debug!("merged by a concurrent writer");
        }
        let merged = tx
            .get_pull_request(id)
            .await
            .map_err(storage)?
            .ok_or_else(|| DomainError::pull_request_not_found(id))?;
        if !merged.is_merged() {
            return Err(storage(anyhow::anyhow!(
                "pull request {id} still open after merge"
            )));
        }
        tx.commit().await.map_err(storage)?;

        info!("pull request merged");
        Ok(merged)
    }

    #[instrument(
        name = "pr_review.service.create_team",
        skip(self, team),
        fields(team_name = %team.name, members = team.members.len())
    )]
    pub async fn create_team(&self, team: Team) -> Result<Team, DomainError> {
        debug!("Creating team");
        let tx = self.begin().await?;

        if tx.get_team(&team.name).await.map_err(storage)?.is_some() {
            return Err(DomainError::team_exists(team.name));
        }
        tx.save_team(&team.name).await.map_err(storage)?;
        for m in &team.members {
            let user = User {
                id: m.user_id.clone(),
                username: m.username.clone(),
                is_active: m.is_active,
                team_name: Some(team.name.clone()),
            };
            tx.upsert_user(&user).await.map_err(storage)?;
        }

        let created = tx
            .get_team(&team.name)
            .await
            .map_err(storage)?
            .ok_or_else(|| DomainError::team_not_found(&team.name))?;
        tx.commit().await.map_err(storage)?;

        info!("team created");
        Ok(created)
    }

    #[instrument(name = "pr_review.service.get_team", skip(self), fields(team_name = %name))]
    pub async fn get_team(&self, name: &str) -> Result<Team, DomainError> {
        debug!("Getting team by name");
        let tx = self.begin().await?;
        let team = tx
            .get_team(name)
            .await
            .map_err(storage)?
            .ok_or_else(|| DomainError::team_not_found(name))?;
        tx.commit().await.map_err(storage)?;
        Ok(team)
    }

    /// Flips the flag only. Existing reviewer links of a deactivated user stay.
    #[instrument(
        name = "pr_review.service.set_user_active",
        skip(self),
        fields(user_id = %user_id)
    )]
    pub async fn set_user_active(&self, user_id: &str, is_active: bool) -> Result<User, DomainError> {
        debug!(is_active, "Setting user activity");
        let tx = self.begin().await?;
        if !tx
            .set_user_active(user_id, is_active)
            .await
            .map_err(storage)?
        {
            return Err(DomainError::user_not_found(user_id));
        }
        let user = tx
            .get_user(user_id)
            .await
            .map_err(storage)?
            .ok_or_else(|| DomainError::user_not_found(user_id))?;
        tx.commit().await.map_err(storage)?;
        Ok(user)
    }

    /// Unknown users simply review nothing.
    #[instrument(name = "pr_review.service.get_user_reviews", skip(self), fields(user_id = %user_id))]
    pub async fn get_user_reviews(&self, user_id: &str) -> Result<Vec<PullRequestShort>, DomainError> {
        debug!("Listing review assignments");
        let tx = self.begin().await?;
        let prs = tx
            .list_reviewer_assignments(user_id)
            .await
            .map_err(storage)?;
        tx.commit().await.map_err(storage)?;
        debug!(count = prs.len(), "listed review assignments");
        Ok(prs)
    }
}
