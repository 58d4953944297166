use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::PrReviewApi,
    error::PrReviewError,
    model::{PullRequest, PullRequestShort, Team, User},
};
use crate::domain::service::Service;

/// Local implementation of the PrReviewApi trait that delegates to the domain service
pub struct PrReviewLocalClient {
    service: Arc<Service>,
}

impl PrReviewLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl PrReviewApi for PrReviewLocalClient {
    async fn create_team(&self, team: Team) -> Result<Team, PrReviewError> {
        self.service.create_team(team).await.map_err(Into::into)
    }

    async fn get_team(&self, name: &str) -> Result<Team, PrReviewError> {
        self.service.get_team(name).await.map_err(Into::into)
    }

    async fn set_user_active(
        &self,
        user_id: &str,
        is_active: bool,
    ) -> Result<User, PrReviewError> {
        self.service
            .set_user_active(user_id, is_active)
            .await
            .map_err(Into::into)
    }

    async fn get_user_reviews(
        &self,
        user_id: &str,
    ) -> Result<Vec<PullRequestShort>, PrReviewError> {
        self.service
            .get_user_reviews(user_id)
            .await
            .map_err(Into::into)
    }

    async fn create_pull_request(
        &self,
        id: &str,
        name: &str,
        author_id: &str,
    ) -> Result<PullRequest, PrReviewError> {
        self.service
            .create_pull_request(id, name, author_id)
            .await
            .map_err(Into::into)
    }

    async fn merge_pull_request(&self, id: &str) -> Result<PullRequest, PrReviewError> {
        self.service.merge_pull_request(id).await.map_err(Into::into)
    }

    async fn reassign_reviewer(
        &self,
        pr_id: &str,
        old_user_id: &str,
    ) -> Result<(PullRequest, String), PrReviewError> {
        self.service
            .reassign_reviewer(pr_id, old_user_id)
            .await
            .map_err(Into::into)
    }
}
