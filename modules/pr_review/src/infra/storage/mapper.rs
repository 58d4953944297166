use anyhow::anyhow;

use crate::contract::model::{PullRequest, PullRequestShort, PullRequestStatus, User};
use crate::infra::storage::entity::{pull_request, user};

pub fn user_from_entity(m: user::Model) -> User {
    User {
        id: m.id,
        username: m.username,
        is_active: m.is_active,
        team_name: m.team_name,
    }
}

pub fn status_from_entity(raw: &str) -> anyhow::Result<PullRequestStatus> {
    raw.parse()
        .map_err(|e: String| anyhow!("corrupt pull_requests.status: {e}"))
}

pub fn pull_request_from_entity(
    m: pull_request::Model,
    mut reviewers: Vec<String>,
) -> anyhow::Result<PullRequest> {
    reviewers.sort();
    Ok(PullRequest {
        status: status_from_entity(&m.status)?,
        id: m.id,
        name: m.name,
        author_id: m.author_id,
        assigned_reviewers: reviewers,
        created_at: m.created_at,
        merged_at: m.merged_at,
    })
}

pub fn short_from_entity(m: pull_request::Model) -> anyhow::Result<PullRequestShort> {
    Ok(PullRequestShort {
        status: status_from_entity(&m.status)?,
        id: m.id,
        name: m.name,
        author_id: m.author_id,
    })
}
