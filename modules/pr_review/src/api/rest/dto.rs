use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::contract::model::{
    PullRequest, PullRequestShort, PullRequestStatus, Team, TeamMember, User,
};

/// Wire form of `PullRequestStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PullRequestStatusDto {
    Open,
    Merged,
}

impl From<PullRequestStatus> for PullRequestStatusDto {
    fn from(s: PullRequestStatus) -> Self {
        match s {
            PullRequestStatus::Open => Self::Open,
            PullRequestStatus::Merged => Self::Merged,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamMemberDto {
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamDto {
    pub team_name: String,
    pub members: Vec<TeamMemberDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamEnvelope {
    pub team: TeamDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub user_id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserEnvelope {
    pub user: UserDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PullRequestDto {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PullRequestStatusDto,
    pub assigned_reviewers: Vec<String>,
    #[schema(format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(format = "date-time")]
    pub merged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PullRequestShortDto {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PullRequestStatusDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PullRequestEnvelope {
    pub pr: PullRequestDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReassignResponse {
    pub pr: PullRequestDto,
    pub replaced_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserReviewsDto {
    pub user_id: String,
    pub pull_requests: Vec<PullRequestShortDto>,
}

// Requests

/// Body of `POST /team/add`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateTeamReq {
    pub team_name: String,
    #[serde(default)]
    pub members: Vec<TeamMemberDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetIsActiveReq {
    pub user_id: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePullRequestReq {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MergePullRequestReq {
    pub pull_request_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReassignReq {
    pub pull_request_id: String,
    pub old_user_id: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TeamQuery {
    /// Team to look up.
    pub team_name: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    /// Reviewer whose assignments are listed.
    pub user_id: String,
}

// Conversion implementations between REST DTOs and contract models

impl From<TeamMember> for TeamMemberDto {
    fn from(m: TeamMember) -> Self {
        Self {
            user_id: m.user_id,
            username: m.username,
            is_active: m.is_active,
        }
    }
}

impl From<TeamMemberDto> for TeamMember {
    fn from(m: TeamMemberDto) -> Self {
        Self {
            user_id: m.user_id,
            username: m.username,
            is_active: m.is_active,
        }
    }
}

impl From<Team> for TeamDto {
    fn from(t: Team) -> Self {
        Self {
            team_name: t.name,
            members: t.members.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<CreateTeamReq> for Team {
    fn from(req: CreateTeamReq) -> Self {
        Self {
            name: req.team_name,
            members: req.members.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            user_id: u.id,
            username: u.username,
            team_name: u.team_name,
            is_active: u.is_active,
        }
    }
}

impl From<PullRequest> for PullRequestDto {
    fn from(pr: PullRequest) -> Self {
        Self {
            pull_request_id: pr.id,
            pull_request_name: pr.name,
            author_id: pr.author_id,
            status: pr.status.into(),
            assigned_reviewers: pr.assigned_reviewers,
            created_at: pr.created_at,
            merged_at: pr.merged_at,
        }
    }
}

impl From<PullRequestShort> for PullRequestShortDto {
    fn from(pr: PullRequestShort) -> Self {
        Self {
            pull_request_id: pr.id,
            pull_request_name: pr.name,
            author_id: pr.author_id,
            status: pr.status.into(),
        }
    }
}
