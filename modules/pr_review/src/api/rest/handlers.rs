use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query,
    },
    http::{HeaderMap, StatusCode, Uri},
    response::Json,
    Extension,
};
use modkit::api::problem::{Problem, ProblemResponse};
use tracing::{info, warn};

use crate::api::rest::dto::{
    CreatePullRequestReq, CreateTeamReq, MergePullRequestReq, PullRequestEnvelope, ReassignReq,
    ReassignResponse, SetIsActiveReq, TeamDto, TeamEnvelope, TeamQuery, UserEnvelope, UserQuery,
    UserReviewsDto,
};
use crate::api::rest::error::{invalid_request, map_domain_error, request_id};
use crate::domain::service::Service;

type ApiResult<T> = Result<T, ProblemResponse>;

fn rejected(detail: String, uri: &Uri, headers: &HeaderMap) -> ProblemResponse {
    warn!(path = uri.path(), %detail, "request rejected");
    invalid_request(detail, uri.path(), request_id(headers))
}

/// Create a team and upsert its members
#[utoipa::path(
    post,
    path = "/team/add",
    tag = "teams",
    request_body = CreateTeamReq,
    responses(
        (status = 201, description = "Team created", body = TeamEnvelope),
        (status = 400, description = "Malformed body", body = Problem),
        (status = 409, description = "Team name taken", body = Problem),
        (status = 500, description = "Storage failure", body = Problem),
    )
)]
pub async fn add_team(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Json<CreateTeamReq>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TeamEnvelope>)> {
    let Json(req) = body.map_err(|e| rejected(e.body_text(), &uri, &headers))?;
    info!(team_name = %req.team_name, members = req.members.len(), "creating team");

    match svc.create_team(req.into()).await {
        Ok(team) => Ok((
            StatusCode::CREATED,
            Json(TeamEnvelope { team: team.into() }),
        )),
        Err(e) => Err(map_domain_error(&e, uri.path(), request_id(&headers))),
    }
}

/// Get a team with its members
#[utoipa::path(
    get,
    path = "/team/get",
    tag = "teams",
    params(TeamQuery),
    responses(
        (status = 200, description = "Team found", body = TeamDto),
        (status = 400, description = "Missing team_name", body = Problem),
        (status = 404, description = "Unknown team", body = Problem),
    )
)]
pub async fn get_team(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    headers: HeaderMap,
    query: Result<Query<TeamQuery>, QueryRejection>,
) -> ApiResult<Json<TeamDto>> {
    let Query(q) = query.map_err(|e| rejected(e.body_text(), &uri, &headers))?;

    svc.get_team(&q.team_name)
        .await
        .map(|team| Json(team.into()))
        .map_err(|e| map_domain_error(&e, uri.path(), request_id(&headers)))
}

/// Activate or deactivate a user
#[utoipa::path(
    post,
    path = "/users/setIsActive",
    tag = "users",
    request_body = SetIsActiveReq,
    responses(
        (status = 200, description = "Updated user", body = UserEnvelope),
        (status = 400, description = "Malformed body", body = Problem),
        (status = 404, description = "Unknown user", body = Problem),
    )
)]
pub async fn set_is_active(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Json<SetIsActiveReq>, JsonRejection>,
) -> ApiResult<Json<UserEnvelope>> {
    let Json(req) = body.map_err(|e| rejected(e.body_text(), &uri, &headers))?;
    info!(user_id = %req.user_id, is_active = req.is_active, "setting user activity");

    svc.set_user_active(&req.user_id, req.is_active)
        .await
        .map(|user| Json(UserEnvelope { user: user.into() }))
        .map_err(|e| map_domain_error(&e, uri.path(), request_id(&headers)))
}

/// Pull requests a user currently reviews
#[utoipa::path(
    get,
    path = "/users/getReview",
    tag = "users",
    params(UserQuery),
    responses(
        (status = 200, description = "Review assignments", body = UserReviewsDto),
        (status = 400, description = "Missing user_id", body = Problem),
    )
)]
pub async fn get_review(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    headers: HeaderMap,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> ApiResult<Json<UserReviewsDto>> {
    let Query(q) = query.map_err(|e| rejected(e.body_text(), &uri, &headers))?;

    match svc.get_user_reviews(&q.user_id).await {
        Ok(prs) => Ok(Json(UserReviewsDto {
            user_id: q.user_id,
            pull_requests: prs.into_iter().map(Into::into).collect(),
        })),
        Err(e) => Err(map_domain_error(&e, uri.path(), request_id(&headers))),
    }
}

/// Create a pull request and assign reviewers from the author's team
#[utoipa::path(
    post,
    path = "/pullRequest/create",
    tag = "pull_requests",
    request_body = CreatePullRequestReq,
    responses(
        (status = 201, description = "Pull request created", body = PullRequestEnvelope),
        (status = 400, description = "Malformed body", body = Problem),
        (status = 404, description = "Unknown author", body = Problem),
        (status = 409, description = "Pull request id taken", body = Problem),
        (status = 500, description = "Storage failure", body = Problem),
    )
)]
pub async fn create_pull_request(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Json<CreatePullRequestReq>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PullRequestEnvelope>)> {
    let Json(req) = body.map_err(|e| rejected(e.body_text(), &uri, &headers))?;
    info!(pr_id = %req.pull_request_id, author_id = %req.author_id, "creating pull request");

    match svc
        .create_pull_request(&req.pull_request_id, &req.pull_request_name, &req.author_id)
        .await
    {
        Ok(pr) => Ok((
            StatusCode::CREATED,
            Json(PullRequestEnvelope { pr: pr.into() }),
        )),
        Err(e) => Err(map_domain_error(&e, uri.path(), request_id(&headers))),
    }
}

/// Merge a pull request; merging twice is a no-op
#[utoipa::path(
    post,
    path = "/pullRequest/merge",
    tag = "pull_requests",
    request_body = MergePullRequestReq,
    responses(
        (status = 200, description = "Merged pull request", body = PullRequestEnvelope),
        (status = 400, description = "Malformed body", body = Problem),
        (status = 404, description = "Unknown pull request", body = Problem),
    )
)]
pub async fn merge_pull_request(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Json<MergePullRequestReq>, JsonRejection>,
) -> ApiResult<Json<PullRequestEnvelope>> {
    let Json(req) = body.map_err(|e| rejected(e.body_text(), &uri, &headers))?;
    info!(pr_id = %req.pull_request_id, "merging pull request");

    svc.merge_pull_request(&req.pull_request_id)
        .await
        .map(|pr| Json(PullRequestEnvelope { pr: pr.into() }))
        .map_err(|e| map_domain_error(&e, uri.path(), request_id(&headers)))
}

/// Replace one reviewer with another active member of that reviewer's team
#[utoipa::path(
    post,
    path = "/pullRequest/reassign",
    tag = "pull_requests",
    request_body = ReassignReq,
    responses(
        (status = 200, description = "Reviewer replaced", body = ReassignResponse),
        (status = 400, description = "Malformed body", body = Problem),
        (status = 404, description = "Unknown pull request or user", body = Problem),
        (status = 409, description = "Merged, not assigned, or no candidate", body = Problem),
        (status = 500, description = "Storage failure", body = Problem),
    )
)]
pub async fn reassign_reviewer(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Json<ReassignReq>, JsonRejection>,
) -> ApiResult<Json<ReassignResponse>> {
    let Json(req) = body.map_err(|e| rejected(e.body_text(), &uri, &headers))?;
    info!(pr_id = %req.pull_request_id, old_user_id = %req.old_user_id, "reassigning reviewer");

    match svc
        .reassign_reviewer(&req.pull_request_id, &req.old_user_id)
        .await
    {
        Ok((pr, replaced_by)) => Ok(Json(ReassignResponse {
            pr: pr.into(),
            replaced_by,
        })),
        Err(e) => Err(map_domain_error(&e, uri.path(), request_id(&headers))),
    }
}
