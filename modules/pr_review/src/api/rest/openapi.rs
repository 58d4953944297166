use modkit::api::problem::Problem;
use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "PR Reviewer Assignment Service",
        description = "Assigns pull request reviewers from the author's team"
    ),
    paths(
        handlers::add_team,
        handlers::get_team,
        handlers::set_is_active,
        handlers::get_review,
        handlers::create_pull_request,
        handlers::merge_pull_request,
        handlers::reassign_reviewer,
    ),
    components(schemas(
        Problem,
        dto::PullRequestStatusDto,
        dto::TeamMemberDto,
        dto::TeamDto,
        dto::TeamEnvelope,
        dto::UserDto,
        dto::UserEnvelope,
        dto::PullRequestDto,
        dto::PullRequestShortDto,
        dto::PullRequestEnvelope,
        dto::ReassignResponse,
        dto::UserReviewsDto,
        dto::CreateTeamReq,
        dto::SetIsActiveReq,
        dto::CreatePullRequestReq,
        dto::MergePullRequestReq,
        dto::ReassignReq,
    )),
    tags(
        (name = "teams", description = "Teams and their members"),
        (name = "users", description = "User activity and review assignments"),
        (name = "pull_requests", description = "Pull request lifecycle and reviewers"),
    )
)]
pub struct ApiDoc;
