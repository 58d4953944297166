use axum::http::HeaderMap;
use modkit::api::problem::{bad_request, ProblemResponse};

use crate::domain::error::DomainError;
use crate::errors::ErrorCode;

/// Value of the `x-request-id` header, when the client or the ingress set one.
pub fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Catalog entry for a domain error.
pub fn error_code(e: &DomainError) -> ErrorCode {
    match e {
        DomainError::UserNotFound { .. }
        | DomainError::TeamNotFound { .. }
        | DomainError::PullRequestNotFound { .. } => ErrorCode::NotFound,
        DomainError::TeamExists { .. } => ErrorCode::TeamExists,
        DomainError::PullRequestExists { .. } => ErrorCode::PullRequestExists,
        DomainError::PullRequestMerged { .. } => ErrorCode::PullRequestMerged,
        DomainError::ReviewerNotAssigned { .. } => ErrorCode::NotAssigned,
        DomainError::NoCandidates { .. } => ErrorCode::NoCandidate,
        DomainError::Storage(_) => ErrorCode::Internal,
    }
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(
    e: &DomainError,
    instance: &str,
    request_id: Option<String>,
) -> ProblemResponse {
    let code = error_code(e);
    let detail = match e {
        DomainError::Storage(_) => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = %e, "storage failure");
            "An internal storage error occurred".to_string()
        }
        _ => e.to_string(),
    };
    code.to_response(detail, instance, request_id)
}

/// 400 problem for a body or query the extractor rejected.
pub fn invalid_request(
    detail: impl Into<String>,
    instance: &str,
    request_id: Option<String>,
) -> ProblemResponse {
    let mut p = bad_request(detail).0.with_instance(instance);
    if let Some(id) = request_id {
        p = p.with_request_id(id);
    }
    ProblemResponse(p)
}
