use thiserror::Error;

use crate::domain::error::DomainError;

/// Errors that are safe to expose to other modules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrReviewError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("{resource} '{id}' already exists")]
    AlreadyExists { resource: &'static str, id: String },

    #[error("pull request '{id}' is merged")]
    Merged { id: String },

    #[error("user '{user_id}' is not a reviewer of pull request '{pr_id}'")]
    NotAssigned { pr_id: String, user_id: String },

    #[error("no active replacement candidate for pull request '{pr_id}'")]
    NoCandidates { pr_id: String },

    #[error("Internal error")]
    Internal,
}

impl PrReviewError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<DomainError> for PrReviewError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::UserNotFound { id } => Self::not_found("user", id),
            DomainError::TeamNotFound { name } => Self::not_found("team", name),
            DomainError::PullRequestNotFound { id } => Self::not_found("pull request", id),
            DomainError::TeamExists { name } => Self::AlreadyExists {
                resource: "team",
                id: name,
            },
            DomainError::PullRequestExists { id } => Self::AlreadyExists {
                resource: "pull request",
                id,
            },
            DomainError::PullRequestMerged { id } => Self::Merged { id },
            DomainError::ReviewerNotAssigned { pr_id, user_id } => {
                Self::NotAssigned { pr_id, user_id }
            }
            DomainError::NoCandidates { pr_id } => Self::NoCandidates { pr_id },
            DomainError::Storage(_) => Self::internal(),
        }
    }
}
