use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found: {id}")]
    UserNotFound { id: String },

    #[error("Team not found: {name}")]
    TeamNotFound { name: String },

    #[error("Pull request not found: {id}")]
    PullRequestNotFound { id: String },

    #[error("Team '{name}' already exists")]
    TeamExists { name: String },

    #[error("Pull request '{id}' already exists")]
    PullRequestExists { id: String },

    #[error("Pull request '{id}' is merged; reviewers are frozen")]
    PullRequestMerged { id: String },

    #[error("User '{user_id}' is not assigned to pull request '{pr_id}'")]
    ReviewerNotAssigned { pr_id: String, user_id: String },

    #[error("No active replacement candidate in team for pull request '{pr_id}'")]
    NoCandidates { pr_id: String },

    /// Anything the repository reported; kept whole for logs, never shown to clients.
    #[error("Storage failure: {0:#}")]
    Storage(anyhow::Error),
}

impl DomainError {
    pub fn user_not_found(id: impl Into<String>) -> Self {
        Self::UserNotFound { id: id.into() }
    }

    pub fn team_not_found(name: impl Into<String>) -> Self {
        Self::TeamNotFound { name: name.into() }
    }

    pub fn pull_request_not_found(id: impl Into<String>) -> Self {
        Self::PullRequestNotFound { id: id.into() }
    }

    pub fn team_exists(name: impl Into<String>) -> Self {
        Self::TeamExists { name: name.into() }
    }

    pub fn pull_request_exists(id: impl Into<String>) -> Self {
        Self::PullRequestExists { id: id.into() }
    }

    pub fn pull_request_merged(id: impl Into<String>) -> Self {
        Self::PullRequestMerged { id: id.into() }
    }

    pub fn reviewer_not_assigned(pr_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self::ReviewerNotAssigned {
            pr_id: pr_id.into(),
            user_id: user_id.into(),
        }
    }

    pub fn no_candidates(pr_id: impl Into<String>) -> Self {
        Self::NoCandidates {
            pr_id: pr_id.into(),
        }
    }

    pub fn storage(e: anyhow::Error) -> Self {
        Self::Storage(e)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound { .. } | Self::TeamNotFound { .. } | Self::PullRequestNotFound { .. }
        )
    }
}
