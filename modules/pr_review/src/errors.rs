//! Error catalog of the pr_review module: one stable code per failure kind.

use modkit::api::problem::ProblemResponse;
use modkit::ErrDef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotFound,
    PullRequestExists,
    TeamExists,
    PullRequestMerged,
    NotAssigned,
    NoCandidate,
    Internal,
}

const NOT_FOUND: ErrDef = ErrDef {
    status: 404,
    title: "Not Found",
    code: "NOT_FOUND",
    type_url: "https://errors.example.com/pr_review/NOT_FOUND",
};
const PR_EXISTS: ErrDef = ErrDef {
    status: 409,
    title: "Pull Request Exists",
    code: "PR_EXISTS",
    type_url: "https://errors.example.com/pr_review/PR_EXISTS",
};
const TEAM_EXISTS: ErrDef = ErrDef {
    status: 409,
    title: "Team Exists",
    code: "TEAM_EXISTS",
    type_url: "https://errors.example.com/pr_review/TEAM_EXISTS",
};
const PR_MERGED: ErrDef = ErrDef {
    status: 409,
    title: "Pull Request Merged",
    code: "PR_MERGED",
    type_url: "https://errors.example.com/pr_review/PR_MERGED",
};
const NOT_ASSIGNED: ErrDef = ErrDef {
    status: 409,
    title: "Reviewer Not Assigned",
    code: "NOT_ASSIGNED",
    type_url: "https://errors.example.com/pr_review/NOT_ASSIGNED",
};
const NO_CANDIDATE: ErrDef = ErrDef {
    status: 409,
    title: "No Candidate",
    code: "NO_CANDIDATE",
    type_url: "https://errors.example.com/pr_review/NO_CANDIDATE",
};
const INTERNAL: ErrDef = ErrDef {
    status: 500,
    title: "Internal Error",
    code: "INTERNAL",
    type_url: "https://errors.example.com/pr_review/INTERNAL",
};

impl ErrorCode {
    pub const ALL: [ErrorCode; 7] = [
        ErrorCode::NotFound,
        ErrorCode::PullRequestExists,
        ErrorCode::TeamExists,
        ErrorCode::PullRequestMerged,
        ErrorCode::NotAssigned,
        ErrorCode::NoCandidate,
        ErrorCode::Internal,
    ];

    pub const fn def(self) -> ErrDef {
        match self {
            ErrorCode::NotFound => NOT_FOUND,
            ErrorCode::PullRequestExists => PR_EXISTS,
            ErrorCode::TeamExists => TEAM_EXISTS,
            ErrorCode::PullRequestMerged => PR_MERGED,
            ErrorCode::NotAssigned => NOT_ASSIGNED,
            ErrorCode::NoCandidate => NO_CANDIDATE,
            ErrorCode::Internal => INTERNAL,
        }
    }

    pub const fn status(self) -> u16 {
        self.def().status
    }

    pub const fn code(self) -> &'static str {
        self.def().code
    }

    pub fn to_problem(self, detail: impl Into<String>) -> modkit::Problem {
        self.def().to_problem(detail)
    }

    /// Problem response carrying the request path and, when known, the request id.
    pub fn to_response(
        self,
        detail: impl Into<String>,
        instance: &str,
        request_id: Option<String>,
    ) -> ProblemResponse {
        let mut p = self.to_problem(detail).with_instance(instance);
        if let Some(id) = request_id {
            p = p.with_request_id(id);
        }
        ProblemResponse(p)
    }
}
