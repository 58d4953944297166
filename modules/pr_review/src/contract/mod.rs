pub mod client;
pub mod error;
pub mod model;

pub use client::PrReviewApi;
pub use error::PrReviewError;
pub use model::{PullRequest, PullRequestShort, PullRequestStatus, Team, TeamMember, User};
