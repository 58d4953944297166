//! Tests to verify that the service layer emits expected tracing spans

mod common;

use std::sync::Arc;

use tracing_test::traced_test;

use pr_review::domain::service::{Service, ServiceConfig};

use common::memory::MemoryRepo;

async fn service() -> (MemoryRepo, Service) {
    let repo = MemoryRepo::new();
    for id in ["A", "B", "C"] {
        repo.seed_user(id, Some("T"), true).await;
    }
    let svc = Service::new(Arc::new(repo.clone()), ServiceConfig::default());
    (repo, svc)
}

#[traced_test]
#[tokio::test]
async fn create_pull_request_emits_span() {
    let (_repo, svc) = service().await;

    let result = svc.create_pull_request("pr-1", "Trace me", "A").await;

    assert!(result.is_ok());
    assert!(logs_contain("pr_review.service.create_pull_request"));
    assert!(logs_contain("pr_id=pr-1"));
    assert!(logs_contain("pull request created"));
}

#[traced_test]
#[tokio::test]
async fn reassign_emits_span_with_replacement() {
    let (repo, svc) = service().await;
    repo.seed_user("D", Some("T"), true).await;
    let pr = svc.create_pull_request("pr-1", "t", "A").await.unwrap();

    let result = svc
        .reassign_reviewer("pr-1", &pr.assigned_reviewers[0])
        .await;

    assert!(result.is_ok());
    assert!(logs_contain("pr_review.service.reassign_reviewer"));
    assert!(logs_contain("reviewer reassigned"));
}

#[traced_test]
#[tokio::test]
async fn failed_reassign_still_traced() {
    let (_repo, svc) = service().await;

    let result = svc.reassign_reviewer("missing", "B").await;

    assert!(result.is_err());
    assert!(logs_contain("pr_review.service.reassign_reviewer"));
    assert!(logs_contain("Reassigning reviewer"));
    assert!(!logs_contain("reviewer reassigned"));
}

#[traced_test]
#[tokio::test]
async fn merge_and_team_ops_emit_spans() {
    let (_repo, svc) = service().await;
    svc.create_pull_request("pr-1", "t", "A").await.unwrap();

    assert!(svc.merge_pull_request("pr-1").await.is_ok());
    assert!(svc.get_team("T").await.is_ok());
    assert!(svc.set_user_active("B", false).await.is_ok());
    assert!(svc.get_user_reviews("B").await.is_ok());

    assert!(logs_contain("pr_review.service.merge_pull_request"));
    assert!(logs_contain("pr_review.service.get_team"));
    assert!(logs_contain("Getting team by name"));
    assert!(logs_contain("pr_review.service.set_user_active"));
    assert!(logs_contain("pr_review.service.get_user_reviews"));
}
