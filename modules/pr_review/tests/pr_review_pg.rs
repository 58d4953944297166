#![cfg(feature = "integration")]

mod common;

use anyhow::Result;
use modkit::DbModule;
use modkit_db::{ConnectOpts, DbHandle};

use pr_review::config::PrReviewConfig;
use pr_review::domain::error::DomainError;
use pr_review::PrReview;

#[tokio::test]
async fn pr_review_works_with_postgres() -> Result<()> {
    let dut = common::postgres::bring_up_postgres().await?;
    let db = DbHandle::connect(&dut.url, ConnectOpts::default()).await?;

    let module = PrReview::new(&db, PrReviewConfig::default())?;
    module.migrate(&db).await?;
    let svc = module.service();

    svc.create_team(common::team(
        "T",
        &[("A", true), ("B", true), ("C", true), ("D", true)],
    ))
    .await?;
    let pr = svc.create_pull_request("pr-1", "Postgres", "A").await?;
    assert_eq!(pr.assigned_reviewers.len(), 2);
    assert!(!pr.has_reviewer("A"));

    let old = pr.assigned_reviewers[0].clone();
    let (after, new) = svc.reassign_reviewer("pr-1", &old).await?;
    assert!(!after.has_reviewer(&old));
    assert!(after.has_reviewer(&new));

    // timestamps survive the round trip through timestamptz
    let merged = svc.merge_pull_request("pr-1").await?;
    assert_eq!(merged.created_at, pr.created_at);
    let again = svc.merge_pull_request("pr-1").await?;
    assert_eq!(again.merged_at, merged.merged_at);

    let err = svc.reassign_reviewer("pr-1", &new).await.unwrap_err();
    assert!(matches!(err, DomainError::PullRequestMerged { .. }));
    Ok(())
}

#[tokio::test]
async fn racing_reassigns_on_postgres() -> Result<()> {
    let dut = common::postgres::bring_up_postgres().await?;
    let db = DbHandle::connect(&dut.url, ConnectOpts::default()).await?;
    let module = PrReview::new(&db, PrReviewConfig::default())?;
    module.migrate(&db).await?;
    let svc = module.service();

    svc.create_team(common::team(
        "T",
        &[("A", true), ("B", true), ("C", true), ("D", true), ("E", true)],
    ))
    .await?;
    let pr = svc.create_pull_request("pr-1", "Race", "A").await?;
    let old = pr.assigned_reviewers[0].clone();

    let (s1, s2) = (svc.clone(), svc.clone());
    let (o1, o2) = (old.clone(), old.clone());
    let (r1, r2) = tokio::join!(
        async move { s1.reassign_reviewer("pr-1", &o1).await },
        async move { s2.reassign_reviewer("pr-1", &o2).await },
    );
    assert_eq!([&r1, &r2].iter().filter(|r| r.is_ok()).count(), 1);

    let reviews = svc.get_user_reviews(&old).await?;
    assert!(reviews.is_empty());
    Ok(())
}
