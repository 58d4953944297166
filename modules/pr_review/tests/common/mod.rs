#![allow(dead_code)]

pub mod memory;
#[cfg(feature = "integration")]
pub mod postgres;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use modkit::DbModule;
use modkit_db::{ConnectOpts, DbHandle};

use pr_review::config::PrReviewConfig;
use pr_review::contract::model::{Team, TeamMember};
use pr_review::domain::service::Service;
use pr_review::PrReview;

/// Fresh, empty in-memory SQLite database.
pub async fn memory_db() -> DbHandle {
    DbHandle::connect("sqlite::memory:", ConnectOpts::default())
        .await
        .expect("Failed to connect to test database")
}

/// Module wired over a fresh in-memory database.
pub async fn test_module() -> (DbHandle, PrReview) {
    let db = memory_db().await;
    let module =
        PrReview::new(&db, PrReviewConfig::default()).expect("Failed to build module");
    module
        .migrate(&db)
        .await
        .expect("Failed to run migrations");
    (db, module)
}

/// Module over a SQLite file in `dir` with a multi-connection pool, so
/// transactions from different tasks can interleave.
pub async fn file_module(dir: &Path) -> (DbHandle, PrReview) {
    let dsn = format!(
        "sqlite://{}?mode=rwc",
        dir.join("pr_review.db").to_string_lossy().replace('\\', "/")
    );
    let opts = ConnectOpts {
        max_conns: Some(4),
        sqlite_busy_timeout: Duration::from_secs(5),
        ..ConnectOpts::default()
    };
    let db = DbHandle::connect(&dsn, opts)
        .await
        .expect("Failed to open file database");
    let module =
        PrReview::new(&db, PrReviewConfig::default()).expect("Failed to build module");
    module
        .migrate(&db)
        .await
        .expect("Failed to run migrations");
    (db, module)
}

pub async fn test_service() -> (DbHandle, Arc<Service>) {
    let (db, module) = test_module().await;
    (db, module.service())
}

pub fn member(id: &str, active: bool) -> TeamMember {
    TeamMember {
        user_id: id.to_string(),
        username: format!("user-{id}"),
        is_active: active,
    }
}

pub fn team(name: &str, members: &[(&str, bool)]) -> Team {
    Team {
        name: name.to_string(),
        members: members.iter().map(|(id, a)| member(id, *a)).collect(),
    }
}

pub fn sorted(mut v: Vec<String>) -> Vec<String> {
    v.sort();
    v
}
