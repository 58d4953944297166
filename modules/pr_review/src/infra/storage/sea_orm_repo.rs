//! SeaORM-backed implementation of the review repository port.
//!
//! `SeaOrmReviewRepository` only opens transactions; all reads and writes go
//! through `SeaOrmReviewTx`, which owns a `DatabaseTransaction`. The query
//! helpers at the bottom are generic over `C: ConnectionTrait`, so they run
//! the same against a transaction or a plain connection.

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, EntityTrait,
    IsolationLevel, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::contract::model::{
    PullRequest, PullRequestShort, PullRequestStatus, Team, TeamMember, User,
};
use crate::domain::repo::{ReviewRepository, ReviewTx};
use crate::infra::storage::entity::{pr_reviewer, pull_request, team, user};
use crate::infra::storage::mapper;

pub struct SeaOrmReviewRepository {
    conn: DatabaseConnection,
    serializable: bool,
}

impl SeaOrmReviewRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self {
            conn,
            serializable: false,
        }
    }

    /// Run Postgres transactions at SERIALIZABLE. SQLite already serializes writers.
    pub fn with_serializable(mut self, on: bool) -> Self {
        self.serializable = on;
        self
    }
}

#[async_trait]
impl ReviewRepository for SeaOrmReviewRepository {
    async fn begin(&self) -> anyhow::Result<Box<dyn ReviewTx>> {
        let backend = self.conn.get_database_backend();
        let txn = if self.serializable && backend == DbBackend::Postgres {
            self.conn
                .begin_with_config(Some(IsolationLevel::Serializable), None)
                .await
        } else {
            self.conn.begin().await
        }
        .context("begin transaction failed")?;
        Ok(Box::new(SeaOrmReviewTx { txn, backend }))
    }
}

pub struct SeaOrmReviewTx {
    txn: DatabaseTransaction,
    backend: DbBackend,
}

impl SeaOrmReviewTx {
    async fn load_pull_request(&self, id: &str, lock: bool) -> anyhow::Result<Option<PullRequest>> {
        let mut query = pull_request::Entity::find_by_id(id.to_owned());
        // SQLite has no row locks; its write lock is taken on the first write
        if lock && self.backend == DbBackend::Postgres {
            query = query.lock_exclusive();
        }
        let Some(row) = query
            .one(&self.txn)
            .await
            .context("get_pull_request failed")?
        else {
            return Ok(None);
        };
        let reviewers = find_reviewer_ids(&self.txn, &row.id).await?;
        mapper::pull_request_from_entity(row, reviewers).map(Some)
    }
}

#[async_trait]
impl ReviewTx for SeaOrmReviewTx {
    async fn get_user(&self, id: &str) -> anyhow::Result<Option<User>> {
        let found = user::Entity::find_by_id(id.to_owned())
            .one(&self.txn)
            .await
            .context("get_user failed")?;
        Ok(found.map(mapper::user_from_entity))
    }

    async fn get_team(&self, name: &str) -> anyhow::Result<Option<Team>> {
        let found = team::Entity::find_by_id(name.to_owned())
            .one(&self.txn)
            .await
            .context("get_team failed")?;
        let Some(row) = found else {
            return Ok(None);
        };
        let members = find_team_members(&self.txn, &row.name)
            .await?
            .iter()
            .map(TeamMember::from)
            .collect();
        Ok(Some(Team {
            name: row.name,
            members,
        }))
    }

    async fn get_team_members(&self, team_name: &str) -> anyhow::Result<Vec<User>> {
        find_team_members(&self.txn, team_name).await
    }

    async fn get_pull_request(&self, id: &str) -> anyhow::Result<Option<PullRequest>> {
        self.load_pull_request(id, false).await
    }

    async fn get_pull_request_for_update(&self, id: &str) -> anyhow::Result<Option<PullRequest>> {
        self.load_pull_request(id, true).await
    }

    async fn list_reviewer_assignments(
        &self,
        user_id: &str,
    ) -> anyhow::Result<Vec<PullRequestShort>> {
        let rows = pull_request::Entity::find()
            .inner_join(pr_reviewer::Entity)
            .filter(pr_reviewer::Column::UserId.eq(user_id))
            .order_by_asc(pull_request::Column::CreatedAt)
            .order_by_asc(pull_request::Column::Id)
            .all(&self.txn)
            .await
            .context("list_reviewer_assignments failed")?;
        rows.into_iter().map(mapper::short_from_entity).collect()
    }

    async fn save_team(&self, name: &str) -> anyhow::Result<()> {
        let m = team::ActiveModel {
            name: Set(name.to_owned()),
        };
        team::Entity::insert(m)
            .exec_without_returning(&self.txn)
            .await
            .context("save_team failed")?;
        Ok(())
    }

    async fn upsert_user(&self, u: &User) -> anyhow::Result<()> {
        let m = user::ActiveModel {
            id: Set(u.id.clone()),
            username: Set(u.username.clone()),
            is_active: Set(u.is_active),
            team_name: Set(u.team_name.clone()),
        };
        user::Entity::insert(m)
            .on_conflict(
                OnConflict::column(user::Column::Id)
                    .update_columns([
                        user::Column::Username,
                        user::Column::IsActive,
                        user::Column::TeamName,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.txn)
            .await
            .context("upsert_user failed")?;
        Ok(())
    }

    async fn set_user_active(&self, id: &str, is_active: bool) -> anyhow::Result<bool> {
        let res = user::Entity::update_many()
            .col_expr(user::Column::IsActive, Expr::value(is_active))
            .filter(user::Column::Id.eq(id))
            .exec(&self.txn)
            .await
            .context("set_user_active failed")?;
        Ok(res.rows_affected > 0)
    }

    async fn save_pull_request(&self, pr: &PullRequest) -> anyhow::Result<()> {
        let m = pull_request::ActiveModel {
            id: Set(pr.id.clone()),
            name: Set(pr.name.clone()),
            author_id: Set(pr.author_id.clone()),
            status: Set(pr.status.as_str().to_owned()),
            created_at: Set(pr.created_at),
            merged_at: Set(pr.merged_at),
        };
        pull_request::Entity::insert(m)
            .exec_without_returning(&self.txn)
            .await
            .context("save_pull_request failed")?;
        Ok(())
    }

    async fn save_reviewer_links(&self, pr_id: &str, user_ids: &[String]) -> anyhow::Result<()> {
        if user_ids.is_empty() {
            return Ok(());
        }
        let rows = user_ids.iter().map(|uid| pr_reviewer::ActiveModel {
            pull_request_id: Set(pr_id.to_owned()),
            user_id: Set(uid.clone()),
        });
        pr_reviewer::Entity::insert_many(rows)
            .exec_without_returning(&self.txn)
            .await
            .context("save_reviewer_links failed")?;
        Ok(())
    }

    async fn remove_reviewer_link(&self, pr_id: &str, user_id: &str) -> anyhow::Result<bool> {
        let res = pr_reviewer::Entity::delete_many()
            .filter(pr_reviewer::Column::PullRequestId.eq(pr_id))
            .filter(pr_reviewer::Column::UserId.eq(user_id))
            .exec(&self.txn)
            .await
            .context("remove_reviewer_link failed")?;
        Ok(res.rows_affected > 0)
    }

    async fn add_reviewer_link(&self, pr_id: &str, user_id: &str) -> anyhow::Result<()> {
        let m = pr_reviewer::ActiveModel {
            pull_request_id: Set(pr_id.to_owned()),
            user_id: Set(user_id.to_owned()),
        };
        pr_reviewer::Entity::insert(m)
            .exec_without_returning(&self.txn)
            .await
            .context("add_reviewer_link failed")?;
        Ok(())
    }

    async fn mark_merged(&self, pr_id: &str, at: DateTime<Utc>) -> anyhow::Result<bool> {
        let res = pull_request::Entity::update_many()
            .col_expr(
                pull_request::Column::Status,
                Expr::value(PullRequestStatus::Merged.as_str()),
            )
            .col_expr(pull_request::Column::MergedAt, Expr::value(at))
            .filter(pull_request::Column::Id.eq(pr_id))
            .filter(pull_request::Column::Status.eq(PullRequestStatus::Open.as_str()))
            .exec(&self.txn)
            .await
            .context("mark_merged failed")?;
        Ok(res.rows_affected > 0)
    }

    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        self.txn.commit().await.context("commit failed")
    }
}

async fn find_team_members<C>(conn: &C, team_name: &str) -> anyhow::Result<Vec<User>>
where
    C: ConnectionTrait,
{
    let rows = user::Entity::find()
        .filter(user::Column::TeamName.eq(team_name))
        .order_by_asc(user::Column::Id)
        .all(conn)
        .await
        .context("get_team_members failed")?;
    Ok(rows.into_iter().map(mapper::user_from_entity).collect())
}

async fn find_reviewer_ids<C>(conn: &C, pr_id: &str) -> anyhow::Result<Vec<String>>
where
    C: ConnectionTrait,
{
    let ids = pr_reviewer::Entity::find()
        .select_only()
        .column(pr_reviewer::Column::UserId)
        .filter(pr_reviewer::Column::PullRequestId.eq(pr_id))
        .order_by_asc(pr_reviewer::Column::UserId)
        .into_tuple::<String>()
        .all(conn)
        .await
        .context("load reviewers failed")?;
    Ok(ids)
}
