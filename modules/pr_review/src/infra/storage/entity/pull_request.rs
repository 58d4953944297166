use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// `status` holds the wire spelling, `OPEN` or `MERGED`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pull_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub author_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    #[sea_orm(nullable)]
    pub merged_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::pr_reviewer::Entity")]
    Reviewers,
}

impl Related<super::pr_reviewer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviewers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
