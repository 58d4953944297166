use async_trait::async_trait;
use axum::Router;

#[async_trait]
pub trait DbModule: Send + Sync {
    /// Runs BEFORE REST wiring.
    async fn migrate(&self, db: &modkit_db::DbHandle) -> anyhow::Result<()>;
}

/// Pure wiring; must be sync. Runs AFTER DB migrations.
pub trait RestfulModule: Send + Sync {
    fn register_rest(&self, router: Router) -> anyhow::Result<Router>;
}
