use std::sync::Arc;

use async_trait::async_trait;
use modkit::{DbModule, RestfulModule};
use modkit_db::DbHandle;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::PrReviewConfig;
use crate::contract::client::PrReviewApi;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::PrReviewLocalClient;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::SeaOrmReviewRepository;

/// The pr_review module: repository, domain service and REST surface wired together.
#[derive(Clone)]
pub struct PrReview {
    service: Arc<Service>,
}

impl PrReview {
    /// Fails when the module config is out of range.
    pub fn new(db: &DbHandle, cfg: PrReviewConfig) -> anyhow::Result<Self> {
        cfg.validate()?;
        debug!(
            max_reviewers = cfg.max_reviewers,
            serializable = cfg.serializable_transactions,
            "loaded pr_review config"
        );
        let repo = SeaOrmReviewRepository::new(db.sea())
            .with_serializable(cfg.serializable_transactions);
        let service = Service::new(
            Arc::new(repo),
            ServiceConfig {
                max_reviewers: cfg.max_reviewers,
            },
        );
        Ok(Self {
            service: Arc::new(service),
        })
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// In-process client for other modules.
    pub fn client(&self) -> Arc<dyn PrReviewApi> {
        Arc::new(PrReviewLocalClient::new(self.service.clone()))
    }
}

#[async_trait]
impl DbModule for PrReview {
    async fn migrate(&self, db: &DbHandle) -> anyhow::Result<()> {
        info!("Running pr_review database migrations");
        Migrator::up(db.seaorm(), None).await?;
        info!("pr_review database migrations completed");
        Ok(())
    }
}

impl RestfulModule for PrReview {
    fn register_rest(&self, router: axum::Router) -> anyhow::Result<axum::Router> {
        info!("Registering pr_review REST routes");
        routes::register_routes(router, self.service.clone())
    }
}
