use std::sync::Arc;

use accounts::contract::AccountsApi;
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use modkit::{DbModule, Module, ModuleCtx, RestfulModule};
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::ArticlesConfig;
use crate::contract::client::ArticlesApi;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::ArticlesLocalClient;
use crate::infra::storage::{migrations::Migrator, SeaOrmArticlesRepository};

pub const MODULE_NAME: &str = "articles";

/// Blog articles: storage, REST endpoints and publication statistics.
/// Depends on `accounts` for request authentication.
#[derive(Default)]
pub struct Articles {
    service: ArcSwapOption<Service>,
    accounts: ArcSwapOption<Arc<dyn AccountsApi>>,
}

#[async_trait]
impl Module for Articles {
    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        info!("Initializing articles module");

        let cfg: ArticlesConfig = ctx.module_config()?;
        debug!(
            default_page_size = cfg.default_page_size,
            max_page_size = cfg.max_page_size,
            "Loaded articles config"
        );
        if cfg.default_page_size == 0 || cfg.max_page_size == 0 {
            anyhow::bail!("articles page sizes must be at least 1");
        }

        let db = ctx.db_required()?;
        let repo = SeaOrmArticlesRepository::new(db.sea());
        let service = Arc::new(Service::new(
            Arc::new(repo),
            ServiceConfig {
                default_page_size: cfg.default_page_size.min(cfg.max_page_size),
                max_page_size: cfg.max_page_size,
            },
        ));

        let accounts = ctx.client_hub().get::<dyn AccountsApi>()?;
        self.accounts.store(Some(Arc::new(accounts)));

        let api: Arc<dyn ArticlesApi> = Arc::new(ArticlesLocalClient::new(service.clone()));
        ctx.client_hub().register::<dyn ArticlesApi>(api);

        self.service.store(Some(service));
        info!("ArticlesApi exposed to ClientHub");
        Ok(())
    }
}

#[async_trait]
impl DbModule for Articles {
    async fn migrate(&self, db: &modkit_db::DbHandle) -> anyhow::Result<()> {
        info!("Running articles database migrations");
        Migrator::up(db.seaorm(), None).await?;
        Ok(())
    }
}

impl RestfulModule for Articles {
    fn register_rest(&self, _ctx: &ModuleCtx, router: axum::Router) -> anyhow::Result<axum::Router> {
        let service = self
            .service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))?;
        let accounts = self
            .accounts
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("AccountsApi not resolved"))?;

        let router = routes::register_routes(router, service, (*accounts).clone())?;
        info!("Articles REST routes registered");
        Ok(router)
    }
}
