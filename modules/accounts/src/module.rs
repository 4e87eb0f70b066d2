use std::sync::Arc;

use arc_swap::{ArcSwap, ArcSwapOption};
use async_trait::async_trait;
use modkit::{DbModule, Module, ModuleCtx};
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::config::AccountsConfig;
use crate::contract::client::AccountsApi;
use crate::domain::service::Service;
use crate::gateways::local::AccountsLocalClient;
use crate::infra::storage::{migrations::Migrator, SeaOrmUsersRepository};

pub const MODULE_NAME: &str = "accounts";

/// User accounts: exposes `AccountsApi` through the client hub and seeds
/// default users after migrating.
#[derive(Default)]
pub struct Accounts {
    service: ArcSwapOption<Service>,
    config: ArcSwap<AccountsConfig>,
}

impl Accounts {
    fn service(&self) -> anyhow::Result<Arc<Service>> {
        self.service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("accounts service not initialized"))
    }
}

#[async_trait]
impl Module for Accounts {
    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        info!("Initializing accounts module");

        let cfg: AccountsConfig = ctx.module_config()?;
        debug!(seed_default_users = cfg.seed_default_users, "Loaded accounts config");

        let db = ctx.db_required()?;
        let repo = SeaOrmUsersRepository::new(db.sea());
        let service = Arc::new(Service::new(Arc::new(repo)));

        let api: Arc<dyn AccountsApi> = Arc::new(AccountsLocalClient::new(service.clone()));
        ctx.client_hub().register::<dyn AccountsApi>(api);

        self.service.store(Some(service));
        self.config.store(Arc::new(cfg));
        info!("AccountsApi exposed to ClientHub");
        Ok(())
    }
}

#[async_trait]
impl DbModule for Accounts {
    async fn migrate(&self, db: &modkit_db::DbHandle) -> anyhow::Result<()> {
        info!("Running accounts database migrations");
        Migrator::up(db.seaorm(), None).await?;

        let cfg = self.config.load();
        if cfg.seed_default_users {
            self.service()?.seed_users(cfg.default_users()).await?;
        } else {
            debug!("Default user seeding disabled");
        }
        Ok(())
    }
}
