//! Capabilities a module can expose to the runner. Every module implements
//! [`Module`]; the rest are opt-in and attached through `ModuleEntry`.

use async_trait::async_trait;
use axum::Router;
use tokio_util::sync::CancellationToken;

use crate::context::ModuleCtx;

/// Wiring step: read config, build services, publish clients.
/// The schema is not migrated yet when this runs.
#[async_trait]
pub trait Module: Send + Sync + 'static {
    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()>;
}

/// Schema owner. Called once per run, after every module's `init`.
#[async_trait]
pub trait DbModule: Send + Sync {
    async fn migrate(&self, db: &modkit_db::DbHandle) -> anyhow::Result<()>;
}

/// Contributes HTTP routes to the shared router.
pub trait RestfulModule: Send + Sync {
    fn register_rest(&self, ctx: &ModuleCtx, router: Router) -> anyhow::Result<Router>;
}

/// Owner of the HTTP listener. Exactly one may be registered.
pub trait RestHostModule: Send + Sync + 'static {
    /// Seed router, before any `RestfulModule` adds routes.
    fn rest_prepare(&self, ctx: &ModuleCtx, router: Router) -> anyhow::Result<Router>;

    /// Wrap the complete router in global middleware and keep it for `start`.
    fn rest_finalize(&self, ctx: &ModuleCtx, router: Router) -> anyhow::Result<Router>;
}

/// Background work bound to the run's cancellation token.
#[async_trait]
pub trait StatefulModule: Send + Sync {
    async fn start(&self, cancel: CancellationToken) -> anyhow::Result<()>;
    async fn stop(&self, cancel: CancellationToken) -> anyhow::Result<()>;
}
