//! Drives a [`ModuleRegistry`] through its phases.
//!
//! A single base `ModuleCtx` is shared by every phase. The run ends when the
//! cancellation token fires, after which stateful modules are stopped in
//! reverse order.

use crate::context::{ConfigProvider, ModuleCtx, ModuleCtxBuilder};
use crate::registry::ModuleRegistry;
use crate::runtime::shutdown;
use std::{future::Future, pin::Pin, sync::Arc};
use tokio_util::sync::CancellationToken;

/// Database wiring for the run.
pub enum DbOptions {
    /// Modules see no database; `ModuleCtx::db_required()` fails.
    None,
    /// Shared connection; the DB phase runs every module's migrations on it.
    Handle(Arc<modkit_db::DbHandle>),
}

/// What ends the run.
pub enum ShutdownOptions {
    /// SIGINT / SIGTERM (Ctrl+C off unix).
    Signals,
    /// The caller cancels this token.
    Token(CancellationToken),
    /// Completion of the given future.
    Future(Pin<Box<dyn Future<Output = ()> + Send>>),
}

pub struct RunOptions {
    /// Source of raw per-module config sections.
    pub modules_cfg: Arc<dyn ConfigProvider>,
    pub db: DbOptions,
    pub shutdown: ShutdownOptions,
}

/// Returns the token that ends the run, spawning a watcher task when the
/// trigger is a signal or a future.
fn arm_shutdown(trigger: ShutdownOptions) -> CancellationToken {
    match trigger {
        ShutdownOptions::Token(token) => {
            tracing::info!("shutdown: controlled by caller token");
            token
        }
        ShutdownOptions::Signals => {
            let token = CancellationToken::new();
            let fire = token.clone();
            tokio::spawn(async move {
                if let Err(e) = shutdown::wait_for_shutdown().await {
                    tracing::warn!(error = %e, "shutdown: signal handler unavailable, using ctrl_c");
                    let _ = tokio::signal::ctrl_c().await;
                }
                tracing::info!("shutdown: signal received");
                fire.cancel();
            });
            token
        }
        ShutdownOptions::Future(done) => {
            let token = CancellationToken::new();
            let fire = token.clone();
            tokio::spawn(async move {
                done.await;
                tracing::info!("shutdown: trigger future completed");
                fire.cancel();
            });
            token
        }
    }
}

fn base_ctx(cancel: &CancellationToken, opts: &RunOptions) -> ModuleCtx {
    let builder =
        ModuleCtxBuilder::new(cancel.clone()).with_config_provider(opts.modules_cfg.clone());
    match &opts.db {
        DbOptions::Handle(db) => builder.with_db(db.clone()).build(),
        DbOptions::None => builder.build(),
    }
}

/// init → db → rest → start → wait → stop.
pub async fn run(registry: ModuleRegistry, mut opts: RunOptions) -> anyhow::Result<()> {
    let trigger = std::mem::replace(&mut opts.shutdown, ShutdownOptions::Signals);
    let cancel = arm_shutdown(trigger);
    let ctx = base_ctx(&cancel, &opts);

    tracing::info!(modules = registry.modules().len(), "Phase: init");
    registry.run_init_phase(&ctx).await?;

    if let DbOptions::Handle(db) = &opts.db {
        tracing::info!(backend = ?db.engine(), "Phase: db");
        registry.run_db_phase(db).await?;
    }

    tracing::info!("Phase: rest");
    let _ = registry.run_rest_phase(&ctx, axum::Router::new())?;

    tracing::info!("Phase: start");
    registry.run_start_phase(cancel.clone()).await?;

    cancel.cancelled().await;

    tracing::info!("Phase: stop");
    registry.run_stop_phase(cancel).await?;
    Ok(())
}
