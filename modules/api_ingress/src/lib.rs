//! HTTP host: owns the listener, the global middleware stack and `/health`.
//! Feature modules attach their routes during the REST phase; the finalized
//! router is served from the start phase until the cancellation token fires.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use async_trait::async_trait;
use axum::{middleware::from_fn, routing::get, Router};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

mod config;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;

pub const MODULE_NAME: &str = "api_ingress";

const STOP_TIMEOUT: Duration = Duration::from_secs(30);

/// Wrap `router` with the global middleware stack.
///
/// Request flow (outermost first):
/// SetRequestId -> PropagateRequestId -> Trace -> expose_to_handlers -> Timeout -> CORS -> BodyLimit
pub fn apply_middleware(mut router: Router, cfg: &ApiIngressConfig) -> Router {
    let x_request_id = request_id::header();

    router = router.layer(RequestBodyLimitLayer::new(cfg.body_limit_bytes));
    if cfg.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }
    router = router.layer(TimeoutLayer::new(Duration::from_secs(
        cfg.request_timeout_sec,
    )));
    router = router.layer(from_fn(request_id::expose_to_handlers));
    router = router.layer(request_id::trace_layer());
    router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
    router.layer(SetRequestIdLayer::new(x_request_id, request_id::NanoRequestId))
}

pub struct ApiIngress {
    config: ArcSwap<ApiIngressConfig>,
    final_router: Mutex<Option<Router>>,
    server: Mutex<Option<JoinHandle<Result<()>>>>,
}

impl Default for ApiIngress {
    fn default() -> Self {
        Self::new(ApiIngressConfig::default())
    }
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            final_router: Mutex::new(None),
            server: Mutex::new(None),
        }
    }

    pub fn config(&self) -> ApiIngressConfig {
        (**self.config.load()).clone()
    }

    /// The router produced by the REST phase, if it ran.
    pub fn router(&self) -> Option<Router> {
        self.final_router.lock().clone()
    }

    async fn serve(
        listener: tokio::net::TcpListener,
        router: Router,
        cancel: CancellationToken,
    ) -> Result<()> {
        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully (cancellation)");
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server failed")
    }
}

#[async_trait]
impl modkit::Module for ApiIngress {
    async fn init(&self, ctx: &modkit::ModuleCtx) -> Result<()> {
        let cfg: ApiIngressConfig = ctx.module_config()?;
        tracing::debug!(
            bind_addr = %cfg.bind_addr,
            cors = cfg.cors_enabled,
            timeout_sec = cfg.request_timeout_sec,
            "api_ingress configured"
        );
        self.config.store(Arc::new(cfg));
        Ok(())
    }
}

impl modkit::RestHostModule for ApiIngress {
    fn rest_prepare(&self, _ctx: &modkit::ModuleCtx, router: Router) -> Result<Router> {
        Ok(router.route("/health", get(web::health_check)))
    }

    fn rest_finalize(&self, _ctx: &modkit::ModuleCtx, router: Router) -> Result<Router> {
        let router = apply_middleware(router, &self.config());
        *self.final_router.lock() = Some(router.clone());
        Ok(router)
    }
}

#[async_trait]
impl modkit::StatefulModule for ApiIngress {
    async fn start(&self, cancel: CancellationToken) -> Result<()> {
        let cfg = self.config();
        let addr: SocketAddr = cfg
            .bind_addr
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", cfg.bind_addr))?;

        let router = { self.final_router.lock().take() }.unwrap_or_else(|| {
            tracing::debug!("No router from REST phase, serving /health only");
            apply_middleware(Router::new().route("/health", get(web::health_check)), &cfg)
        });

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        tracing::info!("HTTP server bound on {}", addr);

        let handle = tokio::spawn(Self::serve(listener, router, cancel));
        *self.server.lock() = Some(handle);
        Ok(())
    }

    async fn stop(&self, _cancel: CancellationToken) -> Result<()> {
        let handle = { self.server.lock().take() };
        let Some(handle) = handle else {
            return Ok(());
        };
        match tokio::time::timeout(STOP_TIMEOUT, handle).await {
            Ok(joined) => joined.context("HTTP server task panicked")?,
            Err(_) => {
                tracing::warn!("HTTP server did not stop within {:?}", STOP_TIMEOUT);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use modkit::{Module, ModuleCtxBuilder, RestHostModule};
    use tower::ServiceExt;

    fn ctx(modules: serde_json::Value) -> modkit::ModuleCtx {
        let mut cfg = runtime::AppConfig::default();
        cfg.modules.insert(MODULE_NAME.to_string(), modules);
        ModuleCtxBuilder::new(CancellationToken::new())
            .with_config_provider(Arc::new(cfg))
            .build()
            .for_module(MODULE_NAME)
    }

    #[tokio::test]
    async fn init_reads_module_config() {
        let ingress = ApiIngress::default();
        ingress
            .init(&ctx(serde_json::json!({
                "bind_addr": "0.0.0.0:9000",
                "cors_enabled": true
            })))
            .await
            .unwrap();

        let cfg = ingress.config();
        assert_eq!(cfg.bind_addr, "0.0.0.0:9000");
        assert!(cfg.cors_enabled);
        assert_eq!(cfg.request_timeout_sec, 30);
    }

    #[tokio::test]
    async fn unknown_config_keys_are_rejected() {
        let ingress = ApiIngress::default();
        let err = ingress
            .init(&ctx(serde_json::json!({ "enable_docs": true })))
            .await
            .unwrap_err();
        assert!(err.to_string().contains(MODULE_NAME));
    }

    #[tokio::test]
    async fn finalized_router_serves_health() {
        let ingress = ApiIngress::default();
        let c = ctx(serde_json::json!({}));
        let router = ingress.rest_prepare(&c, Router::new()).unwrap();
        let router = ingress.rest_finalize(&c, router).unwrap();
        assert!(ingress.router().is_some());

        let resp = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("x-request-id"));

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn start_binds_and_stop_joins_after_cancel() {
        let ingress = ApiIngress::new(ApiIngressConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            ..Default::default()
        });
        let cancel = CancellationToken::new();

        modkit::StatefulModule::start(&ingress, cancel.clone())
            .await
            .unwrap();
        cancel.cancel();
        modkit::StatefulModule::stop(&ingress, cancel).await.unwrap();
    }

    #[tokio::test]
    async fn invalid_bind_addr_fails_start() {
        let ingress = ApiIngress::new(ApiIngressConfig {
            bind_addr: "not-an-address".to_string(),
            ..Default::default()
        });
        let err = modkit::StatefulModule::start(&ingress, CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid bind address"));
    }
}
