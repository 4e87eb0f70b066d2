use anyhow::Context as _;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::client_hub::ClientHub;

/// Provider of module-specific configuration (raw JSON sections only).
pub trait ConfigProvider: Send + Sync {
    /// Returns raw JSON section for the module, if any.
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value>;
}

impl ConfigProvider for runtime::AppConfig {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.modules.get(module_name)
    }
}

#[derive(Clone)]
pub struct ModuleCtx {
    db: Option<Arc<modkit_db::DbHandle>>,
    config_provider: Option<Arc<dyn ConfigProvider>>,
    client_hub: Arc<ClientHub>,
    cancellation_token: CancellationToken,
    module_name: Option<Arc<str>>,
}

pub struct ModuleCtxBuilder {
    inner: ModuleCtx,
}

impl ModuleCtxBuilder {
    pub fn new(token: CancellationToken) -> Self {
        Self {
            inner: ModuleCtx {
                db: None,
                config_provider: None,
                client_hub: Arc::new(ClientHub::default()),
                cancellation_token: token,
                module_name: None,
            },
        }
    }

    pub fn with_db(mut self, db: Arc<modkit_db::DbHandle>) -> Self {
        self.inner.db = Some(db);
        self
    }

    pub fn with_config_provider(mut self, p: Arc<dyn ConfigProvider>) -> Self {
        self.inner.config_provider = Some(p);
        self
    }

    pub fn build(self) -> ModuleCtx {
        self.inner
    }
}

impl ModuleCtx {
    /// Scope context to a specific module name (used by the registry).
    pub fn for_module(mut self, name: &str) -> Self {
        self.module_name = Some(Arc::<str>::from(name));
        self
    }

    pub fn db(&self) -> Option<Arc<modkit_db::DbHandle>> {
        self.db.clone()
    }

    pub fn db_required(&self) -> anyhow::Result<Arc<modkit_db::DbHandle>> {
        self.db.clone().ok_or_else(|| {
            anyhow::anyhow!(
                "module '{}' requires a database",
                self.current_module().unwrap_or("<unscoped>")
            )
        })
    }

    pub fn client_hub(&self) -> Arc<ClientHub> {
        self.client_hub.clone()
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation_token
    }

    pub fn current_module(&self) -> Option<&str> {
        self.module_name.as_deref()
    }

    /// Deserialize `modules.<current module>` into `T`.
    /// A missing section yields `T::default()`; an invalid one is an error.
    pub fn module_config<T: DeserializeOwned + Default>(&self) -> anyhow::Result<T> {
        let raw = match (&self.module_name, &self.config_provider) {
            (Some(name), Some(p)) => p.get_module_config(name).map(|v| (name, v)),
            _ => None,
        };

        match raw {
            Some((name, value)) => serde_json::from_value(value.clone())
                .with_context(|| format!("invalid configuration for module '{name}'")),
            None => Ok(T::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct PagingCfg {
        #[serde(default)]
        max_page_size: u64,
    }

    fn ctx_with(modules: serde_json::Value) -> ModuleCtx {
        let mut cfg = runtime::AppConfig::default();
        if let serde_json::Value::Object(map) = modules {
            cfg.modules = map.into_iter().collect();
        }
        ModuleCtxBuilder::new(CancellationToken::new())
            .with_config_provider(Arc::new(cfg))
            .build()
    }

    #[test]
    fn scoped_module_config_is_typed() {
        let ctx = ctx_with(serde_json::json!({ "articles": { "max_page_size": 50 } }))
            .for_module("articles");
        let cfg: PagingCfg = ctx.module_config().unwrap();
        assert_eq!(cfg, PagingCfg { max_page_size: 50 });
    }

    #[test]
    fn missing_section_falls_back_to_default() {
        let ctx = ctx_with(serde_json::json!({})).for_module("articles");
        let cfg: PagingCfg = ctx.module_config().unwrap();
        assert_eq!(cfg, PagingCfg::default());
    }

    #[test]
    fn invalid_section_is_an_error() {
        let ctx = ctx_with(serde_json::json!({ "articles": { "max_page_size": "lots" } }))
            .for_module("articles");
        let err = ctx.module_config::<PagingCfg>().unwrap_err();
        assert!(err.to_string().contains("articles"));
    }

    #[test]
    fn scoping_keeps_the_run_token() {
        let token = CancellationToken::new();
        let ctx = ModuleCtxBuilder::new(token.clone()).build().for_module("articles");
        assert_eq!(ctx.current_module(), Some("articles"));
        token.cancel();
        assert!(ctx.cancellation_token().is_cancelled());
    }

    #[test]
    fn db_required_names_the_module() {
        let ctx = ctx_with(serde_json::json!({})).for_module("accounts");
        let err = ctx.db_required().unwrap_err();
        assert!(err.to_string().contains("accounts"));
    }
}
