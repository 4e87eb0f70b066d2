//! Type-safe hub of in-process clients.
//!
//! Providers register an implementation once under its interface type; consumers
//! fetch by that type: `get::<dyn accounts::AccountsApi>()`.
//! Key = `type_name::<T>()`, which works for `T = dyn Trait`.

use parking_lot::RwLock;
use std::{any::Any, collections::HashMap, sync::Arc};

type Boxed = Box<dyn Any + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum ClientHubError {
    #[error("client not found: type={0}")]
    NotFound(&'static str),

    #[error("type mismatch in hub for type={0}")]
    TypeMismatch(&'static str),
}

#[derive(Default)]
pub struct ClientHub {
    map: RwLock<HashMap<&'static str, Boxed>>,
}

impl ClientHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client under the interface type `T`, replacing any previous one.
    pub fn register<T>(&self, client: Arc<T>)
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.map
            .write()
            .insert(std::any::type_name::<T>(), Box::new(client));
    }

    pub fn get<T>(&self) -> Result<Arc<T>, ClientHubError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let key = std::any::type_name::<T>();
        let r = self.map.read();
        let boxed = r.get(key).ok_or(ClientHubError::NotFound(key))?;

        // Stored value is exactly `Arc<T>`.
        boxed
            .downcast_ref::<Arc<T>>()
            .cloned()
            .ok_or(ClientHubError::TypeMismatch(key))
    }

    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }
}
