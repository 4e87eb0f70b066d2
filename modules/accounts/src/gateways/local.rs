use std::sync::Arc;

use async_trait::async_trait;

use crate::contract::{client::AccountsApi, error::AccountsError, model::User};
use crate::domain::service::Service;

/// In-process `AccountsApi` backed by the domain service.
pub struct AccountsLocalClient {
    service: Arc<Service>,
}

impl AccountsLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl AccountsApi for AccountsLocalClient {
    async fn authenticate(&self, username: &str, password: &str) -> Result<User, AccountsError> {
        self.service
            .authenticate(username, password)
            .await
            .map_err(AccountsError::from)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AccountsError> {
        self.service
            .find_by_username(username)
            .await
            .map_err(AccountsError::from)
    }
}
