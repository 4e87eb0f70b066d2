use async_trait::async_trait;

use crate::contract::{AccountsError, User};

/// Public API of the accounts module for other modules.
#[async_trait]
pub trait AccountsApi: Send + Sync {
    /// Verify a username/password pair and return the matching enabled user.
    async fn authenticate(&self, username: &str, password: &str) -> Result<User, AccountsError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AccountsError>;
}
