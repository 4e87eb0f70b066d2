use async_trait::async_trait;

use crate::contract::User;

/// Persistence port for user accounts.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;

    async fn count(&self) -> anyhow::Result<u64>;

    /// Insert a user; `id` on the input is ignored and the stored row is returned.
    async fn insert(&self, user: User) -> anyhow::Result<User>;
}
