//! SeaORM-backed `UsersRepository`, generic over `C: ConnectionTrait` so it
//! also works on a transaction.

use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
};

use crate::contract::User;
use crate::domain::repo::UsersRepository;
use crate::infra::storage::entity::{ActiveModel as UserAM, Column, Entity as UserEntity};

pub struct SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> UsersRepository for SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let found = UserEntity::find()
            .filter(Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("find_by_username failed")?;
        found.map(User::try_from).transpose()
    }

    async fn count(&self) -> anyhow::Result<u64> {
        UserEntity::find()
            .count(&self.conn)
            .await
            .context("count users failed")
    }

    async fn insert(&self, u: User) -> anyhow::Result<User> {
        let m = UserAM {
            username: Set(u.username),
            password_hash: Set(u.password_hash),
            full_name: Set(u.full_name),
            role: Set(u.role.as_str().to_string()),
            enabled: Set(u.enabled),
            ..Default::default()
        };
        let stored = m.insert(&self.conn).await.context("insert user failed")?;
        User::try_from(stored)
    }
}
