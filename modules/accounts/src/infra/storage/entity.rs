use sea_orm::entity::prelude::*;

use crate::contract::model::{Role, User};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    /// `ADMIN` or `USER`.
    pub role: String,
    pub enabled: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for User {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let role: Role = m.role.parse()?;
        Ok(User {
            id: m.id,
            username: m.username,
            password_hash: m.password_hash,
            full_name: m.full_name,
            role,
            enabled: m.enabled,
        })
    }
}
