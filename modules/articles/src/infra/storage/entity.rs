use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;

use crate::contract::Article;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "articles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub author: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub publication_date: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Article {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            author: m.author,
            content: m.content,
            publication_date: m.publication_date,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
