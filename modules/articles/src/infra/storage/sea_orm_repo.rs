//! SeaORM-backed `ArticlesRepository`, generic over `C: ConnectionTrait`.

use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};
use modkit::api::Page;
use sea_orm::{
    sea_query::{Expr, SimpleExpr},
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::contract::{Article, DailyCount};
use crate::domain::repo::ArticlesRepository;
use crate::infra::storage::entity::{
    ActiveModel as ArticleAM, Column, Entity as ArticleEntity,
};

pub struct SeaOrmArticlesRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmArticlesRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    /// Calendar day of `publication_date` rendered as `YYYY-MM-DD` text.
    fn publication_day(&self) -> SimpleExpr {
        match self.conn.get_database_backend() {
            DbBackend::Postgres => Expr::cust("CAST(DATE(publication_date) AS TEXT)"),
            _ => Expr::cust("DATE(publication_date)"),
        }
    }
}

#[async_trait::async_trait]
impl<C> ArticlesRepository for SeaOrmArticlesRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn insert(&self, a: Article) -> anyhow::Result<Article> {
        let m = ArticleAM {
            title: Set(a.title),
            author: Set(a.author),
            content: Set(a.content),
            publication_date: Set(a.publication_date),
            created_at: Set(a.created_at),
            updated_at: Set(a.updated_at),
            ..Default::default()
        };
        let stored = m.insert(&self.conn).await.context("insert article failed")?;
        Ok(stored.into())
    }

    async fn list_page(&self, page: u64, size: u64) -> anyhow::Result<Page<Article>> {
        let paginator = ArticleEntity::find()
            .order_by_desc(Column::PublicationDate)
            .order_by_desc(Column::Id)
            .paginate(&self.conn, size);

        let total = paginator
            .num_items()
            .await
            .context("count articles failed")?;
        let rows = paginator
            .fetch_page(page)
            .await
            .context("fetch articles page failed")?;

        Ok(Page::new(
            rows.into_iter().map(Article::from).collect(),
            page,
            size,
            total,
        ))
    }

    async fn count_by_publication_day(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> anyhow::Result<Vec<DailyCount>> {
        let day = self.publication_day();
        let rows: Vec<(String, i64)> = ArticleEntity::find()
            .select_only()
            .column_as(day.clone(), "day")
            .column_as(Expr::cust("COUNT(*)"), "total")
            .filter(Column::PublicationDate.gte(from))
            .filter(Column::PublicationDate.lt(to))
            .group_by(day.clone())
            .order_by_asc(day)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("count articles by day failed")?;

        rows.into_iter()
            .map(|(day, total)| {
                let date = NaiveDate::parse_from_str(&day, "%Y-%m-%d")
                    .with_context(|| format!("unexpected day value '{day}'"))?;
                Ok(DailyCount::new(date, u64::try_from(total).unwrap_or(0)))
            })
            .collect()
    }
}
