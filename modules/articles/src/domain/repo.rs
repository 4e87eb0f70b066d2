use async_trait::async_trait;
use chrono::NaiveDateTime;
use modkit::api::Page;

use crate::contract::{Article, DailyCount};

/// Persistence port for articles.
#[async_trait]
pub trait ArticlesRepository: Send + Sync {
    /// Persist `article` (its `id` is ignored) and return the stored row.
    async fn insert(&self, article: Article) -> anyhow::Result<Article>;

    /// Page `page` (zero-based) of `size` rows, newest publication date first.
    async fn list_page(&self, page: u64, size: u64) -> anyhow::Result<Page<Article>>;

    /// Per-day counts of articles published in `[from, to)`, only for days
    /// that have at least one article.
    async fn count_by_publication_day(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> anyhow::Result<Vec<DailyCount>>;
}
