use async_trait::async_trait;
use modkit::api::Page;

use crate::contract::{Article, ArticlesError, DailyCount, NewArticle};

/// Public API of the articles module for other modules.
#[async_trait]
pub trait ArticlesApi: Send + Sync {
    async fn create_article(&self, new_article: NewArticle) -> Result<Article, ArticlesError>;

    /// Newest publication date first. `None` falls back to configured defaults.
    async fn list_articles(
        &self,
        page: Option<u64>,
        size: Option<u64>,
    ) -> Result<Page<Article>, ArticlesError>;

    /// One entry per day for the last seven days, oldest first.
    async fn statistics_last_7_days(&self) -> Result<Vec<DailyCount>, ArticlesError>;
}
