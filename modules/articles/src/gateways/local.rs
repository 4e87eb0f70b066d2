use std::sync::Arc;

use async_trait::async_trait;
use modkit::api::Page;

use crate::contract::{
    client::ArticlesApi,
    error::ArticlesError,
    model::{Article, DailyCount, NewArticle},
};
use crate::domain::service::Service;

/// In-process `ArticlesApi` backed by the domain service.
pub struct ArticlesLocalClient {
    service: Arc<Service>,
}

impl ArticlesLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ArticlesApi for ArticlesLocalClient {
    async fn create_article(&self, new_article: NewArticle) -> Result<Article, ArticlesError> {
        self.service
            .create_article(new_article)
            .await
            .map_err(ArticlesError::from)
    }

    async fn list_articles(
        &self,
        page: Option<u64>,
        size: Option<u64>,
    ) -> Result<Page<Article>, ArticlesError> {
        self.service
            .list_articles(page, size)
            .await
            .map_err(ArticlesError::from)
    }

    async fn statistics_last_7_days(&self) -> Result<Vec<DailyCount>, ArticlesError> {
        self.service
            .statistics_last_7_days()
            .await
            .map_err(ArticlesError::from)
    }
}
