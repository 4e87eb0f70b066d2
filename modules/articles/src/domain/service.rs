use std::sync::Arc;

use chrono::{Days, Local, NaiveDate, NaiveDateTime, SubsecRound};
use modkit::api::Page;
use tracing::{debug, info, instrument};

use crate::contract::model::{Article, DailyCount, FieldError, NewArticle};
use crate::domain::error::DomainError;
use crate::domain::repo::ArticlesRepository;
use crate::domain::statistics::fill_missing_dates;
use crate::domain::validation::validate_new_article;

/// Days covered by the statistics window, today included.
pub const STATISTICS_WINDOW_DAYS: u64 = 7;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

/// Article creation, listing and publication statistics.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn ArticlesRepository>,
    config: ServiceConfig,
}

impl Service {
    pub fn new(repo: Arc<dyn ArticlesRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    #[instrument(name = "articles.service.create_article", skip(self, new_article), fields(title = %new_article.title))]
    pub async fn create_article(&self, new_article: NewArticle) -> Result<Article, DomainError> {
        info!("Creating article");

        let errors = validate_new_article(&new_article);
        if !errors.is_empty() {
            return Err(DomainError::validation(errors));
        }
        let publication_date = new_article.publication_date.ok_or_else(|| {
            DomainError::validation(vec![FieldError::new(
                "publicationDate",
                "Publication date is required",
            )])
        })?;

        let article = Article {
            id: 0,
            title: new_article.title,
            author: new_article.author,
            content: new_article.content,
            publication_date,
            created_at: Local::now().naive_local().trunc_subsecs(0),
            updated_at: None,
        };

        let stored = self
            .repo
            .insert(article)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!(article_id = stored.id, "Article created");
        Ok(stored)
    }

    #[instrument(name = "articles.service.list_articles", skip(self))]
    pub async fn list_articles(
        &self,
        page: Option<u64>,
        size: Option<u64>,
    ) -> Result<Page<Article>, DomainError> {
        let page = page.unwrap_or(0);
        let size = size.unwrap_or(self.config.default_page_size);
        if size == 0 {
            return Err(DomainError::invalid_page_request(
                "Page size must be at least 1",
            ));
        }
        let size = size.min(self.config.max_page_size);
        // The store turns page * size into a signed 64-bit OFFSET.
        if page
            .checked_mul(size)
            .map_or(true, |offset| offset > i64::MAX as u64)
        {
            return Err(DomainError::invalid_page_request(format!(
                "Page {page} is out of range"
            )));
        }
        debug!(page, size, "Listing articles");

        let result = self
            .repo
            .list_page(page, size)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        debug!(
            returned = result.items.len(),
            total = result.total_elements,
            "Listed articles"
        );
        Ok(result)
    }

    /// Daily publication counts for the seven days ending today (local date).
    pub async fn statistics_last_7_days(&self) -> Result<Vec<DailyCount>, DomainError> {
        self.statistics_for_window(Local::now().date_naive()).await
    }

    /// Daily publication counts for the seven days ending at `today`.
    #[instrument(name = "articles.service.statistics", skip(self))]
    pub async fn statistics_for_window(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<DailyCount>, DomainError> {
        let (start, end) = window(today);
        let (from, to) = (start_of_day(start), start_of_day(end + Days::new(1)));
        debug!(%start, %end, "Computing article statistics");

        let counts = self
            .repo
            .count_by_publication_day(from, to)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        Ok(fill_missing_dates(&counts, start, end))
    }
}

fn window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today - Days::new(STATISTICS_WINDOW_DAYS - 1), today)
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}
