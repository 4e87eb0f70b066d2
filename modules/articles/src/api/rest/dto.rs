use chrono::{NaiveDate, NaiveDateTime};
use modkit::api::Page;
use serde::{Deserialize, Serialize};

use crate::contract::model::{Article, DailyCount, NewArticle};

/// Body of `POST /api/articles/create`. Absent fields become validation errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateArticleReq {
    pub title: Option<String>,
    pub author: Option<String>,
    pub content: Option<String>,
    pub publication_date: Option<NaiveDateTime>,
}

impl From<CreateArticleReq> for NewArticle {
    fn from(req: CreateArticleReq) -> Self {
        Self {
            title: req.title.unwrap_or_default(),
            author: req.author.unwrap_or_default(),
            content: req.content.unwrap_or_default(),
            publication_date: req.publication_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDto {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub content: String,
    pub publication_date: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<Article> for ArticleDto {
    fn from(a: Article) -> Self {
        Self {
            id: a.id,
            title: a.title,
            author: a.author,
            content: a.content,
            publication_date: a.publication_date,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePageDto {
    pub content: Vec<ArticleDto>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl From<Page<Article>> for ArticlePageDto {
    fn from(p: Page<Article>) -> Self {
        let p = p.map(ArticleDto::from);
        Self {
            content: p.items,
            page: p.page,
            size: p.size,
            total_elements: p.total_elements,
            total_pages: p.total_pages,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DailyCountDto {
    pub date: NaiveDate,
    pub count: u64,
}

impl From<DailyCount> for DailyCountDto {
    fn from(c: DailyCount) -> Self {
        Self {
            date: c.date,
            count: c.count,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListArticlesQuery {
    pub page: Option<u64>,
    pub size: Option<u64>,
}
