use chrono::{NaiveDate, NaiveDateTime};

/// A stored blog article. Timestamps are local date-times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub content: String,
    pub publication_date: NaiveDateTime,
    pub created_at: NaiveDateTime,
    /// Set on mutation; no update operation exists yet.
    pub updated_at: Option<NaiveDateTime>,
}

/// Creation input. Checked by `domain::validation::validate_new_article`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewArticle {
    pub title: String,
    pub author: String,
    pub content: String,
    pub publication_date: Option<NaiveDateTime>,
}

/// Number of articles published on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}

impl DailyCount {
    pub fn new(date: NaiveDate, count: u64) -> Self {
        Self { date, count }
    }
}

/// One rejected input field. `field` uses the wire name (`publicationDate`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}
