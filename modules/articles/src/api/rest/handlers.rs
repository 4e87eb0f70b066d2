use std::sync::Arc;

use accounts::contract::AuthenticatedUser;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query,
    },
    http::StatusCode,
    response::Json,
    Extension,
};
use modkit::api::ProblemResponse;
use tracing::info;

use crate::api::rest::dto::{
    ArticleDto, ArticlePageDto, CreateArticleReq, DailyCountDto, ListArticlesQuery,
};
use crate::api::rest::error::{malformed_request, map_domain_error};
use crate::domain::service::Service;

pub const CREATE_PATH: &str = "/api/articles/create";
pub const LIST_PATH: &str = "/api/articles";
pub const STATISTICS_PATH: &str = "/api/statistics";

pub async fn create_article(
    Extension(svc): Extension<Arc<Service>>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<CreateArticleReq>, JsonRejection>,
) -> Result<(StatusCode, Json<ArticleDto>), ProblemResponse> {
    let Json(req) = payload.map_err(|e| malformed_request(e.body_text(), CREATE_PATH))?;
    info!(username = %user.username, "Received request to create an article");

    let article = svc
        .create_article(req.into())
        .await
        .map_err(|e| map_domain_error(&e, CREATE_PATH))?;
    Ok((StatusCode::CREATED, Json(ArticleDto::from(article))))
}

pub async fn list_articles(
    Extension(svc): Extension<Arc<Service>>,
    query: Result<Query<ListArticlesQuery>, QueryRejection>,
) -> Result<Json<ArticlePageDto>, ProblemResponse> {
    let Query(query) = query.map_err(|e| malformed_request(e.body_text(), LIST_PATH))?;
    info!(page = ?query.page, size = ?query.size, "Received request to list articles");

    let page = svc
        .list_articles(query.page, query.size)
        .await
        .map_err(|e| map_domain_error(&e, LIST_PATH))?;
    Ok(Json(page.into()))
}

pub async fn get_statistics(
    Extension(svc): Extension<Arc<Service>>,
) -> Result<Json<Vec<DailyCountDto>>, ProblemResponse> {
    info!("Received request for article statistics");

    let stats = svc
        .statistics_last_7_days()
        .await
        .map_err(|e| map_domain_error(&e, STATISTICS_PATH))?;
    Ok(Json(stats.into_iter().map(DailyCountDto::from).collect()))
}
