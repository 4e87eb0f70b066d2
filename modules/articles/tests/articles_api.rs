use std::sync::Arc;

use accounts::Accounts;
use articles::{
    contract::{ArticlesApi, NewArticle},
    Articles,
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{Days, Local, NaiveDate, NaiveDateTime};
use modkit::{DbModule, Module, ModuleCtx, ModuleCtxBuilder, RestfulModule};
use modkit_db::{ConnectOpts, DbHandle};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    api: Arc<dyn ArticlesApi>,
}

async fn setup_with(modules: Value) -> TestApp {
    let db = Arc::new(
        DbHandle::connect("sqlite::memory:", ConnectOpts::default())
            .await
            .expect("connect in-memory sqlite"),
    );
    let mut cfg = runtime::AppConfig::default();
    if let Value::Object(map) = modules {
        cfg.modules = map.into_iter().collect();
    }
    let base = ModuleCtxBuilder::new(CancellationToken::new())
        .with_db(db.clone())
        .with_config_provider(Arc::new(cfg))
        .build();

    let accounts = Accounts::default();
    accounts.init(&base.clone().for_module("accounts")).await.unwrap();
    accounts.migrate(&db).await.unwrap();

    let articles_ctx: ModuleCtx = base.clone().for_module("articles");
    let articles = Articles::default();
    articles.init(&articles_ctx).await.unwrap();
    articles.migrate(&db).await.unwrap();

    let router = articles.register_rest(&articles_ctx, Router::new()).unwrap();
    let api = base.client_hub().get::<dyn ArticlesApi>().unwrap();
    TestApp { router, api }
}

async fn setup() -> TestApp {
    setup_with(json!({})).await
}

fn basic(credentials: &str) -> String {
    format!("Basic {}", STANDARD.encode(credentials))
}

fn post_json(uri: &str, body: &Value, credentials: Option<&str>) -> Request<Body> {
    let mut req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(c) = credentials {
        req = req.header(header::AUTHORIZATION, basic(c));
    }
    req.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, credentials: Option<&str>) -> Request<Body> {
    let mut req = Request::builder().uri(uri);
    if let Some(c) = credentials {
        req = req.header(header::AUTHORIZATION, basic(c));
    }
    req.body(Body::empty()).unwrap()
}

async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn content_type(resp: &Response) -> Option<&str> {
    resp.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
}

fn at(date: NaiveDate, h: u32) -> NaiveDateTime {
    date.and_hms_opt(h, 0, 0).unwrap()
}

fn new_article(title: &str, published: NaiveDateTime) -> NewArticle {
    NewArticle {
        title: title.to_string(),
        author: "Ann".to_string(),
        content: "Body".to_string(),
        publication_date: Some(published),
    }
}

fn article_body(title: &str) -> Value {
    json!({
        "title": title,
        "author": "Ann Author",
        "content": "Some content",
        "publicationDate": "2024-05-01T10:30:00"
    })
}

#[tokio::test]
async fn create_then_list() {
    let app = setup().await;

    let resp = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/articles/create",
            &article_body("First post"),
            Some("user:user123"),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = json_body(resp).await;
    assert_eq!(created["id"], 1);
    assert_eq!(created["title"], "First post");
    assert_eq!(created["author"], "Ann Author");
    assert_eq!(created["content"], "Some content");
    assert_eq!(created["publicationDate"], "2024-05-01T10:30:00");
    assert!(created["createdAt"].is_string());
    assert!(created["updatedAt"].is_null());

    let resp = app.router.oneshot(get("/api/articles", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page = json_body(resp).await;
    assert_eq!(page["content"].as_array().unwrap().len(), 1);
    assert_eq!(page["content"][0]["title"], "First post");
    assert_eq!(page["content"][0]["id"], created["id"]);
    assert_eq!(page["page"], 0);
    assert_eq!(page["size"], 10);
    assert_eq!(page["totalElements"], 1);
    assert_eq!(page["totalPages"], 1);
}

#[tokio::test]
async fn ids_are_unique() {
    let app = setup().await;
    let mut ids = Vec::new();
    for title in ["a", "b", "c"] {
        let resp = app
            .router
            .clone()
            .oneshot(post_json(
                "/api/articles/create",
                &article_body(title),
                Some("admin:admin123"),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        ids.push(json_body(resp).await["id"].as_i64().unwrap());
    }
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn create_requires_authentication() {
    let app = setup().await;

    let anon = app
        .router
        .clone()
        .oneshot(post_json("/api/articles/create", &article_body("x"), None))
        .await
        .unwrap();
    assert_eq!(anon.status(), StatusCode::UNAUTHORIZED);
    assert!(anon.headers().contains_key(header::WWW_AUTHENTICATE));

    let wrong = app
        .router
        .oneshot(post_json(
            "/api/articles/create",
            &article_body("x"),
            Some("user:nope"),
        ))
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn title_longer_than_100_characters_is_rejected() {
    let app = setup().await;

    let resp = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/articles/create",
            &article_body(&"t".repeat(101)),
            Some("user:user123"),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(content_type(&resp), Some("application/problem+json"));
    let problem = json_body(resp).await;
    assert_eq!(problem["status"], 400);
    assert_eq!(problem["errors"][0]["pointer"], "/title");

    let ok = app
        .router
        .oneshot(post_json(
            "/api/articles/create",
            &article_body(&"t".repeat(100)),
            Some("user:user123"),
        ))
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn missing_fields_are_reported_individually() {
    let app = setup().await;

    let resp = app
        .router
        .oneshot(post_json(
            "/api/articles/create",
            &json!({ "title": "" }),
            Some("user:user123"),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let problem = json_body(resp).await;
    let pointers: Vec<&str> = problem["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["pointer"].as_str())
        .collect();
    assert_eq!(
        pointers,
        vec!["/title", "/author", "/content", "/publicationDate"]
    );
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = setup().await;
    let req = Request::builder()
        .method("POST")
        .uri("/api/articles/create")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, basic("user:user123"))
        .body(Body::from("{not json"))
        .unwrap();

    let resp = app.router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(content_type(&resp), Some("application/problem+json"));
}

#[tokio::test]
async fn listing_is_newest_first_and_paginated() {
    let app = setup().await;
    let day = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
    app.api.create_article(new_article("old", at(day, 8))).await.unwrap();
    app.api
        .create_article(new_article("newest", at(day + Days::new(2), 8)))
        .await
        .unwrap();
    app.api
        .create_article(new_article("middle", at(day + Days::new(1), 8)))
        .await
        .unwrap();

    let first = json_body(
        app.router
            .clone()
            .oneshot(get("/api/articles?page=0&size=2", None))
            .await
            .unwrap(),
    )
    .await;
    let titles: Vec<&str> = first["content"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|a| a["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["newest", "middle"]);
    assert_eq!(first["totalElements"], 3);
    assert_eq!(first["totalPages"], 2);

    let second = json_body(
        app.router
            .oneshot(get("/api/articles?page=1&size=2", None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(second["content"][0]["title"], "old");
    assert_eq!(second["page"], 1);
}

#[tokio::test]
async fn page_size_bounds() {
    let app = setup_with(json!({ "articles": { "max_page_size": 20 } })).await;

    let zero = app
        .router
        .clone()
        .oneshot(get("/api/articles?size=0", None))
        .await
        .unwrap();
    assert_eq!(zero.status(), StatusCode::BAD_REQUEST);

    let negative = app
        .router
        .clone()
        .oneshot(get("/api/articles?page=-1", None))
        .await
        .unwrap();
    assert_eq!(negative.status(), StatusCode::BAD_REQUEST);

    let huge = app
        .router
        .clone()
        .oneshot(get("/api/articles?page=18446744073709551615&size=10", None))
        .await
        .unwrap();
    assert_eq!(huge.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(huge).await["code"], "ARTICLES_INVALID_PAGE");

    let past_offset_range = app
        .router
        .clone()
        .oneshot(get("/api/articles?page=922337203685477581&size=10", None))
        .await
        .unwrap();
    assert_eq!(past_offset_range.status(), StatusCode::BAD_REQUEST);

    let capped = app
        .router
        .oneshot(get("/api/articles?size=1000", None))
        .await
        .unwrap();
    assert_eq!(capped.status(), StatusCode::OK);
    assert_eq!(json_body(capped).await["size"], 20);
}

#[tokio::test]
async fn statistics_require_admin() {
    let app = setup().await;

    let anon = app
        .router
        .clone()
        .oneshot(get("/api/statistics", None))
        .await
        .unwrap();
    assert_eq!(anon.status(), StatusCode::UNAUTHORIZED);

    let user = app
        .router
        .oneshot(get("/api/statistics", Some("user:user123")))
        .await
        .unwrap();
    assert_eq!(user.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn statistics_cover_the_last_seven_days() {
    let app = setup().await;
    let today = Local::now().date_naive();
    app.api.create_article(new_article("t1", at(today, 0))).await.unwrap();
    app.api.create_article(new_article("t2", at(today, 0))).await.unwrap();
    app.api
        .create_article(new_article("older", at(today - Days::new(3), 12)))
        .await
        .unwrap();
    app.api
        .create_article(new_article("outside", at(today - Days::new(7), 12)))
        .await
        .unwrap();

    let resp = app
        .router
        .oneshot(get("/api/statistics", Some("admin:admin123")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let stats = json_body(resp).await;
    let stats = stats.as_array().unwrap();

    assert_eq!(stats.len(), 7);
    let start = today - Days::new(6);
    assert_eq!(stats[0]["date"], start.format("%Y-%m-%d").to_string());
    assert_eq!(stats[6]["date"], today.format("%Y-%m-%d").to_string());
    let counts: Vec<u64> = stats.iter().filter_map(|s| s["count"].as_u64()).collect();
    assert_eq!(counts, vec![0, 0, 0, 1, 0, 0, 2]);
}
