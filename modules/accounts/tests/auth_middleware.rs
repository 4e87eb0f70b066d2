use std::sync::Arc;

use accounts::{
    authenticate_basic,
    config::AccountsConfig,
    contract::{AccountsApi, AuthenticatedUser, Role},
    domain::service::Service,
    gateways::local::AccountsLocalClient,
    infra::storage::{migrations::Migrator, SeaOrmUsersRepository},
    require_authenticated, require_role,
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Extension, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use modkit_db::{ConnectOpts, DbHandle};
use sea_orm_migration::MigratorTrait;
use tower::ServiceExt;

async fn accounts_api() -> Arc<dyn AccountsApi> {
    let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default())
        .await
        .unwrap();
    Migrator::up(db.seaorm(), None).await.unwrap();
    let svc = Arc::new(Service::new(Arc::new(SeaOrmUsersRepository::new(db.sea()))));
    svc.seed_users(AccountsConfig::default().default_users())
        .await
        .unwrap();
    Arc::new(AccountsLocalClient::new(svc))
}

async fn whoami(user: Option<Extension<AuthenticatedUser>>) -> String {
    user.map(|Extension(u)| u.username)
        .unwrap_or_else(|| "anonymous".to_string())
}

async fn app() -> Router {
    let api = accounts_api().await;
    let protected = Router::new()
        .route("/me", get(whoami))
        .route_layer(from_fn(require_authenticated));
    let admin = Router::new()
        .route("/admin", get(whoami))
        .route_layer(from_fn_with_state(Role::Admin, require_role));
    Router::new()
        .route("/public", get(whoami))
        .merge(protected)
        .merge(admin)
        .layer(from_fn_with_state(api, authenticate_basic))
}

fn get_as(uri: &str, credentials: Option<&str>) -> Request<Body> {
    let mut req = Request::builder().uri(uri);
    if let Some(c) = credentials {
        req = req.header(header::AUTHORIZATION, format!("Basic {}", STANDARD.encode(c)));
    }
    req.body(Body::empty()).unwrap()
}

async fn body_text(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn anonymous_requests_reach_public_routes() {
    let resp = app().await.oneshot(get_as("/public", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "anonymous");
}

#[tokio::test]
async fn protected_route_challenges_anonymous_callers() {
    let resp = app().await.oneshot(get_as("/me", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers()
            .get(header::WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok()),
        Some(r#"Basic realm="blog""#)
    );
    assert_eq!(
        resp.headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("application/problem+json")
    );
}

#[tokio::test]
async fn valid_credentials_identify_the_caller() {
    let resp = app()
        .await
        .oneshot(get_as("/me", Some("user:user123")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "user");
}

#[tokio::test]
async fn wrong_password_is_rejected_even_on_public_routes() {
    let resp = app()
        .await
        .oneshot(get_as("/public", Some("user:wrong")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
}

#[tokio::test]
async fn malformed_header_is_rejected() {
    let req = Request::builder()
        .uri("/me")
        .header(header::AUTHORIZATION, "Basic %%%")
        .body(Body::empty())
        .unwrap();
    let resp = app().await.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn role_guard_distinguishes_401_and_403() {
    let router = app().await;

    let anon = router.clone().oneshot(get_as("/admin", None)).await.unwrap();
    assert_eq!(anon.status(), StatusCode::UNAUTHORIZED);

    let user = router
        .clone()
        .oneshot(get_as("/admin", Some("user:user123")))
        .await
        .unwrap();
    assert_eq!(user.status(), StatusCode::FORBIDDEN);

    let admin = router
        .oneshot(get_as("/admin", Some("admin:admin123")))
        .await
        .unwrap();
    assert_eq!(admin.status(), StatusCode::OK);
    assert_eq!(body_text(admin).await, "admin");
}
