use std::sync::Arc;

use accounts::contract::{AccountsApi, Role};
use accounts::{authenticate_basic, require_authenticated, require_role};
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Extension, Router,
};

use crate::api::rest::handlers::{self, CREATE_PATH, LIST_PATH, STATISTICS_PATH};
use crate::domain::service::Service;

/// Attach the articles endpoints to `router`.
///
/// - `POST /api/articles/create`: any authenticated user
/// - `GET  /api/statistics`: ADMIN only
/// - `GET  /api/articles`: public
pub fn register_routes(
    router: Router,
    service: Arc<Service>,
    accounts: Arc<dyn AccountsApi>,
) -> anyhow::Result<Router> {
    let authoring = Router::new()
        .route(CREATE_PATH, post(handlers::create_article))
        .route_layer(from_fn(require_authenticated));

    let statistics = Router::new()
        .route(STATISTICS_PATH, get(handlers::get_statistics))
        .route_layer(from_fn_with_state(Role::Admin, require_role));

    let secured = authoring
        .merge(statistics)
        .route_layer(from_fn_with_state(accounts, authenticate_basic));

    let public = Router::new().route(LIST_PATH, get(handlers::list_articles));

    let articles = secured.merge(public).layer(Extension(service));
    Ok(router.merge(articles))
}
