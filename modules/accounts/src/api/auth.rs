//! HTTP Basic authentication and role guards.
//!
//! `authenticate_basic` resolves the caller and stores an `AuthenticatedUser`
//! in request extensions; the guards only read that extension. Layer order on
//! a route: `authenticate_basic` outermost, then a guard, then the handler.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use modkit::api::problem;
use tracing::{debug, error};

use crate::contract::{AccountsApi, AccountsError, AuthenticatedUser, Role};

/// Value of the `WWW-Authenticate` challenge sent with every 401.
pub const BASIC_CHALLENGE: &str = r#"Basic realm="blog""#;

/// Decode `Basic <base64(username:password)>`. The password may contain ':'.
pub fn parse_basic_credentials(value: &HeaderValue) -> Option<(String, String)> {
    let raw = value.to_str().ok()?;
    let (scheme, encoded) = raw.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    if username.is_empty() {
        return None;
    }
    Some((username.to_string(), password.to_string()))
}

fn challenge(detail: &str) -> Response {
    problem::unauthorized(detail)
        .with_header(
            header::WWW_AUTHENTICATE,
            HeaderValue::from_static(BASIC_CHALLENGE),
        )
        .into_response()
}

/// Resolve the caller from `Authorization: Basic ...`.
/// No header leaves the request anonymous; bad credentials end it with 401.
pub async fn authenticate_basic(
    State(accounts): State<Arc<dyn AccountsApi>>,
    mut req: Request,
    next: Next,
) -> Response {
    let credentials = req
        .headers()
        .get(header::AUTHORIZATION)
        .map(parse_basic_credentials);
    let Some(credentials) = credentials else {
        return next.run(req).await;
    };
    let Some((username, password)) = credentials else {
        debug!("Malformed Authorization header");
        return challenge("Malformed Authorization header");
    };

    match accounts.authenticate(&username, &password).await {
        Ok(user) => {
            debug!(username = %user.username, role = %user.role, "Request authenticated");
            req.extensions_mut().insert(AuthenticatedUser::from(&user));
            next.run(req).await
        }
        Err(AccountsError::InvalidCredentials) => {
            debug!(%username, "Rejected credentials");
            challenge("Invalid username or password")
        }
        Err(e) => {
            error!(error = %e, "Authentication backend failed");
            problem::internal_error("An internal error occurred").into_response()
        }
    }
}

/// 401 unless an earlier layer authenticated the request.
pub async fn require_authenticated(req: Request, next: Next) -> Response {
    if req.extensions().get::<AuthenticatedUser>().is_none() {
        return challenge("Authentication required");
    }
    next.run(req).await
}

/// 401 when anonymous, 403 when the caller lacks `role`.
/// Use with `axum::middleware::from_fn_with_state(Role::Admin, require_role)`.
pub async fn require_role(State(role): State<Role>, req: Request, next: Next) -> Response {
    let rejection = match req.extensions().get::<AuthenticatedUser>() {
        None => Some(challenge("Authentication required")),
        Some(user) if !user.has_role(role) => {
            debug!(username = %user.username, required = %role, "Insufficient role");
            Some(problem::forbidden(format!("Role {role} required")).into_response())
        }
        Some(_) => None,
    };
    match rejection {
        Some(resp) => resp,
        None => next.run(req).await,
    }
}
