use axum::http::StatusCode;
use modkit::api::problem::{Problem, ProblemResponse, ValidationError};

use crate::domain::error::DomainError;

pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    instance: &str,
) -> ProblemResponse {
    Problem::new(status, title, detail)
        .with_type(format!("https://errors.inkwell.dev/{code}"))
        .with_code(code)
        .with_instance(instance)
        .into()
}

/// Request body or query string that could not be decoded.
pub fn malformed_request(detail: impl Into<String>, instance: &str) -> ProblemResponse {
    from_parts(
        StatusCode::BAD_REQUEST,
        "ARTICLES_MALFORMED_REQUEST",
        "Malformed request",
        detail,
        instance,
    )
}

/// Map a domain error to an RFC 9457 response.
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::Validation { errors } => {
            let mut resp = from_parts(
                StatusCode::BAD_REQUEST,
                "ARTICLES_VALIDATION",
                "Validation error",
                e.to_string(),
                instance,
            );
            resp.problem = resp.problem.with_errors(
                errors
                    .iter()
                    .map(|fe| ValidationError::field(fe.field, fe.message.clone()))
                    .collect(),
            );
            resp
        }
        DomainError::InvalidPageRequest { message } => from_parts(
            StatusCode::BAD_REQUEST,
            "ARTICLES_INVALID_PAGE",
            "Invalid page request",
            message.clone(),
            instance,
        ),
        DomainError::Database { .. } => {
            // Details stay in the log.
            tracing::error!(error = ?e, "Database error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "ARTICLES_INTERNAL",
                "Internal Server Error",
                "An internal error occurred",
                instance,
            )
        }
    }
}
