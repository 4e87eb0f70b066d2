use thiserror::Error;

use crate::contract::FieldError;

/// Errors that are safe to expose to other modules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArticlesError {
    #[error("Validation failed for {} field(s)", .errors.len())]
    Validation { errors: Vec<FieldError> },

    #[error("Invalid page request: {message}")]
    InvalidPageRequest { message: String },

    #[error("Internal error")]
    Internal,
}

impl From<crate::domain::error::DomainError> for ArticlesError {
    fn from(e: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match e {
            Validation { errors } => Self::Validation { errors },
            InvalidPageRequest { message } => Self::InvalidPageRequest { message },
            Database { .. } => Self::Internal,
        }
    }
}
