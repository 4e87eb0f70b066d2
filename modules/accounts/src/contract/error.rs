use thiserror::Error;

/// Errors that are safe to expose to other modules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountsError {
    /// Unknown user, disabled user and wrong password are indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username '{username}' is already taken")]
    UsernameTaken { username: String },

    #[error("Internal error")]
    Internal,
}

impl From<crate::domain::error::DomainError> for AccountsError {
    fn from(e: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match e {
            InvalidCredentials => Self::InvalidCredentials,
            UsernameTaken { username } => Self::UsernameTaken { username },
            PasswordHash { .. } | Database { .. } => Self::Internal,
        }
    }
}
