use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::contract::model::{NewUser, User};
use crate::domain::error::DomainError;
use crate::domain::password;
use crate::domain::repo::UsersRepository;

/// Account lookup, credential verification and bootstrap seeding.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsersRepository>,
}

impl Service {
    pub fn new(repo: Arc<dyn UsersRepository>) -> Self {
        Self { repo }
    }

    #[instrument(name = "accounts.service.find_by_username", skip(self))]
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.repo
            .find_by_username(username)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// Unknown user, disabled user and wrong password all yield `InvalidCredentials`,
    /// and each of them runs exactly one hash verification.
    #[instrument(name = "accounts.service.authenticate", skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let user = self.find_by_username(username).await?;
        let stored = hash_to_verify(user.as_ref()).to_owned();

        let candidate = password.to_owned();
        let matches = tokio::task::spawn_blocking(move || {
            password::verify_password(&candidate, &stored)
        })
        .await
        .map_err(|e| DomainError::password_hash(e.to_string()))?;

        match user {
            None => {
                debug!("Unknown user");
                Err(DomainError::InvalidCredentials)
            }
            Some(u) if !u.enabled => {
                debug!("User is disabled");
                Err(DomainError::InvalidCredentials)
            }
            Some(_) if !matches => {
                debug!("Password mismatch");
                Err(DomainError::InvalidCredentials)
            }
            Some(u) => Ok(u),
        }
    }

    #[instrument(
        name = "accounts.service.create_user",
        skip(self, new_user),
        fields(username = %new_user.username, role = %new_user.role)
    )]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        if self.find_by_username(&new_user.username).await?.is_some() {
            return Err(DomainError::username_taken(new_user.username));
        }

        let NewUser {
            username,
            password,
            full_name,
            role,
        } = new_user;
        let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&password))
            .await
            .map_err(|e| DomainError::password_hash(e.to_string()))??;

        let user = self
            .repo
            .insert(User {
                id: 0,
                username,
                password_hash,
                full_name,
                role,
                enabled: true,
            })
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!(user_id = user.id, "Created user");
        Ok(user)
    }

    /// Create `users` only when no account exists yet. Returns how many were created.
    #[instrument(name = "accounts.service.seed_users", skip_all)]
    pub async fn seed_users(&self, users: Vec<NewUser>) -> Result<usize, DomainError> {
        let existing = self
            .repo
            .count()
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        if existing > 0 {
            info!(existing, "Users already present, skipping seeding");
            return Ok(0);
        }

        let mut created = 0;
        for user in users {
            self.create_user(user).await?;
            created += 1;
        }
        info!(created, "Seeded default users");
        Ok(created)
    }
}

/// The stored hash of an enabled account, otherwise the dummy hash.
fn hash_to_verify(user: Option<&User>) -> &str {
    match user {
        Some(u) if u.enabled => &u.password_hash,
        _ => password::DUMMY_HASH,
    }
}
