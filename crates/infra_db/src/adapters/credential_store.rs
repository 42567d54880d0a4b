//! PostgreSQL Credential Store

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError, UserId};
use domain_auth::{CredentialStore, User};

use crate::error::DatabaseError;
use crate::repositories::{UserRepository, UserRow};

/// PostgreSQL-backed implementation of the `CredentialStore` port
///
/// Duplicate emails are rejected by the `users.email` unique constraint and
/// reported as `PortError::Conflict`.
#[derive(Debug, Clone)]
pub struct PostgresCredentialStore {
    repository: UserRepository,
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresCredentialStore {}

#[async_trait]
impl HealthCheckable for PostgresCredentialStore {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-credential-store").await
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    #[instrument(skip(self, email))]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, PortError> {
        debug!("Looking up user by email");
        let row = self.repository.find_by_email(email).await?;
        Ok(row.map(row_to_user))
    }

    #[instrument(skip(self, email, password_hash))]
    async fn insert_user(&self, email: &str, password_hash: &str) -> Result<User, PortError> {
        let row = self
            .repository
            .insert(email, password_hash)
            .await
            .map_err(|e| match e {
                DatabaseError::DuplicateEntry(_) => {
                    PortError::conflict("email is already registered")
                }
                other => PortError::from(other),
            })?;

        debug!(user_id = row.id, "User inserted");
        Ok(row_to_user(row))
    }
}

fn row_to_user(row: UserRow) -> User {
    User {
        id: UserId::new(row.id),
        email: row.email,
        password_hash: row.password_hash,
    }
}
