//! Identity Domain Ports
//!
//! The `CredentialStore` trait is the only thing the identity domain needs
//! from persistence. Implementations:
//!
//! - **PostgreSQL Adapter**: `infra_db::PostgresCredentialStore`
//! - **In-memory Adapter**: `test_utils::InMemoryCredentialStore`

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PortError};

use crate::user::User;

/// Persistence port for user records
#[async_trait]
pub trait CredentialStore: DomainPort + HealthCheckable {
    /// Looks up a user by exact email
    ///
    /// # Returns
    ///
    /// `Ok(None)` when no user has this email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, PortError>;

    /// Persists a new user and returns it with its assigned identifier
    ///
    /// # Errors
    ///
    /// `PortError::Conflict` when the email is already registered
    async fn insert_user(&self, email: &str, password_hash: &str) -> Result<User, PortError>;
}
