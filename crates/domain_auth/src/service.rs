//! Registration, login and per-request authentication

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use validator::Validate;

use core_kernel::{PortError, ServiceError, UserId};

use crate::password::PasswordHasher;
use crate::ports::CredentialStore;
use crate::token::{bearer_token, TokenService};
use crate::user::{Credentials, User};

const INVALID_CREDENTIALS: &str = "invalid email or password";
const DUMMY_PASSWORD: &str = "dummy-password-for-unknown-accounts";

/// Default bound on a single credential store call
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub user: User,
    pub token: String,
}

/// Identity flows shared by the HTTP and RPC transports
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    tokens: Arc<TokenService>,
    dummy_digest: String,
    store_timeout: Duration,
}

impl AuthService {
    /// Creates the service
    ///
    /// Computes one digest up front so that logins for unknown emails cost
    /// the same bcrypt work as logins with a wrong password.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        tokens: Arc<TokenService>,
    ) -> Self {
        let dummy_digest = hasher.hash(DUMMY_PASSWORD).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to precompute dummy password digest");
            String::new()
        });

        Self {
            store,
            hasher,
            tokens,
            dummy_digest,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Overrides the per-call store timeout
    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    /// Token service used to issue and verify tokens
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Creates a new user account
    ///
    /// # Errors
    ///
    /// * `Invalid` - malformed email or a password shorter than six characters
    /// * `Conflict` - the email is already registered
    /// * `Unavailable` - the credential store failed
    pub async fn register(&self, credentials: Credentials) -> Result<User, ServiceError> {
        let credentials = credentials.normalized();
        credentials.validate()?;

        let email = credentials.email;
        let hasher = self.hasher;
        let password = credentials.password;
        let digest = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ServiceError::unavailable(format!("password hashing task failed: {}", e)))?
            .map_err(|e| ServiceError::unavailable(format!("password hashing failed: {}", e)))?;

        let user = self
            .bounded("insert_user", self.store.insert_user(&email, &digest))
            .await?
            .map_err(|e| match e {
                PortError::Conflict { .. } => ServiceError::conflict("email is already registered"),
                other => ServiceError::from(other),
            })?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Verifies credentials and issues a token
    ///
    /// Unknown emails and wrong passwords produce the same error.
    pub async fn login(&self, credentials: Credentials) -> Result<LoginSession, ServiceError> {
        let credentials = credentials.normalized();
        let user = self
            .bounded("find_by_email", self.store.find_by_email(&credentials.email))
            .await??;

        let digest = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.dummy_digest.clone(),
        };
        let hasher = self.hasher;
        let password = credentials.password;
        let matched = tokio::task::spawn_blocking(move || hasher.matches(&password, &digest))
            .await
            .map_err(|e| ServiceError::unavailable(format!("password verification task failed: {}", e)))?;

        let user = match user {
            Some(user) if matched => user,
            _ => {
                debug!("Rejected login attempt");
                return Err(ServiceError::unauthenticated(INVALID_CREDENTIALS));
            }
        };

        let token = self.tokens.issue(user.id, &user.email)?;
        info!(user_id = %user.id, "User logged in");
        Ok(LoginSession { user, token })
    }

    /// Resolves the caller from an authorization value
    ///
    /// Accepts the raw header or metadata value with or without the
    /// `Bearer ` prefix.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<UserId, ServiceError> {
        let raw = authorization
            .ok_or_else(|| ServiceError::unauthenticated("authorization header is required"))?;
        let token = bearer_token(raw);
        if token.is_empty() {
            return Err(ServiceError::unauthenticated("authorization header is required"));
        }
        Ok(self.tokens.verify(token)?)
    }

    /// Runs a store call under the store timeout
    ///
    /// The outer error is the timeout; the inner result is left to the caller
    /// so store errors can be classified per operation.
    async fn bounded<T, F>(
        &self,
        operation: &'static str,
        call: F,
    ) -> Result<Result<T, PortError>, ServiceError>
    where
        F: Future<Output = Result<T, PortError>>,
    {
        tokio::time::timeout(self.store_timeout, call)
            .await
            .map_err(|_| {
                warn!(
                    operation,
                    duration_ms = self.store_timeout.as_millis() as u64,
                    "Credential store call timed out"
                );
                ServiceError::from(PortError::timeout(operation, self.store_timeout))
            })
    }
}

