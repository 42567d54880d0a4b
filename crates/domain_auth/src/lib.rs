//! Identity Domain
//!
//! This crate owns everything needed to turn credentials into a verified
//! caller identifier:
//!
//! - **Password Verifier**: salted bcrypt hashing with a tunable cost
//! - **Token Service**: HS256-signed, time-bounded identity tokens
//! - **Credential Store port**: persistence seam for user records
//! - **Auth Service**: registration, login and per-request authentication
//!   shared by the HTTP and RPC transports
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_auth::{AuthService, Credentials, PasswordHasher, TokenConfig, TokenService};
//!
//! let tokens = Arc::new(TokenService::new(TokenConfig::new(secret)));
//! let auth = AuthService::new(store, PasswordHasher::default(), tokens);
//!
//! let user = auth.register(Credentials::new("a@x.com", "secret1")).await?;
//! let session = auth.login(Credentials::new("a@x.com", "secret1")).await?;
//! let caller = auth.authenticate(Some(&format!("Bearer {}", session.token)))?;
//! ```

pub mod user;
pub mod password;
pub mod token;
pub mod ports;
pub mod service;

pub use user::{User, Credentials};
pub use password::PasswordHasher;
pub use token::{TokenService, TokenConfig, TokenError, Claims, bearer_token};
pub use ports::CredentialStore;
pub use service::{AuthService, LoginSession};
