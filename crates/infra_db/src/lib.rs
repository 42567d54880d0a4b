//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL persistence for users, events and
//! registrations using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: repositories own the SQL and
//! return row types; adapters implement the domain ports on top of them and
//! translate `DatabaseError` into `PortError`.
//!
//! # Schema
//!
//! - `users`: unique email
//! - `events`: owned by a user, deleted with that user
//! - `registrations`: unique `(user_id, event_id)`, deleted with the event
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresEventStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/eventhub")).await?;
//! run_migrations(&pool).await?;
//! let store = PostgresEventStore::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, run_migrations, DatabaseConfig, MIGRATOR};
pub use error::DatabaseError;
pub use adapters::{PostgresCredentialStore, PostgresEventStore};
