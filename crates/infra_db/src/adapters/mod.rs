//! Domain Adapters
//!
//! This module provides adapter implementations for domain ports,
//! connecting domain interfaces to the PostgreSQL database layer.
//!
//! # Architecture
//!
//! Each adapter:
//! - Implements the domain's port trait
//! - Translates between domain models and database row types
//! - Uses the repository layer for database operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresEventStore;
//! use domain_events::EventStore;
//!
//! let store: Arc<dyn EventStore> = Arc::new(PostgresEventStore::new(pool));
//! let events = store.list_events().await?;
//! ```

pub mod credential_store;
pub mod event_store;

pub use credential_store::PostgresCredentialStore;
pub use event_store::PostgresEventStore;

use std::time::Instant;

use sqlx::PgPool;

use core_kernel::HealthCheckResult;

/// Runs `SELECT 1` against the pool
pub(crate) async fn ping(pool: &PgPool, adapter_id: &str) -> HealthCheckResult {
    let start = Instant::now();
    let result = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await;

    match result {
        Ok(_) => HealthCheckResult::healthy(adapter_id),
        Err(e) => HealthCheckResult::unhealthy(adapter_id, format!("Database error: {}", e)),
    }
    .with_latency(start.elapsed())
}
