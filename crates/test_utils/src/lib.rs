//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fakes, fixtures, and helpers for the
//! event registration test suite.
//!
//! # Modules
//!
//! - `memory`: In-memory and failure-injecting store adapters
//! - `publishers`: Recording publisher and failing or hanging broker sinks
//! - `fixtures`: Pre-built test data for common entities
//! - `builders`: Builder patterns for test data and wired services
//! - `database`: PostgreSQL container management for adapter tests
//! - `assertions`: Assertion helpers for service results
//! - `generators`: Property-based test data generators

pub mod memory;
pub mod publishers;
pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use memory::*;
pub use publishers::*;
pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
