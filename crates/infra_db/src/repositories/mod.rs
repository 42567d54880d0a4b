//! Repository implementations for stored records
//!
//! Repositories encapsulate SQL queries and map between database rows and
//! plain row types. Adapters translate those rows into domain types.
//!
//! # Architecture
//!
//! Each repository follows these principles:
//! - Runtime-checked queries with `FromRow` row types
//! - Constraint violations surface as typed `DatabaseError` variants
//! - No domain rules; ownership is enforced by the services

pub mod user;
pub mod event;
pub mod registration;

pub use user::{UserRepository, UserRow};
pub use event::{EventRepository, EventRow, NewEvent};
pub use registration::{RegistrationRepository, RegistrationRow};
