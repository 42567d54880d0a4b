//! Core Kernel - Foundational types shared across the event registration backend
//!
//! This crate provides the building blocks used by every other crate:
//! - Strongly-typed identifiers for users, events and registrations
//! - Port infrastructure (`PortError`, `DomainPort`, health checks)
//! - The service error taxonomy that both transports map from

pub mod identifiers;
pub mod ports;
pub mod error;

pub use identifiers::{UserId, EventId, RegistrationId};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
pub use error::{ServiceError, ErrorKind, UNAVAILABLE_MESSAGE};
