//! Port infrastructure
//!
//! Domain crates declare their storage and messaging seams as traits that
//! extend [`DomainPort`]. Adapters (PostgreSQL in `infra_db`, in-memory fakes
//! in `test_utils`) report failures as [`PortError`]; the services turn those
//! into [`ServiceError`](crate::ServiceError)s.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by a port implementation
#[derive(Debug, Error)]
pub enum PortError {
    #[error("{entity_type} {id} not found")]
    NotFound { entity_type: String, id: String },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Uniqueness violation
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// The backing system could not be reached
    #[error("Connection error: {message}")]
    Connection { message: String },

    #[error("{operation} timed out after {duration_ms}ms")]
    Timeout { operation: String, duration_ms: u64 },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PortError {
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
            field: None,
        }
    }

    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict {
            message: message.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>, after: Duration) -> Self {
        PortError::Timeout {
            operation: operation.into(),
            duration_ms: after.as_millis() as u64,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
        }
    }

    /// Connection and timeout failures; the store may recover on its own
    pub fn is_transient(&self) -> bool {
        matches!(self, PortError::Connection { .. } | PortError::Timeout { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, PortError::Conflict { .. })
    }
}

/// Marker for port traits
///
/// Implementations are shared across request tasks behind `Arc<dyn ...>`.
pub trait DomainPort: Send + Sync + 'static {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    Healthy,
    /// Serving, but slower or partially impaired
    Degraded,
    Unhealthy,
}

/// Outcome of one adapter health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub adapter_id: String,
    pub status: AdapterHealth,
    pub latency_ms: u64,
    pub message: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl HealthCheckResult {
    pub fn healthy(adapter_id: impl Into<String>) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            status: AdapterHealth::Healthy,
            latency_ms: 0,
            message: None,
            checked_at: Utc::now(),
        }
    }

    pub fn unhealthy(adapter_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: AdapterHealth::Unhealthy,
            message: Some(message.into()),
            ..Self::healthy(adapter_id)
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency_ms = latency.as_millis() as u64;
        self
    }

    /// Returns true when the adapter can serve traffic
    pub fn is_operational(&self) -> bool {
        matches!(self.status, AdapterHealth::Healthy | AdapterHealth::Degraded)
    }
}

/// Adapters that can report their own health
#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    async fn health_check(&self) -> HealthCheckResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_entity() {
        let error = PortError::not_found("Event", 123);
        assert!(error.is_not_found());
        assert!(!error.is_transient());
        assert_eq!(error.to_string(), "Event 123 not found");
    }

    #[test]
    fn test_transient_errors() {
        assert!(PortError::timeout("get_event", Duration::from_secs(5)).is_transient());
        assert!(PortError::connection("refused").is_transient());
        assert!(!PortError::validation("Invalid email").is_transient());
        assert!(!PortError::internal("decode").is_transient());
    }

    #[test]
    fn test_conflict() {
        let error = PortError::conflict("registration already exists");
        assert!(error.is_conflict());
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_unhealthy_is_not_operational() {
        assert!(HealthCheckResult::healthy("memory").is_operational());

        let result = HealthCheckResult::unhealthy("postgres", "connection refused")
            .with_latency(Duration::from_millis(12));
        assert!(!result.is_operational());
        assert_eq!(result.latency_ms, 12);
        assert_eq!(result.message.as_deref(), Some("connection refused"));
    }
}
