//! Service error taxonomy shared by both transports
//!
//! Services classify every failure into one of six kinds. The HTTP and RPC
//! adapters each map [`ErrorKind`] to their own status codes, which keeps
//! the two front-ends behaviorally identical.

use std::fmt;
use thiserror::Error;
use serde::Serialize;

use crate::ports::PortError;

/// Message shown to callers in place of downstream failure detail
pub const UNAVAILABLE_MESSAGE: &str = "service temporarily unavailable";

/// Classification of a service failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing, malformed, invalid or expired credentials
    Unauthenticated,
    /// Valid identity without ownership of the resource
    Forbidden,
    /// The resource does not exist
    NotFound,
    /// Uniqueness violation
    Conflict,
    /// Malformed input
    Invalid,
    /// A store or broker dependency failed
    Unavailable,
}

impl ErrorKind {
    /// Stable machine-readable name
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Invalid => "invalid",
            ErrorKind::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by application services
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    Invalid(String),

    #[error("Unavailable: {0}")]
    Unavailable(String),
}

impl ServiceError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ServiceError::Unauthenticated(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ServiceError::Forbidden(message.into())
    }

    pub fn not_found(entity: &str, id: impl fmt::Display) -> Self {
        ServiceError::NotFound(format!("{} {} not found", entity, id))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ServiceError::Conflict(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ServiceError::Invalid(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        ServiceError::Unavailable(message.into())
    }

    /// Returns the classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Unauthenticated(_) => ErrorKind::Unauthenticated,
            ServiceError::Forbidden(_) => ErrorKind::Forbidden,
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::Conflict(_) => ErrorKind::Conflict,
            ServiceError::Invalid(_) => ErrorKind::Invalid,
            ServiceError::Unavailable(_) => ErrorKind::Unavailable,
        }
    }

    /// Message that may be returned to a caller
    ///
    /// Downstream failure detail stays in logs; every other kind carries a
    /// message written for the caller.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::Unavailable(_) => UNAVAILABLE_MESSAGE.to_string(),
            ServiceError::Unauthenticated(msg)
            | ServiceError::Forbidden(msg)
            | ServiceError::NotFound(msg)
            | ServiceError::Conflict(msg)
            | ServiceError::Invalid(msg) => msg.clone(),
        }
    }
}

impl From<PortError> for ServiceError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { entity_type, id } => {
                ServiceError::NotFound(format!("{} {} not found", entity_type, id))
            }
            PortError::Conflict { message } => ServiceError::Conflict(message),
            PortError::Validation { message, field: Some(field) } => {
                ServiceError::Invalid(format!("{}: {}", field, message))
            }
            PortError::Validation { message, field: None } => ServiceError::Invalid(message),
            other => ServiceError::Unavailable(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => format!("{}: {}", field, msg),
                    None => format!("{}: {}", field, e.code),
                })
            })
            .collect();
        messages.sort();
        ServiceError::Invalid(messages.join("; "))
    }
}
