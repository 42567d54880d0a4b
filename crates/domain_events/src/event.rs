//! Events and registrations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{EventId, RegistrationId, UserId};

/// A scheduled event owned by the user who created it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: String,
    pub location: String,
    /// Scheduled time (UTC)
    pub date_time: DateTime<Utc>,
    /// Owning user
    pub user_id: UserId,
}

impl Event {
    /// Returns true if the user owns this event
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.user_id == user
    }
}

/// Caller-supplied event fields
///
/// The owner is never part of the fields; it always comes from the
/// authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct EventFields {
    #[validate(length(min = 1, message = "is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "is required"))]
    pub location: String,
    pub date_time: DateTime<Utc>,
}

impl EventFields {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        location: impl Into<String>,
        date_time: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            location: location.into(),
            date_time,
        }
    }

    /// Returns a copy with surrounding whitespace removed from text fields
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            location: self.location.trim().to_string(),
            date_time: self.date_time,
        }
    }
}

/// A user's registration for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub id: RegistrationId,
    pub user_id: UserId,
    pub event_id: EventId,
}
