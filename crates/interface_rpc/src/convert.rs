//! Conversions between protobuf messages and domain types
//!
//! All functions here are pure; validation of the converted fields is left
//! to the services.

use chrono::{DateTime, Utc};
use prost_types::Timestamp;

use core_kernel::ServiceError;
use domain_auth::User;
use domain_events::{Event, EventFields, Registration};

use crate::pb;

pub fn to_timestamp(value: DateTime<Utc>) -> Timestamp {
    Timestamp {
        seconds: value.timestamp(),
        nanos: value.timestamp_subsec_nanos() as i32,
    }
}

/// Reads a required timestamp field
pub fn from_timestamp(value: Option<Timestamp>) -> Result<DateTime<Utc>, ServiceError> {
    let value = value.ok_or_else(|| ServiceError::invalid("date_time: is required"))?;
    u32::try_from(value.nanos)
        .ok()
        .and_then(|nanos| DateTime::from_timestamp(value.seconds, nanos))
        .ok_or_else(|| ServiceError::invalid("date_time: is out of range"))
}

/// Builds event fields from the parts of a create or update request
pub fn event_fields(
    name: String,
    description: String,
    location: String,
    date_time: Option<Timestamp>,
) -> Result<EventFields, ServiceError> {
    Ok(EventFields::new(
        name,
        description,
        location,
        from_timestamp(date_time)?,
    ))
}

impl From<Event> for pb::Event {
    fn from(event: Event) -> Self {
        pb::Event {
            id: event.id.value(),
            name: event.name,
            description: event.description,
            location: event.location,
            date_time: Some(to_timestamp(event.date_time)),
            user_id: event.user_id.value(),
        }
    }
}

impl From<Registration> for pb::Registration {
    fn from(registration: Registration) -> Self {
        pb::Registration {
            id: registration.id.value(),
            user_id: registration.user_id.value(),
            event_id: registration.event_id.value(),
        }
    }
}

impl From<User> for pb::User {
    fn from(user: User) -> Self {
        pb::User {
            id: user.id.value(),
            email: user.email,
        }
    }
}

pub fn to_pb_events(events: Vec<Event>) -> Vec<pb::Event> {
    events.into_iter().map(pb::Event::from).collect()
}
