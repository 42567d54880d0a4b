//! Event and registration DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use domain_events::{Event, EventFields, Registration};

/// Body of create and update requests
///
/// Ids and owner sent by the client are ignored; the owner is always the
/// authenticated caller.
#[derive(Debug, Deserialize)]
pub struct EventRequest {
    pub name: String,
    pub description: String,
    pub location: String,
    pub date_time: DateTime<Utc>,
}

impl From<EventRequest> for EventFields {
    fn from(request: EventRequest) -> Self {
        EventFields::new(
            request.name,
            request.description,
            request.location,
            request.date_time,
        )
    }
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub location: String,
    pub date_time: DateTime<Utc>,
    pub user_id: i64,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id.value(),
            name: event.name,
            description: event.description,
            location: event.location,
            date_time: event.date_time,
            user_id: event.user_id.value(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
}

impl From<Registration> for RegistrationResponse {
    fn from(registration: Registration) -> Self {
        Self {
            id: registration.id.value(),
            user_id: registration.user_id.value(),
            event_id: registration.event_id.value(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisteredResponse {
    pub message: String,
    pub registration: RegistrationResponse,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub fn to_responses(events: Vec<Event>) -> Vec<EventResponse> {
    events.into_iter().map(EventResponse::from).collect()
}
