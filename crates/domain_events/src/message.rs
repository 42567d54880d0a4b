//! Change notifications for events
//!
//! Messages are ephemeral: the service builds one after each successful
//! write and hands it to the [`NotificationPublisher`](crate::ports::NotificationPublisher).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::event::Event;

/// Kind of change a message describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventAction {
    Created,
    Updated,
    Deleted,
}

impl EventAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventAction::Created => "created",
            EventAction::Updated => "updated",
            EventAction::Deleted => "deleted",
        }
    }
}

impl fmt::Display for EventAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Envelope published to the notification stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMessage {
    pub action: EventAction,
    pub event: Event,
}

impl EventMessage {
    pub fn new(action: EventAction, event: Event) -> Self {
        Self { action, event }
    }

    /// Stream key `<action>-<eventId>`
    pub fn partition_key(&self) -> String {
        format!("{}-{}", self.action, self.event.id)
    }

    /// JSON encoding of the envelope
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Decodes an envelope read back from the stream
    pub fn from_json(payload: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(payload)
    }
}
