//! Event Domain Ports
//!
//! Two seams separate the event rules from infrastructure:
//!
//! - `EventStore`: durable events and registrations (PostgreSQL in
//!   `infra_db`, in-memory in `test_utils`)
//! - `NotificationPublisher`: best-effort change notifications (Kafka in
//!   `infra_messaging`, recording fakes in `test_utils`)
//!
//! # Usage
//!
//! ```rust,ignore
//! let service = EventService::new(
//!     Arc::new(PostgresEventStore::new(pool)),
//!     Arc::new(publisher),
//! );
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, EventId, HealthCheckable, PortError, UserId};

use crate::event::{Event, EventFields, Registration};
use crate::message::EventMessage;

/// Persistence port for events and registrations
///
/// Stores own their concurrency control. Deleting an event must remove its
/// registrations in the same operation.
#[async_trait]
pub trait EventStore: DomainPort + HealthCheckable {
    /// Returns every event in store order
    async fn list_events(&self) -> Result<Vec<Event>, PortError>;

    /// Looks up one event
    async fn get_event(&self, id: EventId) -> Result<Option<Event>, PortError>;

    /// Persists a new event owned by `owner`
    async fn insert_event(&self, owner: UserId, fields: &EventFields) -> Result<Event, PortError>;

    /// Replaces the mutable fields of an event, leaving the owner unchanged
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the event no longer exists
    async fn update_event(
        &self,
        id: EventId,
        fields: &EventFields,
    ) -> Result<Option<Event>, PortError>;

    /// Deletes an event and its registrations
    ///
    /// # Returns
    ///
    /// Whether a row was removed
    async fn delete_event(&self, id: EventId) -> Result<bool, PortError>;

    /// Records that `user` is registered for `event`
    ///
    /// # Errors
    ///
    /// * `PortError::Conflict` - the pair already exists
    /// * `PortError::NotFound` - the event disappeared before the insert
    async fn insert_registration(
        &self,
        user: UserId,
        event: EventId,
    ) -> Result<Registration, PortError>;

    /// Removes a registration
    ///
    /// # Returns
    ///
    /// Whether a registration was removed
    async fn delete_registration(&self, user: UserId, event: EventId) -> Result<bool, PortError>;

    /// Events the user is registered for
    async fn registered_events(&self, user: UserId) -> Result<Vec<Event>, PortError>;
}

/// Fire-and-forget sink for change notifications
///
/// `publish` must return without waiting for delivery and must never fail
/// the caller; delivery problems are the publisher's to log.
pub trait NotificationPublisher: DomainPort {
    fn publish(&self, message: EventMessage);
}
