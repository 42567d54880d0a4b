//! Event registration service
//!
//! Orchestrates event CRUD and registrations over an [`EventStore`],
//! enforcing ownership before any mutation and notifying the
//! [`NotificationPublisher`] once a write has succeeded.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use validator::Validate;

use core_kernel::{EventId, HealthCheckResult, PortError, ServiceError, UserId};

use crate::event::{Event, EventFields, Registration};
use crate::message::{EventAction, EventMessage};
use crate::ports::{EventStore, NotificationPublisher};

/// Default bound on a single store call
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// Application service for events and registrations
pub struct EventService {
    store: Arc<dyn EventStore>,
    publisher: Arc<dyn NotificationPublisher>,
    store_timeout: Duration,
}

impl EventService {
    pub fn new(store: Arc<dyn EventStore>, publisher: Arc<dyn NotificationPublisher>) -> Self {
        Self {
            store,
            publisher,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Overrides the per-call store timeout
    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    /// Lists every event; no authentication required
    pub async fn list_events(&self) -> Result<Vec<Event>, ServiceError> {
        self.bounded("list_events", self.store.list_events()).await
    }

    /// Fetches one event
    pub async fn get_event(&self, id: EventId) -> Result<Event, ServiceError> {
        self.bounded("get_event", self.store.get_event(id))
            .await?
            .ok_or_else(|| ServiceError::not_found(EventId::label(), id))
    }

    /// Creates an event owned by the caller and announces it
    pub async fn create_event(
        &self,
        caller: UserId,
        fields: EventFields,
    ) -> Result<Event, ServiceError> {
        let fields = fields.normalized();
        fields.validate()?;

        let event = self
            .bounded("insert_event", self.store.insert_event(caller, &fields))
            .await?;

        info!(event_id = %event.id, user_id = %caller, "Event created");
        self.notify(EventAction::Created, event.clone());
        Ok(event)
    }

    /// Replaces an event's fields; only the owner may do this
    ///
    /// Existence and ownership are checked before the fields are validated.
    pub async fn update_event(
        &self,
        caller: UserId,
        id: EventId,
        fields: EventFields,
    ) -> Result<Event, ServiceError> {
        self.owned_event(caller, id, "update").await?;

        let fields = fields.normalized();
        fields.validate()?;

        let event = self
            .bounded("update_event", self.store.update_event(id, &fields))
            .await?
            .ok_or_else(|| ServiceError::not_found(EventId::label(), id))?;

        info!(event_id = %id, user_id = %caller, "Event updated");
        self.notify(EventAction::Updated, event.clone());
        Ok(event)
    }

    /// Deletes an event and its registrations; only the owner may do this
    pub async fn delete_event(&self, caller: UserId, id: EventId) -> Result<(), ServiceError> {
        let event = self.owned_event(caller, id, "delete").await?;

        let removed = self.bounded("delete_event", self.store.delete_event(id)).await?;
        if !removed {
            return Err(ServiceError::not_found(EventId::label(), id));
        }

        info!(event_id = %id, user_id = %caller, "Event deleted");
        self.notify(EventAction::Deleted, event);
        Ok(())
    }

    /// Registers the caller for an event
    ///
    /// Any authenticated user may register, including the owner.
    pub async fn register_for_event(
        &self,
        caller: UserId,
        event_id: EventId,
    ) -> Result<Registration, ServiceError> {
        self.get_event(event_id).await?;

        let registration = match tokio::time::timeout(
            self.store_timeout,
            self.store.insert_registration(caller, event_id),
        )
        .await
        {
            Ok(Ok(registration)) => registration,
            Ok(Err(PortError::Conflict { .. })) => {
                return Err(ServiceError::conflict(format!(
                    "already registered for event {}",
                    event_id
                )));
            }
            Ok(Err(PortError::NotFound { .. })) => {
                return Err(ServiceError::not_found(EventId::label(), event_id));
            }
            Ok(Err(e)) => return Err(self.store_failure("insert_registration", e)),
            Err(_) => return Err(self.store_timed_out("insert_registration")),
        };

        info!(event_id = %event_id, user_id = %caller, "Registered for event");
        Ok(registration)
    }

    /// Cancels the caller's registration for an event
    ///
    /// Cancelling a registration that does not exist succeeds.
    pub async fn cancel_registration(
        &self,
        caller: UserId,
        event_id: EventId,
    ) -> Result<(), ServiceError> {
        self.get_event(event_id).await?;

        let removed = self
            .bounded(
                "delete_registration",
                self.store.delete_registration(caller, event_id),
            )
            .await?;

        if removed {
            info!(event_id = %event_id, user_id = %caller, "Registration cancelled");
        } else {
            debug!(event_id = %event_id, user_id = %caller, "No registration to cancel");
        }
        Ok(())
    }

    /// Events the caller is registered for
    pub async fn list_user_registrations(&self, caller: UserId) -> Result<Vec<Event>, ServiceError> {
        self.bounded("registered_events", self.store.registered_events(caller))
            .await
    }

    /// Health of the backing store
    pub async fn health(&self) -> HealthCheckResult {
        self.store.health_check().await
    }

    async fn owned_event(
        &self,
        caller: UserId,
        id: EventId,
        verb: &str,
    ) -> Result<Event, ServiceError> {
        let event = self.get_event(id).await?;
        if !event.is_owned_by(caller) {
            debug!(event_id = %id, user_id = %caller, owner = %event.user_id, "Ownership check failed");
            return Err(ServiceError::forbidden(format!(
                "not authorized to {} event {}",
                verb, id
            )));
        }
        Ok(event)
    }

    fn notify(&self, action: EventAction, event: Event) {
        self.publisher.publish(EventMessage::new(action, event));
    }

    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> Result<T, ServiceError>
    where
        F: Future<Output = Result<T, PortError>>,
    {
        match tokio::time::timeout(self.store_timeout, call).await {
            Ok(result) => result.map_err(|e| self.store_failure(operation, e)),
            Err(_) => Err(self.store_timed_out(operation)),
        }
    }

    fn store_failure(&self, operation: &'static str, error: PortError) -> ServiceError {
        if error.is_transient() || matches!(error, PortError::Internal { .. }) {
            warn!(operation, error = %error, "Event store call failed");
        }
        ServiceError::from(error)
    }

    fn store_timed_out(&self, operation: &'static str) -> ServiceError {
        let duration_ms = self.store_timeout.as_millis() as u64;
        warn!(operation, duration_ms, "Event store call timed out");
        ServiceError::from(PortError::timeout(operation, self.store_timeout))
    }
}
