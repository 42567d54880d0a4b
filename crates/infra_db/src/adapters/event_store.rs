//! PostgreSQL Event Store
//!
//! Implements the `EventStore` port over the event and registration
//! repositories. Row ownership and cascade rules live in the schema; this
//! adapter only translates rows and errors.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    DomainPort, EventId, HealthCheckResult, HealthCheckable, PortError, RegistrationId, UserId,
};
use domain_events::{Event, EventFields, EventStore, Registration};

use crate::error::DatabaseError;
use crate::repositories::{
    EventRepository, EventRow, NewEvent, RegistrationRepository, RegistrationRow,
};

/// PostgreSQL-backed implementation of the `EventStore` port
///
/// # Error Handling
///
/// Database errors are translated to `PortError` variants:
/// - unique violation on registrations -> `PortError::Conflict`
/// - foreign key violation -> `PortError::NotFound` for the referenced row
/// - connection failures -> `PortError::Connection`
/// - other errors -> `PortError::Internal`
#[derive(Debug, Clone)]
pub struct PostgresEventStore {
    events: EventRepository,
    registrations: RegistrationRepository,
    pool: PgPool,
}

impl PostgresEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            events: EventRepository::new(pool.clone()),
            registrations: RegistrationRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresEventStore {}

#[async_trait]
impl HealthCheckable for PostgresEventStore {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-event-store").await
    }
}

#[async_trait]
impl EventStore for PostgresEventStore {
    #[instrument(skip(self))]
    async fn list_events(&self) -> Result<Vec<Event>, PortError> {
        let rows = self.events.list().await?;
        debug!(count = rows.len(), "Listed events");
        Ok(rows.into_iter().map(row_to_event).collect())
    }

    #[instrument(skip(self), fields(event_id = %id))]
    async fn get_event(&self, id: EventId) -> Result<Option<Event>, PortError> {
        Ok(self.events.get_by_id(id.value()).await?.map(row_to_event))
    }

    #[instrument(skip(self, fields), fields(user_id = %owner))]
    async fn insert_event(&self, owner: UserId, fields: &EventFields) -> Result<Event, PortError> {
        let row = self
            .events
            .insert(owner.value(), new_event(fields))
            .await
            .map_err(|e| match e {
                DatabaseError::ForeignKeyViolation(_) => PortError::not_found(UserId::label(), owner),
                other => PortError::from(other),
            })?;

        debug!(event_id = row.id, "Event inserted");
        Ok(row_to_event(row))
    }

    #[instrument(skip(self, fields), fields(event_id = %id))]
    async fn update_event(
        &self,
        id: EventId,
        fields: &EventFields,
    ) -> Result<Option<Event>, PortError> {
        Ok(self
            .events
            .update(id.value(), new_event(fields))
            .await?
            .map(row_to_event))
    }

    #[instrument(skip(self), fields(event_id = %id))]
    async fn delete_event(&self, id: EventId) -> Result<bool, PortError> {
        Ok(self.events.delete(id.value()).await?)
    }

    #[instrument(skip(self), fields(user_id = %user, event_id = %event))]
    async fn insert_registration(
        &self,
        user: UserId,
        event: EventId,
    ) -> Result<Registration, PortError> {
        let row = self
            .registrations
            .insert(user.value(), event.value())
            .await
            .map_err(|e| match e {
                DatabaseError::DuplicateEntry(_) => PortError::conflict(format!(
                    "user {} is already registered for event {}",
                    user, event
                )),
                DatabaseError::ForeignKeyViolation(_) => PortError::not_found(EventId::label(), event),
                other => PortError::from(other),
            })?;

        Ok(row_to_registration(row))
    }

    #[instrument(skip(self), fields(user_id = %user, event_id = %event))]
    async fn delete_registration(&self, user: UserId, event: EventId) -> Result<bool, PortError> {
        Ok(self.registrations.delete(user.value(), event.value()).await?)
    }

    #[instrument(skip(self), fields(user_id = %user))]
    async fn registered_events(&self, user: UserId) -> Result<Vec<Event>, PortError> {
        let rows = self.events.registered_for_user(user.value()).await?;
        Ok(rows.into_iter().map(row_to_event).collect())
    }
}

fn new_event(fields: &EventFields) -> NewEvent<'_> {
    NewEvent {
        name: &fields.name,
        description: &fields.description,
        location: &fields.location,
        date_time: fields.date_time,
    }
}

fn row_to_event(row: EventRow) -> Event {
    Event {
        id: EventId::new(row.id),
        name: row.name,
        description: row.description,
        location: row.location,
        date_time: row.date_time,
        user_id: UserId::new(row.user_id),
    }
}

fn row_to_registration(row: RegistrationRow) -> Registration {
    Registration {
        id: RegistrationId::new(row.id),
        user_id: UserId::new(row.user_id),
        event_id: EventId::new(row.event_id),
    }
}
