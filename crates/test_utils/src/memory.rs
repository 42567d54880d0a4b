//! In-memory Store Adapters
//!
//! Port implementations that keep state in process, plus adapters that
//! inject failures and latency. They honor the same contracts as the
//! PostgreSQL adapters: unique emails, unique (user, event) registrations
//! and cascading registration removal on event delete.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use core_kernel::{
    DomainPort, EventId, HealthCheckResult, HealthCheckable, PortError,
    RegistrationId, UserId,
};
use domain_auth::{CredentialStore, User};
use domain_events::{Event, EventFields, EventStore, Registration};

#[derive(Default)]
struct EventTables {
    last_event_id: i64,
    last_registration_id: i64,
    events: BTreeMap<EventId, Event>,
    registrations: Vec<Registration>,
}

/// Event store backed by process memory
#[derive(Default)]
pub struct InMemoryEventStore {
    tables: Mutex<EventTables>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored registrations across all events
    pub async fn registration_count(&self) -> usize {
        self.tables.lock().await.registrations.len()
    }
}

impl DomainPort for InMemoryEventStore {}

#[async_trait]
impl HealthCheckable for InMemoryEventStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("in-memory-event-store")
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn list_events(&self) -> Result<Vec<Event>, PortError> {
        Ok(self.tables.lock().await.events.values().cloned().collect())
    }

    async fn get_event(&self, id: EventId) -> Result<Option<Event>, PortError> {
        Ok(self.tables.lock().await.events.get(&id).cloned())
    }

    async fn insert_event(&self, owner: UserId, fields: &EventFields) -> Result<Event, PortError> {
        let mut tables = self.tables.lock().await;
        tables.last_event_id += 1;
        let event = Event {
            id: EventId::new(tables.last_event_id),
            name: fields.name.clone(),
            description: fields.description.clone(),
            location: fields.location.clone(),
            date_time: fields.date_time,
            user_id: owner,
        };
        tables.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn update_event(
        &self,
        id: EventId,
        fields: &EventFields,
    ) -> Result<Option<Event>, PortError> {
        let mut tables = self.tables.lock().await;
        Ok(tables.events.get_mut(&id).map(|event| {
            event.name = fields.name.clone();
            event.description = fields.description.clone();
            event.location = fields.location.clone();
            event.date_time = fields.date_time;
            event.clone()
        }))
    }

    async fn delete_event(&self, id: EventId) -> Result<bool, PortError> {
        let mut tables = self.tables.lock().await;
        let removed = tables.events.remove(&id).is_some();
        tables.registrations.retain(|r| r.event_id != id);
        Ok(removed)
    }

    async fn insert_registration(
        &self,
        user: UserId,
        event: EventId,
    ) -> Result<Registration, PortError> {
        let mut tables = self.tables.lock().await;
        if !tables.events.contains_key(&event) {
            return Err(PortError::not_found(EventId::label(), event));
        }
        if tables
            .registrations
            .iter()
            .any(|r| r.user_id == user && r.event_id == event)
        {
            return Err(PortError::conflict(format!(
                "user {} is already registered for event {}",
                user, event
            )));
        }

        tables.last_registration_id += 1;
        let registration = Registration {
            id: RegistrationId::new(tables.last_registration_id),
            user_id: user,
            event_id: event,
        };
        tables.registrations.push(registration);
        Ok(registration)
    }

    async fn delete_registration(&self, user: UserId, event: EventId) -> Result<bool, PortError> {
        let mut tables = self.tables.lock().await;
        let before = tables.registrations.len();
        tables
            .registrations
            .retain(|r| !(r.user_id == user && r.event_id == event));
        Ok(tables.registrations.len() < before)
    }

    async fn registered_events(&self, user: UserId) -> Result<Vec<Event>, PortError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .registrations
            .iter()
            .filter(|r| r.user_id == user)
            .filter_map(|r| tables.events.get(&r.event_id).cloned())
            .collect())
    }
}

/// Credential store backed by process memory
#[derive(Default)]
pub struct InMemoryCredentialStore {
    users: Mutex<Vec<User>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered users
    pub async fn user_count(&self) -> usize {
        self.users.lock().await.len()
    }
}

impl DomainPort for InMemoryCredentialStore {}

#[async_trait]
impl HealthCheckable for InMemoryCredentialStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("in-memory-credential-store")
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, PortError> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert_user(&self, email: &str, password_hash: &str) -> Result<User, PortError> {
        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.email == email) {
            return Err(PortError::conflict(format!("email {} is already registered", email)));
        }
        let user = User {
            id: UserId::new(users.len() as i64 + 1),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        };
        users.push(user.clone());
        Ok(user)
    }
}

/// Event store whose backing database is unreachable
///
/// Every call fails with a connection error.
#[derive(Debug, Default)]
pub struct UnavailableEventStore;

impl UnavailableEventStore {
    fn refused() -> PortError {
        PortError::connection("connection refused (os error 111)")
    }
}

impl DomainPort for UnavailableEventStore {}

#[async_trait]
impl HealthCheckable for UnavailableEventStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::unhealthy("unavailable-event-store", "connection refused")
    }
}

#[async_trait]
impl EventStore for UnavailableEventStore {
    async fn list_events(&self) -> Result<Vec<Event>, PortError> {
        Err(Self::refused())
    }

    async fn get_event(&self, _id: EventId) -> Result<Option<Event>, PortError> {
        Err(Self::refused())
    }

    async fn insert_event(&self, _owner: UserId, _fields: &EventFields) -> Result<Event, PortError> {
        Err(Self::refused())
    }

    async fn update_event(
        &self,
        _id: EventId,
        _fields: &EventFields,
    ) -> Result<Option<Event>, PortError> {
        Err(Self::refused())
    }

    async fn delete_event(&self, _id: EventId) -> Result<bool, PortError> {
        Err(Self::refused())
    }

    async fn insert_registration(
        &self,
        _user: UserId,
        _event: EventId,
    ) -> Result<Registration, PortError> {
        Err(Self::refused())
    }

    async fn delete_registration(&self, _user: UserId, _event: EventId) -> Result<bool, PortError> {
        Err(Self::refused())
    }

    async fn registered_events(&self, _user: UserId) -> Result<Vec<Event>, PortError> {
        Err(Self::refused())
    }
}

/// Wraps another store and delays every call
pub struct SlowEventStore {
    inner: Arc<dyn EventStore>,
    delay: Duration,
}

impl SlowEventStore {
    pub fn new(inner: Arc<dyn EventStore>, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

impl DomainPort for SlowEventStore {}

#[async_trait]
impl HealthCheckable for SlowEventStore {
    async fn health_check(&self) -> HealthCheckResult {
        self.inner.health_check().await
    }
}

#[async_trait]
impl EventStore for SlowEventStore {
    async fn list_events(&self) -> Result<Vec<Event>, PortError> {
        tokio::time::sleep(self.delay).await;
        self.inner.list_events().await
    }

    async fn get_event(&self, id: EventId) -> Result<Option<Event>, PortError> {
        tokio::time::sleep(self.delay).await;
        self.inner.get_event(id).await
    }

    async fn insert_event(&self, owner: UserId, fields: &EventFields) -> Result<Event, PortError> {
        tokio::time::sleep(self.delay).await;
        self.inner.insert_event(owner, fields).await
    }

    async fn update_event(
        &self,
        id: EventId,
        fields: &EventFields,
    ) -> Result<Option<Event>, PortError> {
        tokio::time::sleep(self.delay).await;
        self.inner.update_event(id, fields).await
    }

    async fn delete_event(&self, id: EventId) -> Result<bool, PortError> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete_event(id).await
    }

    async fn insert_registration(
        &self,
        user: UserId,
        event: EventId,
    ) -> Result<Registration, PortError> {
        tokio::time::sleep(self.delay).await;
        self.inner.insert_registration(user, event).await
    }

    async fn delete_registration(&self, user: UserId, event: EventId) -> Result<bool, PortError> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete_registration(user, event).await
    }

    async fn registered_events(&self, user: UserId) -> Result<Vec<Event>, PortError> {
        tokio::time::sleep(self.delay).await;
        self.inner.registered_events(user).await
    }
}

/// Wraps another credential store and delays every call
pub struct SlowCredentialStore {
    inner: Arc<dyn CredentialStore>,
    delay: Duration,
}

impl SlowCredentialStore {
    pub fn new(inner: Arc<dyn CredentialStore>, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

impl DomainPort for SlowCredentialStore {}

#[async_trait]
impl HealthCheckable for SlowCredentialStore {
    async fn health_check(&self) -> HealthCheckResult {
        self.inner.health_check().await
    }
}

#[async_trait]
impl CredentialStore for SlowCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, PortError> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_by_email(email).await
    }

    async fn insert_user(&self, email: &str, password_hash: &str) -> Result<User, PortError> {
        tokio::time::sleep(self.delay).await;
        self.inner.insert_user(email, password_hash).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::EventFixtures;

    #[tokio::test]
    async fn test_delete_cascades_registrations() {
        let store = InMemoryEventStore::new();
        let event = store
            .insert_event(UserId::new(1), &EventFixtures::launch())
            .await
            .unwrap();
        store.insert_registration(UserId::new(2), event.id).await.unwrap();
        assert_eq!(store.registration_count().await, 1);

        assert!(store.delete_event(event.id).await.unwrap());
        assert_eq!(store.registration_count().await, 0);
        assert!(store.registered_events(UserId::new(2)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let store = InMemoryEventStore::new();
        let event = store
            .insert_event(UserId::new(1), &EventFixtures::launch())
            .await
            .unwrap();
        store.insert_registration(UserId::new(2), event.id).await.unwrap();
        let err = store
            .insert_registration(UserId::new(2), event.id)
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = InMemoryCredentialStore::new();
        store.insert_user("a@x.com", "digest").await.unwrap();
        assert!(store.insert_user("a@x.com", "digest").await.unwrap_err().is_conflict());
        assert_eq!(store.user_count().await, 1);
    }
}
