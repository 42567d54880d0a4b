//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults,
//! and a builder that wires the application services over in-memory adapters.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use domain_auth::{AuthService, TokenService};
use domain_events::{EventFields, EventService, EventStore, NotificationPublisher};

use crate::fixtures::{AuthFixtures, EventFixtures};
use crate::memory::{InMemoryCredentialStore, InMemoryEventStore};
use crate::publishers::RecordingPublisher;

/// Builder for event fields
pub struct EventFieldsBuilder {
    fields: EventFields,
}

impl Default for EventFieldsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EventFieldsBuilder {
    /// Starts from the launch fixture
    pub fn new() -> Self {
        Self {
            fields: EventFixtures::launch(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.fields.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.fields.description = description.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.fields.location = location.into();
        self
    }

    pub fn with_date_time(mut self, date_time: DateTime<Utc>) -> Self {
        self.fields.date_time = date_time;
        self
    }

    pub fn build(self) -> EventFields {
        self.fields
    }
}

/// Application services wired over test adapters
pub struct TestServices {
    pub auth: Arc<AuthService>,
    pub events: Arc<EventService>,
    pub tokens: Arc<TokenService>,
    pub credential_store: Arc<InMemoryCredentialStore>,
    pub recorder: Arc<RecordingPublisher>,
}

/// Builder for [`TestServices`]
///
/// Defaults to in-memory stores and a recording publisher; any seam can be
/// swapped for a failure-injecting adapter.
pub struct TestServicesBuilder {
    event_store: Option<Arc<dyn EventStore>>,
    publisher: Option<Arc<dyn NotificationPublisher>>,
    store_timeout: Option<Duration>,
    tokens: Option<Arc<TokenService>>,
}

impl Default for TestServicesBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestServicesBuilder {
    pub fn new() -> Self {
        Self {
            event_store: None,
            publisher: None,
            store_timeout: None,
            tokens: None,
        }
    }

    /// Uses the given event store instead of a fresh in-memory one
    pub fn with_event_store(mut self, store: Arc<dyn EventStore>) -> Self {
        self.event_store = Some(store);
        self
    }

    /// Uses the given publisher instead of the recorder
    pub fn with_publisher(mut self, publisher: Arc<dyn NotificationPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = Some(timeout);
        self
    }

    pub fn with_tokens(mut self, tokens: Arc<TokenService>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn build(self) -> TestServices {
        let credential_store = Arc::new(InMemoryCredentialStore::new());
        let recorder = Arc::new(RecordingPublisher::new());
        let tokens = self
            .tokens
            .unwrap_or_else(|| Arc::new(AuthFixtures::token_service()));

        let auth = AuthService::new(
            credential_store.clone(),
            AuthFixtures::fast_hasher(),
            tokens.clone(),
        );

        let event_store = self
            .event_store
            .unwrap_or_else(|| Arc::new(InMemoryEventStore::new()) as Arc<dyn EventStore>);
        let publisher = self
            .publisher
            .unwrap_or_else(|| recorder.clone() as Arc<dyn NotificationPublisher>);
        let mut events = EventService::new(event_store, publisher);
        if let Some(timeout) = self.store_timeout {
            events = events.with_store_timeout(timeout);
        }

        TestServices {
            auth: Arc::new(auth),
            events: Arc::new(events),
            tokens,
            credential_store,
            recorder,
        }
    }
}
