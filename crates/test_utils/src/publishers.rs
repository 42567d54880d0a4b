//! Notification publisher and broker sink fakes

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use core_kernel::DomainPort;
use domain_events::{EventAction, EventMessage, NotificationPublisher};
use infra_messaging::{MessageSink, MessagingError};

/// Publisher that keeps every message it is handed
#[derive(Default)]
pub struct RecordingPublisher {
    messages: Mutex<Vec<EventMessage>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages published so far, in submission order
    pub fn messages(&self) -> Vec<EventMessage> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }

    /// Actions published so far, in submission order
    pub fn actions(&self) -> Vec<EventAction> {
        self.messages().into_iter().map(|m| m.action).collect()
    }
}

impl DomainPort for RecordingPublisher {}

impl NotificationPublisher for RecordingPublisher {
    fn publish(&self, message: EventMessage) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message);
        }
    }
}

/// Sink whose broker rejects every delivery
#[derive(Default)]
pub struct FailingSink {
    attempts: AtomicUsize,
}

impl FailingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliveries attempted so far
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageSink for FailingSink {
    async fn send(&self, key: &str, _payload: &[u8]) -> Result<(), MessagingError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(MessagingError::Delivery {
            key: key.to_string(),
            reason: "broker transport failure".to_string(),
        })
    }

    fn flush(&self, _timeout: Duration) -> Result<(), MessagingError> {
        Err(MessagingError::Flush("broker transport failure".to_string()))
    }
}

/// Sink whose deliveries never complete, like a broker that stopped answering
#[derive(Default)]
pub struct HangingSink {
    started: AtomicUsize,
}

impl HangingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliveries the worker has started
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageSink for HangingSink {
    async fn send(&self, _key: &str, _payload: &[u8]) -> Result<(), MessagingError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }

    fn flush(&self, _timeout: Duration) -> Result<(), MessagingError> {
        Ok(())
    }
}
