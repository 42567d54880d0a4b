//! Detached publisher tests against in-process sinks

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Notify, Semaphore};

use core_kernel::{EventId, UserId};
use domain_events::{Event, EventAction, EventMessage, NotificationPublisher};
use infra_messaging::{decode_message, DetachedPublisher, KafkaConfig, MessageSink, MessagingError};
use test_utils::{EventFixtures, FailingSink, HangingSink, TestServicesBuilder};

fn message(action: EventAction, id: i64) -> EventMessage {
    let fields = EventFixtures::launch();
    EventMessage::new(
        action,
        Event {
            id: EventId::new(id),
            name: fields.name,
            description: fields.description,
            location: fields.location,
            date_time: fields.date_time,
            user_id: UserId::new(1),
        },
    )
}

fn config() -> KafkaConfig {
    KafkaConfig::default().drain_timeout(Duration::from_secs(5))
}

#[derive(Default)]
struct RecordingSink {
    delivered: Mutex<Vec<(String, Vec<u8>)>>,
    flushed: AtomicBool,
}

impl RecordingSink {
    fn keys(&self) -> Vec<String> {
        self.delivered
            .lock()
            .unwrap()
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn send(&self, key: &str, payload: &[u8]) -> Result<(), MessagingError> {
        self.delivered
            .lock()
            .unwrap()
            .push((key.to_string(), payload.to_vec()));
        Ok(())
    }

    fn flush(&self, _timeout: Duration) -> Result<(), MessagingError> {
        self.flushed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Holds every delivery until the test opens the gate
struct GatedSink {
    started: Notify,
    gate: Semaphore,
    inner: RecordingSink,
}

impl GatedSink {
    fn new() -> Self {
        Self {
            started: Notify::new(),
            gate: Semaphore::new(0),
            inner: RecordingSink::default(),
        }
    }
}

#[async_trait]
impl MessageSink for GatedSink {
    async fn send(&self, key: &str, payload: &[u8]) -> Result<(), MessagingError> {
        self.started.notify_one();
        if let Ok(permit) = self.gate.acquire().await {
            permit.forget();
        }
        self.inner.send(key, payload).await
    }

    fn flush(&self, timeout: Duration) -> Result<(), MessagingError> {
        self.inner.flush(timeout)
    }
}

#[tokio::test]
async fn test_messages_are_delivered_in_submission_order() {
    let sink = Arc::new(RecordingSink::default());
    let publisher = DetachedPublisher::spawn(sink.clone(), &config());

    publisher.publish(message(EventAction::Created, 1));
    publisher.publish(message(EventAction::Updated, 1));
    publisher.publish(message(EventAction::Deleted, 1));
    publisher.close().await;

    assert_eq!(sink.keys(), vec!["created-1", "updated-1", "deleted-1"]);
}

#[tokio::test]
async fn test_payload_decodes_back_to_the_message() {
    let sink = Arc::new(RecordingSink::default());
    let publisher = DetachedPublisher::spawn(sink.clone(), &config());
    let sent = message(EventAction::Created, 7);

    publisher.publish(sent.clone());
    publisher.close().await;

    let delivered = sink.delivered.lock().unwrap().clone();
    assert_eq!(delivered.len(), 1);
    let (key, payload) = &delivered[0];
    assert_eq!(key, "created-7");
    assert_eq!(decode_message(Some(payload.as_slice())).unwrap(), sent);
}

#[tokio::test]
async fn test_full_queue_drops_new_messages() {
    let sink = Arc::new(GatedSink::new());
    let publisher = DetachedPublisher::spawn(sink.clone(), &config().queue_capacity(1));

    publisher.publish(message(EventAction::Created, 1));
    sink.started.notified().await;

    // worker is holding message 1; message 2 fills the queue
    publisher.publish(message(EventAction::Created, 2));
    publisher.publish(message(EventAction::Created, 3));

    sink.gate.add_permits(10);
    publisher.close().await;

    assert_eq!(sink.inner.keys(), vec!["created-1", "created-2"]);
}

#[tokio::test]
async fn test_failing_sink_does_not_stop_the_worker() {
    let sink = Arc::new(FailingSink::new());
    let publisher = DetachedPublisher::spawn(sink.clone(), &config());

    for id in 1..=3 {
        publisher.publish(message(EventAction::Created, id));
    }
    publisher.close().await;

    assert_eq!(sink.attempts(), 3);
}

#[tokio::test]
async fn test_close_drains_queue_then_flushes() {
    let sink = Arc::new(RecordingSink::default());
    let publisher = DetachedPublisher::spawn(sink.clone(), &config());

    for id in 1..=20 {
        publisher.publish(message(EventAction::Created, id));
    }
    assert!(!sink.flushed.load(Ordering::SeqCst));

    publisher.close().await;

    assert_eq!(sink.keys().len(), 20);
    assert!(sink.flushed.load(Ordering::SeqCst));
    assert!(publisher.is_closed());
}

#[tokio::test]
async fn test_close_is_idempotent() {
    let sink = Arc::new(RecordingSink::default());
    let publisher = DetachedPublisher::spawn(sink.clone(), &config());

    publisher.publish(message(EventAction::Created, 1));
    publisher.close().await;
    publisher.close().await;

    assert_eq!(sink.keys(), vec!["created-1"]);
}

#[tokio::test]
async fn test_publish_after_close_is_dropped() {
    let sink = Arc::new(RecordingSink::default());
    let publisher = DetachedPublisher::spawn(sink.clone(), &config());

    publisher.close().await;
    publisher.publish(message(EventAction::Created, 1));
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(sink.keys().is_empty());
}

#[tokio::test]
async fn test_close_gives_up_after_drain_timeout() {
    let sink = Arc::new(GatedSink::new());
    let config = config().drain_timeout(Duration::from_millis(50));
    let publisher = DetachedPublisher::spawn(sink.clone(), &config);

    publisher.publish(message(EventAction::Created, 1));
    publisher.publish(message(EventAction::Created, 2));
    sink.started.notified().await;

    let closed = tokio::time::timeout(Duration::from_secs(2), publisher.close()).await;

    assert!(closed.is_ok(), "close must return once the drain timeout elapses");
    assert!(sink.inner.keys().is_empty());
    assert!(!sink.inner.flushed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_event_writes_succeed_while_broker_rejects_deliveries() {
    let sink = Arc::new(FailingSink::new());
    let publisher = Arc::new(DetachedPublisher::spawn(sink.clone(), &config()));
    let services = TestServicesBuilder::new()
        .with_publisher(publisher.clone())
        .build();
    let owner = UserId::new(1);

    let event = services
        .events
        .create_event(owner, EventFixtures::launch())
        .await
        .unwrap();
    services
        .events
        .update_event(owner, event.id, EventFixtures::meetup())
        .await
        .unwrap();
    services.events.delete_event(owner, event.id).await.unwrap();

    publisher.close().await;
    assert_eq!(sink.attempts(), 3);
    assert!(services.events.list_events().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_event_writes_return_promptly_while_broker_hangs() {
    let sink = Arc::new(HangingSink::new());
    let drain_timeout = Duration::from_millis(100);
    let publisher = Arc::new(DetachedPublisher::spawn(
        sink.clone(),
        &config().drain_timeout(drain_timeout),
    ));
    let services = TestServicesBuilder::new()
        .with_publisher(publisher.clone())
        .build();
    let owner = UserId::new(1);

    for _ in 0..3 {
        let created = tokio::time::timeout(
            Duration::from_secs(1),
            services.events.create_event(owner, EventFixtures::launch()),
        )
        .await;
        assert!(matches!(created, Ok(Ok(_))), "create must not wait for the broker");
    }
    assert_eq!(services.events.list_events().await.unwrap().len(), 3);

    let started = std::time::Instant::now();
    publisher.close().await;

    assert!(started.elapsed() < drain_timeout + Duration::from_secs(1));
    assert_eq!(sink.started(), 1);
    assert!(publisher.is_closed());
}
