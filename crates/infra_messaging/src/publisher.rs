//! Detached notification publisher
//!
//! `publish` serializes the message and enqueues it without waiting. One
//! background worker drains the queue in FIFO order and writes each message
//! to the sink, so messages for the same event keep their submission order.
//! Delivery is at most once: a full queue, a closed publisher or a broker
//! failure drops the message with a warning.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use core_kernel::DomainPort;
use domain_events::{EventMessage, NotificationPublisher};

use crate::config::KafkaConfig;
use crate::sink::MessageSink;

enum Command {
    Publish { key: String, payload: Vec<u8> },
    Shutdown,
}

/// Queue-backed [`NotificationPublisher`] with a single delivery worker
///
/// Must be created inside a Tokio runtime. The worker is independent of any
/// request task, so request cancellation never cancels a delivery.
pub struct DetachedPublisher {
    sender: mpsc::Sender<Command>,
    worker: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
    drain_timeout: Duration,
}

impl DetachedPublisher {
    /// Spawns the worker over the given sink
    pub fn spawn(sink: Arc<dyn MessageSink>, config: &KafkaConfig) -> Self {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let worker = tokio::spawn(run_worker(receiver, sink, config.drain_timeout));

        info!(
            capacity = config.queue_capacity,
            topic = %config.topic,
            "Notification publisher started"
        );

        Self {
            sender,
            worker: Mutex::new(Some(worker)),
            closed: AtomicBool::new(false),
            drain_timeout: config.drain_timeout,
        }
    }

    /// Returns true once `close` has been called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Stops accepting messages and drains what was queued before the call
    ///
    /// Waits at most the drain timeout for queued deliveries and the final
    /// flush, then abandons the worker. Calling it again does nothing.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        let worker = self.worker.lock().ok().and_then(|mut guard| guard.take());
        let Some(mut worker) = worker else {
            return;
        };

        let drained = tokio::time::timeout(self.drain_timeout, async {
            if self.sender.send(Command::Shutdown).await.is_err() {
                debug!("Publisher worker already stopped");
            }
            (&mut worker).await
        })
        .await;

        match drained {
            Ok(Ok(())) => info!("Notification publisher drained"),
            Ok(Err(e)) => warn!(error = %e, "Notification worker ended abnormally"),
            Err(_) => {
                warn!(
                    timeout_ms = self.drain_timeout.as_millis() as u64,
                    "Drain timed out, abandoning queued notifications"
                );
                worker.abort();
            }
        }
    }
}

impl DomainPort for DetachedPublisher {}

impl NotificationPublisher for DetachedPublisher {
    fn publish(&self, message: EventMessage) {
        let key = message.partition_key();

        if self.is_closed() {
            warn!(key = %key, "Publisher closed, dropping notification");
            return;
        }

        let payload = match message.to_json() {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to serialize notification");
                return;
            }
        };

        match self.sender.try_send(Command::Publish { key, payload }) {
            Ok(()) => {}
            Err(TrySendError::Full(Command::Publish { key, .. })) => {
                warn!(key = %key, "Notification queue full, dropping notification");
            }
            Err(TrySendError::Closed(Command::Publish { key, .. })) => {
                warn!(key = %key, "Notification worker stopped, dropping notification");
            }
            Err(_) => {}
        }
    }
}

async fn run_worker(
    mut receiver: mpsc::Receiver<Command>,
    sink: Arc<dyn MessageSink>,
    flush_timeout: Duration,
) {
    while let Some(command) = receiver.recv().await {
        match command {
            Command::Publish { key, payload } => match sink.send(&key, &payload).await {
                Ok(()) => debug!(key = %key, "Notification delivered"),
                Err(e) => warn!(key = %key, error = %e, "Notification delivery failed"),
            },
            Command::Shutdown => break,
        }
    }

    let flushed = tokio::task::spawn_blocking(move || sink.flush(flush_timeout)).await;
    match flushed {
        Ok(Ok(())) => debug!("Producer flushed"),
        Ok(Err(e)) => warn!(error = %e, "Producer flush failed"),
        Err(e) => warn!(error = %e, "Producer flush task failed"),
    }
}
