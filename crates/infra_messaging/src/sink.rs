//! Message sinks
//!
//! A sink delivers one keyed payload to the stream. The publisher only
//! depends on [`MessageSink`], so its queue and drain behavior can run
//! against any sink.

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use tracing::debug;

use crate::config::KafkaConfig;
use crate::error::MessagingError;

/// Destination for serialized notifications
#[async_trait]
pub trait MessageSink: Send + Sync + 'static {
    /// Delivers one message and waits for the acknowledgement
    async fn send(&self, key: &str, payload: &[u8]) -> Result<(), MessagingError>;

    /// Blocks until buffered messages are delivered or the timeout elapses
    fn flush(&self, timeout: Duration) -> Result<(), MessagingError>;
}

/// Kafka-backed sink writing to a single topic
pub struct KafkaSink {
    producer: FutureProducer,
    topic: String,
    send_timeout: Duration,
}

impl KafkaSink {
    /// Creates the producer
    ///
    /// Creation does not contact the brokers; an unreachable broker shows
    /// up later as delivery failures.
    pub fn new(config: &KafkaConfig) -> Result<Self, MessagingError> {
        let message_timeout_ms = config.send_timeout.as_millis().to_string();
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("message.timeout.ms", &message_timeout_ms)
            .set("acks", "1")
            .create()
            .map_err(|e| MessagingError::ClientCreation(e.to_string()))?;

        Ok(Self {
            producer,
            topic: config.topic.clone(),
            send_timeout: config.send_timeout,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

#[async_trait]
impl MessageSink for KafkaSink {
    async fn send(&self, key: &str, payload: &[u8]) -> Result<(), MessagingError> {
        let record = FutureRecord::to(&self.topic).key(key).payload(payload);

        match self
            .producer
            .send(record, Timeout::After(self.send_timeout))
            .await
        {
            Ok((partition, offset)) => {
                debug!(topic = %self.topic, key, partition, offset, "Message delivered");
                Ok(())
            }
            Err((kafka_error, _)) => Err(MessagingError::Delivery {
                key: key.to_string(),
                reason: kafka_error.to_string(),
            }),
        }
    }

    fn flush(&self, timeout: Duration) -> Result<(), MessagingError> {
        self.producer
            .flush(Timeout::After(timeout))
            .map_err(|e| MessagingError::Flush(e.to_string()))
    }
}
