//! Notification consumer
//!
//! Reads event notifications from the topic and logs them. Bad payloads
//! are logged and skipped; the loop only ends on shutdown.

use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::Message;
use tokio::sync::watch;
use tracing::{error, info, warn};

use domain_events::EventMessage;

use crate::config::KafkaConfig;
use crate::error::MessagingError;

/// Decodes a consumed payload into an [`EventMessage`]
pub fn decode_message(payload: Option<&[u8]>) -> Result<EventMessage, MessagingError> {
    let payload = payload.ok_or(MessagingError::EmptyPayload)?;
    Ok(EventMessage::from_json(payload)?)
}

pub struct EventMessageConsumer {
    consumer: StreamConsumer,
    topic: String,
}

impl EventMessageConsumer {
    /// Creates the consumer and subscribes to the configured topic
    pub fn new(config: &KafkaConfig) -> Result<Self, MessagingError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("group.id", &config.group_id)
            .set("auto.offset.reset", "earliest")
            .set("enable.auto.commit", "true")
            .set("enable.partition.eof", "false")
            .create()
            .map_err(|e| MessagingError::ClientCreation(e.to_string()))?;

        consumer
            .subscribe(&[config.topic.as_str()])
            .map_err(|e| MessagingError::Subscription {
                topic: config.topic.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            consumer,
            topic: config.topic.clone(),
        })
    }

    /// Consumes until the shutdown signal flips to true or its sender drops
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(topic = %self.topic, "Notification consumer started");

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                received = self.consumer.recv() => match received {
                    Ok(message) => {
                        let key = message
                            .key()
                            .map(|k| String::from_utf8_lossy(k).into_owned())
                            .unwrap_or_default();

                        match decode_message(message.payload()) {
                            Ok(decoded) => info!(
                                action = %decoded.action,
                                event_id = decoded.event.id.value(),
                                key = %key,
                                partition = message.partition(),
                                offset = message.offset(),
                                "Received event notification"
                            ),
                            Err(e) => warn!(
                                key = %key,
                                offset = message.offset(),
                                error = %e,
                                "Skipping undecodable notification"
                            ),
                        }
                    }
                    Err(e) => error!(error = %e, "Failed to receive notification"),
                },
            }
        }

        info!(topic = %self.topic, "Notification consumer stopped");
    }
}
