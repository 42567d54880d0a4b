//! Messaging error types

use thiserror::Error;

/// Errors raised by the messaging layer
///
/// None of these reach a service caller: the publisher logs and drops,
/// and the consumer logs and continues.
#[derive(Debug, Error)]
pub enum MessagingError {
    /// The Kafka client could not be created from the configuration
    #[error("Failed to create Kafka client: {0}")]
    ClientCreation(String),

    /// Subscribing to the topic failed
    #[error("Failed to subscribe to {topic}: {reason}")]
    Subscription { topic: String, reason: String },

    /// The broker did not acknowledge a message
    #[error("Failed to deliver message {key}: {reason}")]
    Delivery { key: String, reason: String },

    /// Flushing the producer did not complete
    #[error("Failed to flush producer: {0}")]
    Flush(String),

    /// A message could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A consumed message had no payload
    #[error("Message has no payload")]
    EmptyPayload,
}

impl From<serde_json::Error> for MessagingError {
    fn from(error: serde_json::Error) -> Self {
        MessagingError::Serialization(error.to_string())
    }
}
