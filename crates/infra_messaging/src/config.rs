//! Messaging configuration

use std::time::Duration;

/// Configuration for the Kafka producer, consumer and publish queue
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use infra_messaging::KafkaConfig;
///
/// let config = KafkaConfig::new("localhost:9092")
///     .topic("events")
///     .queue_capacity(256)
///     .drain_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct KafkaConfig {
    /// Comma-separated bootstrap servers
    pub brokers: String,
    /// Topic notifications are written to and read from
    pub topic: String,
    /// Consumer group of the notification consumer
    pub group_id: String,
    /// Messages that may wait for the worker before new ones are dropped
    pub queue_capacity: usize,
    /// Upper bound on a single delivery to the broker
    pub send_timeout: Duration,
    /// How long `close` waits for queued messages and the final flush
    pub drain_timeout: Duration,
}

impl KafkaConfig {
    pub fn new(brokers: impl Into<String>) -> Self {
        Self {
            brokers: brokers.into(),
            topic: "events".to_string(),
            group_id: "event-consumer-group".to_string(),
            queue_capacity: 1024,
            send_timeout: Duration::from_secs(5),
            drain_timeout: Duration::from_secs(10),
        }
    }

    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    pub fn group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = group_id.into();
        self
    }

    /// Sets the queue capacity; zero is raised to one
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    pub fn send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    pub fn drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self::new("localhost:9092")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = KafkaConfig::default();
        assert_eq!(config.brokers, "localhost:9092");
        assert_eq!(config.topic, "events");
        assert_eq!(config.group_id, "event-consumer-group");
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        assert_eq!(KafkaConfig::default().queue_capacity(0).queue_capacity, 1);
    }
}
