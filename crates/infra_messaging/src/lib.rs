//! Messaging Infrastructure
//!
//! Kafka adapters for event change notifications:
//!
//! - [`KafkaSink`]: writes keyed JSON payloads to the notification topic
//! - [`DetachedPublisher`]: the [`NotificationPublisher`](domain_events::NotificationPublisher)
//!   used by the event service; enqueues and returns immediately
//! - [`EventMessageConsumer`]: reads the topic back and logs each notification
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use infra_messaging::{DetachedPublisher, KafkaConfig, KafkaSink};
//!
//! let config = KafkaConfig::new("localhost:9092");
//! let sink = Arc::new(KafkaSink::new(&config)?);
//! let publisher = Arc::new(DetachedPublisher::spawn(sink, &config));
//! // ...
//! publisher.close().await;
//! ```

pub mod config;
pub mod consumer;
pub mod error;
pub mod publisher;
pub mod sink;

pub use config::KafkaConfig;
pub use consumer::{decode_message, EventMessageConsumer};
pub use error::MessagingError;
pub use publisher::DetachedPublisher;
pub use sink::{KafkaSink, MessageSink};
