//! Server configuration

use std::time::Duration;

use serde::Deserialize;

use domain_auth::{PasswordHasher, TokenConfig};
use infra_db::DatabaseConfig;
use infra_messaging::KafkaConfig;

/// Server configuration
///
/// Every key can be overridden by an `API_`-prefixed environment variable,
/// e.g. `API_PORT=9090` or `API_KAFKA_BROKERS=broker:9092`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// HTTP port
    pub port: u16,
    /// gRPC port
    pub grpc_port: u16,
    /// HS256 signing secret for identity tokens
    pub jwt_secret: String,
    /// Token lifetime in seconds
    pub jwt_expiration_secs: u64,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// Database URL
    pub database_url: String,
    pub database_max_connections: u32,
    /// Comma-separated Kafka bootstrap servers
    pub kafka_brokers: String,
    pub kafka_topic: String,
    pub kafka_group_id: String,
    /// Whether the notification consumer runs alongside the servers
    pub consumer_enabled: bool,
    /// Deadline for a single HTTP request or RPC
    pub request_timeout_secs: u64,
    /// Deadline for a single store call
    pub store_timeout_secs: u64,
    /// Log level
    pub log_level: String,
    /// Emit one JSON object per log line instead of human-readable text
    pub log_json: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            grpc_port: 50051,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 7200,
            bcrypt_cost: 12,
            database_url: "postgres://localhost/eventhub".to_string(),
            database_max_connections: 10,
            kafka_brokers: "localhost:9092".to_string(),
            kafka_topic: "events".to_string(),
            kafka_group_id: "event-consumer-group".to_string(),
            consumer_enabled: true,
            request_timeout_secs: 30,
            store_timeout_secs: 10,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    ///
    /// Unset keys keep their defaults.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the HTTP server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the gRPC server address
    pub fn grpc_addr(&self) -> String {
        format!("{}:{}", self.host, self.grpc_port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }

    pub fn token_config(&self) -> TokenConfig {
        TokenConfig::new(self.jwt_secret.clone()).with_ttl_secs(self.jwt_expiration_secs)
    }

    pub fn password_hasher(&self) -> PasswordHasher {
        PasswordHasher::new(self.bcrypt_cost)
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.database_url.clone())
            .max_connections(self.database_max_connections)
    }

    pub fn kafka_config(&self) -> KafkaConfig {
        KafkaConfig::new(self.kafka_brokers.clone())
            .topic(self.kafka_topic.clone())
            .group_id(self.kafka_group_id.clone())
    }
}
