//! Event Registration Backend - Server Binary
//!
//! Starts the HTTP API, the gRPC API and the notification consumer over a
//! shared set of services.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin eventhub-server
//!
//! # Run with environment variables
//! API_PORT=8080 API_GRPC_PORT=50051 API_DATABASE_URL=postgres://... cargo run --bin eventhub-server
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Bind host for both servers (default: 0.0.0.0)
//! * `API_PORT` - HTTP port (default: 8080)
//! * `API_GRPC_PORT` - gRPC port (default: 50051)
//! * `API_JWT_SECRET` - Token signing secret (required in production)
//! * `API_JWT_EXPIRATION_SECS` - Token lifetime in seconds (default: 7200)
//! * `API_BCRYPT_COST` - bcrypt work factor (default: 12)
//! * `API_DATABASE_URL` - PostgreSQL connection string
//! * `API_KAFKA_BROKERS` - Kafka bootstrap servers (default: localhost:9092)
//! * `API_KAFKA_TOPIC` - Notification topic (default: events)
//! * `API_CONSUMER_ENABLED` - Run the notification consumer (default: true)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_LOG_JSON` - Emit JSON log lines (default: false)
//!
//! `RUST_LOG` takes precedence over `API_LOG_LEVEL` when set.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_auth::{AuthService, TokenService};
use domain_events::EventService;
use infra_db::{create_pool, run_migrations, PostgresCredentialStore, PostgresEventStore};
use infra_messaging::{DetachedPublisher, EventMessageConsumer, KafkaSink};
use interface_api::{config::ApiConfig, create_router, AppState};
use interface_rpc::RpcServerConfig;

/// Main entry point for the server.
///
/// Initializes logging, loads configuration, connects to the database and
/// the broker, then serves both transports until Ctrl+C or SIGTERM. Queued
/// notifications are drained after both servers have stopped.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration values cannot be parsed
/// - Database connection or migrations fail
/// - The Kafka producer cannot be created
/// - Either server fails to bind or stops with an error
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("Invalid API_* configuration")?;

    init_tracing(&config.log_level, config.log_json);

    tracing::info!(
        host = %config.host,
        http_port = config.port,
        grpc_port = config.grpc_port,
        "Starting event registration server"
    );

    let pool = create_pool(config.database_config())
        .await
        .context("Failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("Failed to apply migrations")?;

    let kafka = config.kafka_config();
    let sink = Arc::new(KafkaSink::new(&kafka).context("Failed to create Kafka producer")?);
    let publisher = Arc::new(DetachedPublisher::spawn(sink, &kafka));

    let tokens = Arc::new(TokenService::new(config.token_config()));
    let auth = Arc::new(
        AuthService::new(
            Arc::new(PostgresCredentialStore::new(pool.clone())),
            config.password_hasher(),
            tokens,
        )
        .with_store_timeout(config.store_timeout()),
    );
    let events = Arc::new(
        EventService::new(
            Arc::new(PostgresEventStore::new(pool.clone())),
            publisher.clone(),
        )
        .with_store_timeout(config.store_timeout()),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let consumer = if config.consumer_enabled {
        match EventMessageConsumer::new(&kafka) {
            Ok(consumer) => Some(tokio::spawn(consumer.run(shutdown_rx.clone()))),
            Err(e) => {
                tracing::warn!(error = %e, "Notification consumer disabled");
                None
            }
        }
    } else {
        None
    };

    let http_addr: SocketAddr = config.server_addr().parse()?;
    let grpc_addr: SocketAddr = config.grpc_addr().parse()?;

    let listener = TcpListener::bind(http_addr)
        .await
        .with_context(|| format!("Failed to bind {}", http_addr))?;
    let app = create_router(
        AppState::new(auth.clone(), events.clone()),
        config.request_timeout(),
    );
    tracing::info!(addr = %http_addr, "HTTP server listening");

    let http = async {
        axum::serve(listener, app)
            .with_graceful_shutdown(wait_for_shutdown(shutdown_rx.clone()))
            .await
            .context("HTTP server failed")
    };
    let grpc = async {
        interface_rpc::serve(
            RpcServerConfig::new(grpc_addr).request_timeout(config.request_timeout()),
            auth,
            events,
            wait_for_shutdown(shutdown_rx.clone()),
        )
        .await
        .context("gRPC server failed")
    };
    let signal = async {
        shutdown_signal().await;
        shutdown_tx.send_replace(true);
        Ok::<(), anyhow::Error>(())
    };

    let served = tokio::try_join!(signal, http, grpc);

    // Stops the consumer as well when a server failed before any signal
    shutdown_tx.send_replace(true);

    if let Some(consumer) = consumer {
        if let Err(e) = consumer.await {
            tracing::warn!(error = %e, "Notification consumer ended abnormally");
        }
    }

    publisher.close().await;
    pool.close().await;

    served?;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// # Arguments
///
/// * `log_level` - The minimum log level to output (trace, debug, info, warn, error)
/// * `json` - Format each event as a JSON object
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

/// Resolves once shutdown has been requested
async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    // An error means the sender is gone, which also ends the servers
    let _ = shutdown.wait_for(|stop| *stop).await;
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
