//! gRPC API Layer
//!
//! Serves the `eventhub.v1` services over tonic. Handlers authenticate
//! through the same [`AuthService`] as the HTTP layer and map
//! [`ServiceError`](core_kernel::ServiceError) kinds to gRPC status codes.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_rpc::{serve, RpcServerConfig};
//!
//! serve(RpcServerConfig::new(addr), auth, events, shutdown_signal()).await?;
//! ```

pub mod convert;
pub mod metadata;
pub mod status;
pub mod auth_server;
pub mod event_server;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use domain_auth::AuthService;
use domain_events::EventService;

pub use auth_server::AuthRpc;
pub use event_server::EventRpc;

/// Generated protobuf types and service traits
pub mod pb {
    tonic::include_proto!("eventhub.v1");

    /// Encoded descriptor set served by the reflection service
    pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("eventhub_descriptor");
}

/// Errors that stop the RPC server
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("Failed to build reflection service: {0}")]
    Reflection(#[from] tonic_reflection::server::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),
}

/// RPC server settings
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub addr: SocketAddr,
    /// Per-call deadline applied on top of any client `grpc-timeout`
    pub request_timeout: Duration,
}

impl RpcServerConfig {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Runs the gRPC server until `shutdown` resolves
pub async fn serve<F>(
    config: RpcServerConfig,
    auth: Arc<AuthService>,
    events: Arc<EventService>,
    shutdown: F,
) -> Result<(), RpcError>
where
    F: Future<Output = ()> + Send,
{
    let reflection = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(pb::FILE_DESCRIPTOR_SET)
        .build_v1()?;

    info!(addr = %config.addr, "gRPC server listening");

    tonic::transport::Server::builder()
        .timeout(config.request_timeout)
        .trace_fn(|request| tracing::info_span!("grpc", path = %request.uri().path()))
        .add_service(reflection)
        .add_service(EventRpc::new(auth.clone(), events).into_service())
        .add_service(AuthRpc::new(auth).into_service())
        .serve_with_shutdown(config.addr, shutdown)
        .await?;

    info!("gRPC server stopped");
    Ok(())
}
