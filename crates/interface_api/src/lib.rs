//! HTTP API Layer
//!
//! This crate provides the REST API for the event registration backend
//! using Axum, and the `eventhub-server` binary that runs it next to the
//! gRPC server.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for auth, events and registrations
//! - **Extractors**: Caller authentication and rejection mapping
//! - **Middleware**: Audit logging, tracing, request ids, timeouts
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::new(auth, events), config.request_timeout());
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    error_handling::HandleErrorLayer,
    routing::{get, post},
    middleware as axum_middleware,
};
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_auth::AuthService;
use domain_events::EventService;

use crate::error::handle_middleware_error;
use crate::handlers::{auth, events, health, registrations};
use crate::middleware::audit_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub events: Arc<EventService>,
}

impl AppState {
    pub fn new(auth: Arc<AuthService>, events: Arc<EventService>) -> Self {
        Self { auth, events }
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Services shared by the handlers
/// * `request_timeout` - Deadline for each request
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    // Public routes
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // Handlers taking `AuthenticatedUser` reject unauthenticated callers
    let event_routes = Router::new()
        .route("/", get(events::list_events).post(events::create_event))
        .route(
            "/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route(
            "/:id/register",
            post(registrations::register_for_event).delete(registrations::cancel_registration),
        );

    let user_routes = Router::new()
        .route("/:id/registrations", get(registrations::list_user_registrations));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/events", event_routes)
        .nest("/users", user_routes)
        .layer(axum_middleware::from_fn_with_state(state.clone(), audit_middleware));

    Router::new()
        .merge(health_routes)
        .merge(api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
