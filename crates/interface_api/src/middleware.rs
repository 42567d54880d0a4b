//! API middleware

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use tower_http::request_id::RequestId;
use tracing::info;

use crate::extractors::AuthenticatedUser;
use crate::AppState;

/// Audit logging middleware
///
/// Verifies the bearer token once and stores the caller in the request
/// extensions for [`AuthenticatedUser`]. Never rejects; a missing or invalid
/// token is left for the handler's extractor to report.
pub async fn audit_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .map(str::to_owned);

    let caller = caller(&state, &request);
    let user = caller.map(|AuthenticatedUser(id)| id.to_string());
    if let Some(caller) = caller {
        request.extensions_mut().insert(caller);
    }

    let started = Instant::now();
    let response = next.run(request).await;

    info!(
        %method,
        path = %path,
        request_id = request_id.as_deref().unwrap_or("-"),
        user = user.as_deref().unwrap_or("anonymous"),
        status = response.status().as_u16(),
        duration_ms = started.elapsed().as_millis() as u64,
        "API request"
    );

    response
}

fn caller(state: &AppState, request: &Request<Body>) -> Option<AuthenticatedUser> {
    let header = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
    state.auth.authenticate(Some(header)).ok().map(AuthenticatedUser)
}
