//! Event handlers

use axum::{extract::State, http::StatusCode, Json};

use core_kernel::EventId;

use crate::dto::event::*;
use crate::extractors::{ApiJson, ApiPath, AuthenticatedUser};
use crate::{error::ApiError, AppState};

/// Lists all events
pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let events = state.events.list_events().await?;
    Ok(Json(to_responses(events)))
}

/// Gets an event by ID
pub async fn get_event(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<EventResponse>, ApiError> {
    let event = state.events.get_event(EventId::new(id)).await?;
    Ok(Json(event.into()))
}

/// Creates an event owned by the caller
pub async fn create_event(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    ApiJson(request): ApiJson<EventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    let event = state.events.create_event(caller, request.into()).await?;
    Ok((StatusCode::CREATED, Json(event.into())))
}

/// Replaces an event's fields
pub async fn update_event(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<EventRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    let event = state
        .events
        .update_event(caller, EventId::new(id), request.into())
        .await?;
    Ok(Json(event.into()))
}

/// Deletes an event
pub async fn delete_event(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state.events.delete_event(caller, EventId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
