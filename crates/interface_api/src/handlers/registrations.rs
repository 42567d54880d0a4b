//! Registration handlers

use axum::{extract::State, http::StatusCode, Json};

use core_kernel::{EventId, UserId};

use crate::dto::event::*;
use crate::extractors::{ApiPath, AuthenticatedUser};
use crate::{error::ApiError, AppState};

/// Registers the caller for an event
pub async fn register_for_event(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    ApiPath(event_id): ApiPath<i64>,
) -> Result<(StatusCode, Json<RegisteredResponse>), ApiError> {
    let registration = state
        .events
        .register_for_event(caller, EventId::new(event_id))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisteredResponse {
            message: "registered for event".to_string(),
            registration: registration.into(),
        }),
    ))
}

/// Cancels the caller's registration for an event
pub async fn cancel_registration(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    ApiPath(event_id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .events
        .cancel_registration(caller, EventId::new(event_id))
        .await?;

    Ok(Json(MessageResponse {
        message: "registration cancelled".to_string(),
    }))
}

/// Lists the events a user is registered for
///
/// Users may only list their own registrations.
pub async fn list_user_registrations(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    ApiPath(user_id): ApiPath<i64>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    if UserId::new(user_id) != caller {
        return Err(ApiError::Forbidden(format!(
            "not authorized to view registrations of user {}",
            user_id
        )));
    }

    let events = state.events.list_user_registrations(caller).await?;
    Ok(Json(to_responses(events)))
}
