//! Request extractors
//!
//! Body and path extractors reject with [`ApiError`] so malformed input
//! gets the same JSON error body as every other failure.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use core_kernel::UserId;

use crate::error::ApiError;
use crate::AppState;

/// Caller resolved from the `authorization` header
///
/// Reuses the caller the audit middleware already verified; otherwise the
/// header is verified here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(caller) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(*caller);
        }
        let user_id = state.auth.authenticate(authorization(parts))?;
        Ok(Self(user_id))
    }
}

/// Raw `authorization` header value, if present and visible ASCII
pub fn authorization(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

/// JSON body extractor
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameter extractor
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

#[cfg(test)]
mod tests {
    use axum::http::Request;
    use test_utils::TestServicesBuilder;

    use super::*;

    fn state() -> AppState {
        let services = TestServicesBuilder::new().build();
        AppState::new(services.auth, services.events)
    }

    #[tokio::test]
    async fn test_reuses_caller_resolved_by_middleware() {
        let (mut parts, _) = Request::builder()
            .extension(AuthenticatedUser(UserId::new(7)))
            .body(())
            .unwrap()
            .into_parts();

        let caller = AuthenticatedUser::from_request_parts(&mut parts, &state())
            .await
            .unwrap();
        assert_eq!(caller, AuthenticatedUser(UserId::new(7)));
    }

    #[tokio::test]
    async fn test_rejects_without_header_or_resolved_caller() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();

        let rejection = AuthenticatedUser::from_request_parts(&mut parts, &state())
            .await
            .unwrap_err();
        assert!(matches!(rejection, ApiError::Unauthorized(_)));
    }
}
