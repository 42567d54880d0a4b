//! API error handling

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    BoxError, Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use core_kernel::{ErrorKind, ServiceError, UNAVAILABLE_MESSAGE};

/// API error types
///
/// One variant per [`ErrorKind`], so HTTP and RPC callers see the same
/// classification for the same failure.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Unauthorized(_) => ErrorKind::Unauthenticated,
            ApiError::Forbidden(_) => ErrorKind::Forbidden,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Conflict(_) => ErrorKind::Conflict,
            ApiError::BadRequest(_) => ErrorKind::Invalid,
            ApiError::Unavailable(_) => ErrorKind::Unavailable,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Invalid => StatusCode::BAD_REQUEST,
            ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.kind().as_str().to_string();

        let message = match self {
            ApiError::Unavailable(detail) => {
                warn!(detail = %detail, "Dependency failure during request");
                UNAVAILABLE_MESSAGE.to_string()
            }
            ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::BadRequest(msg) => msg,
        };

        (status, Json(ErrorResponse { error, message })).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unauthenticated(msg) => ApiError::Unauthorized(msg),
            ServiceError::Forbidden(msg) => ApiError::Forbidden(msg),
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::Conflict(msg) => ApiError::Conflict(msg),
            ServiceError::Invalid(msg) => ApiError::BadRequest(msg),
            ServiceError::Unavailable(msg) => ApiError::Unavailable(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Renders failures raised by tower middleware with the same body as handler errors
pub async fn handle_middleware_error(error: BoxError) -> ApiError {
    if error.is::<tower::timeout::error::Elapsed>() {
        ApiError::Unavailable("request deadline elapsed".to_string())
    } else {
        ApiError::Unavailable(format!("middleware failure: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_kinds_map_to_status_codes() {
        let cases = [
            (ServiceError::unauthenticated("invalid token"), StatusCode::UNAUTHORIZED),
            (ServiceError::forbidden("not yours"), StatusCode::FORBIDDEN),
            (ServiceError::not_found("Event", 1), StatusCode::NOT_FOUND),
            (ServiceError::conflict("taken"), StatusCode::CONFLICT),
            (ServiceError::invalid("name: is required"), StatusCode::BAD_REQUEST),
            (ServiceError::unavailable("pool closed"), StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status(), status);
        }
    }

    #[test]
    fn test_kind_survives_conversion() {
        let error = ApiError::from(ServiceError::invalid("bad"));
        assert_eq!(error.kind(), ErrorKind::Invalid);
    }
}
