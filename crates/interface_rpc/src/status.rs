//! Service error to gRPC status mapping

use tonic::{Code, Status};
use tracing::warn;

use core_kernel::{ErrorKind, ServiceError};

/// gRPC code for each error kind
pub fn status_code(kind: ErrorKind) -> Code {
    match kind {
        ErrorKind::Unauthenticated => Code::Unauthenticated,
        ErrorKind::Forbidden => Code::PermissionDenied,
        ErrorKind::NotFound => Code::NotFound,
        ErrorKind::Conflict => Code::AlreadyExists,
        ErrorKind::Invalid => Code::InvalidArgument,
        ErrorKind::Unavailable => Code::Unavailable,
    }
}

/// Converts a service error into the status returned to the caller
///
/// Downstream detail of `Unavailable` errors is logged, not returned.
pub fn to_status(error: ServiceError) -> Status {
    if let ServiceError::Unavailable(detail) = &error {
        warn!(detail = %detail, "Dependency failure during RPC");
    }
    Status::new(status_code(error.kind()), error.public_message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::UNAVAILABLE_MESSAGE;

    #[test]
    fn test_each_kind_has_its_code() {
        let cases = [
            (ServiceError::unauthenticated("invalid token"), Code::Unauthenticated),
            (ServiceError::forbidden("not yours"), Code::PermissionDenied),
            (ServiceError::not_found("Event", 3), Code::NotFound),
            (ServiceError::conflict("taken"), Code::AlreadyExists),
            (ServiceError::invalid("name: is required"), Code::InvalidArgument),
            (ServiceError::unavailable("pool timed out"), Code::Unavailable),
        ];

        for (error, code) in cases {
            assert_eq!(to_status(error).code(), code);
        }
    }

    #[test]
    fn test_unavailable_detail_is_hidden() {
        let status = to_status(ServiceError::unavailable("connection refused: 10.0.0.5"));
        assert_eq!(status.message(), UNAVAILABLE_MESSAGE);
    }

    #[test]
    fn test_not_found_message_is_kept() {
        let status = to_status(ServiceError::not_found("Event", 3));
        assert_eq!(status.message(), "Event 3 not found");
    }
}
