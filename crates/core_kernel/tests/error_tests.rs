//! Tests for the service error taxonomy

use std::time::Duration;

use core_kernel::{ErrorKind, PortError, ServiceError};
use core_kernel::error::UNAVAILABLE_MESSAGE;

#[test]
fn test_constructors_map_to_kinds() {
    assert_eq!(ServiceError::unauthenticated("x").kind(), ErrorKind::Unauthenticated);
    assert_eq!(ServiceError::forbidden("x").kind(), ErrorKind::Forbidden);
    assert_eq!(ServiceError::not_found("Event", 1).kind(), ErrorKind::NotFound);
    assert_eq!(ServiceError::conflict("x").kind(), ErrorKind::Conflict);
    assert_eq!(ServiceError::invalid("x").kind(), ErrorKind::Invalid);
    assert_eq!(ServiceError::unavailable("x").kind(), ErrorKind::Unavailable);
}

#[test]
fn test_not_found_message() {
    let error = ServiceError::not_found("Event", 12);
    assert_eq!(error.public_message(), "Event 12 not found");
}

#[test]
fn test_transient_port_errors_become_unavailable() {
    let timeout = PortError::timeout("list_events", Duration::from_millis(100));
    let error: ServiceError = timeout.into();
    assert_eq!(error.kind(), ErrorKind::Unavailable);
    assert_eq!(error.public_message(), UNAVAILABLE_MESSAGE);

    let internal: ServiceError = PortError::internal("row decode failed").into();
    assert_eq!(internal.kind(), ErrorKind::Unavailable);
}

#[test]
fn test_kind_names() {
    assert_eq!(ErrorKind::NotFound.to_string(), "not_found");
    assert_eq!(ErrorKind::Unauthenticated.as_str(), "unauthenticated");
}
