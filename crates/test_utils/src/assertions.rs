//! Custom Test Assertions
//!
//! Assertion helpers for service results that report the actual error kind
//! and message on failure.

use std::fmt::Debug;

use core_kernel::{ErrorKind, ServiceError};

/// Asserts that a service call failed with the given kind
///
/// # Panics
///
/// Panics if the result is `Ok` or carries a different kind
pub fn assert_error_kind<T: Debug>(result: &Result<T, ServiceError>, expected: ErrorKind) {
    match result {
        Ok(value) => panic!("Expected {} error, got Ok({:?})", expected, value),
        Err(err) => assert_eq!(
            err.kind(),
            expected,
            "Expected {} error, got {} ({})",
            expected,
            err.kind(),
            err
        ),
    }
}

/// Asserts that a service call failed as unauthenticated
pub fn assert_unauthenticated<T: Debug>(result: &Result<T, ServiceError>) {
    assert_error_kind(result, ErrorKind::Unauthenticated);
}

/// Asserts that a service call failed the ownership check
pub fn assert_forbidden<T: Debug>(result: &Result<T, ServiceError>) {
    assert_error_kind(result, ErrorKind::Forbidden);
}

/// Asserts that a service call failed because something was missing
pub fn assert_not_found<T: Debug>(result: &Result<T, ServiceError>) {
    assert_error_kind(result, ErrorKind::NotFound);
}

/// Asserts that a service call hit a uniqueness violation
pub fn assert_conflict<T: Debug>(result: &Result<T, ServiceError>) {
    assert_error_kind(result, ErrorKind::Conflict);
}

/// Asserts that a service call rejected its input
pub fn assert_invalid<T: Debug>(result: &Result<T, ServiceError>) {
    assert_error_kind(result, ErrorKind::Invalid);
}

/// Asserts that a service call reported a downstream failure
pub fn assert_unavailable<T: Debug>(result: &Result<T, ServiceError>) {
    assert_error_kind(result, ErrorKind::Unavailable);
}
