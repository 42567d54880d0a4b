//! Caller identity from request metadata

use tonic::{Request, Status};

use core_kernel::UserId;
use domain_auth::AuthService;

use crate::status::to_status;

/// Metadata key carrying the bearer token
pub const AUTHORIZATION: &str = "authorization";

/// Raw `authorization` value, if present and valid ASCII
pub fn authorization<T>(request: &Request<T>) -> Option<&str> {
    request
        .metadata()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

/// Resolves the caller of an RPC
pub fn authenticate<T>(auth: &AuthService, request: &Request<T>) -> Result<UserId, Status> {
    auth.authenticate(authorization(request)).map_err(to_status)
}
