//! `eventhub.v1.AuthService` handlers

use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::instrument;

use domain_auth::{AuthService, Credentials};

use crate::pb::auth_service_server::{AuthService as AuthServiceRpc, AuthServiceServer};
use crate::pb::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::status::to_status;

pub struct AuthRpc {
    auth: Arc<AuthService>,
}

impl AuthRpc {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self { auth }
    }

    pub fn into_service(self) -> AuthServiceServer<Self> {
        AuthServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl AuthServiceRpc for AuthRpc {
    #[instrument(skip_all)]
    async fn register(
        &self,
        request: Request<RegisterRequest>,
    ) -> Result<Response<RegisterResponse>, Status> {
        let RegisterRequest { email, password } = request.into_inner();
        let user = self
            .auth
            .register(Credentials::new(email, password))
            .await
            .map_err(to_status)?;

        Ok(Response::new(RegisterResponse {
            user: Some(user.into()),
        }))
    }

    #[instrument(skip_all)]
    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        let LoginRequest { email, password } = request.into_inner();
        let session = self
            .auth
            .login(Credentials::new(email, password))
            .await
            .map_err(to_status)?;

        Ok(Response::new(LoginResponse {
            token: session.token,
            message: "login successful".to_string(),
        }))
    }
}
