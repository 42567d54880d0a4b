//! `eventhub.v1.EventService` handlers
//!
//! `GetEvents` and `GetEvent` are public; every other call resolves the
//! caller from the `authorization` metadata entry before touching the
//! service.

use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::instrument;

use core_kernel::EventId;
use domain_auth::AuthService;
use domain_events::EventService;

use crate::convert::{event_fields, to_pb_events};
use crate::metadata::authenticate;
use crate::pb::event_service_server::{EventService as EventServiceRpc, EventServiceServer};
use crate::pb::{
    CancelRegistrationRequest, CancelRegistrationResponse, CreateEventRequest,
    CreateEventResponse, DeleteEventRequest, DeleteEventResponse, GetEventRequest,
    GetEventResponse, GetEventsRequest, GetEventsResponse, GetUserRegistrationsRequest,
    GetUserRegistrationsResponse, RegisterForEventRequest, RegisterForEventResponse,
    UpdateEventRequest, UpdateEventResponse,
};
use crate::status::to_status;

pub struct EventRpc {
    auth: Arc<AuthService>,
    events: Arc<EventService>,
}

impl EventRpc {
    pub fn new(auth: Arc<AuthService>, events: Arc<EventService>) -> Self {
        Self { auth, events }
    }

    pub fn into_service(self) -> EventServiceServer<Self> {
        EventServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl EventServiceRpc for EventRpc {
    #[instrument(skip_all)]
    async fn get_events(
        &self,
        _request: Request<GetEventsRequest>,
    ) -> Result<Response<GetEventsResponse>, Status> {
        let events = self.events.list_events().await.map_err(to_status)?;
        Ok(Response::new(GetEventsResponse {
            events: to_pb_events(events),
        }))
    }

    #[instrument(skip_all, fields(event_id = request.get_ref().id))]
    async fn get_event(
        &self,
        request: Request<GetEventRequest>,
    ) -> Result<Response<GetEventResponse>, Status> {
        let id = EventId::new(request.into_inner().id);
        let event = self.events.get_event(id).await.map_err(to_status)?;
        Ok(Response::new(GetEventResponse {
            event: Some(event.into()),
        }))
    }

    #[instrument(skip_all)]
    async fn create_event(
        &self,
        request: Request<CreateEventRequest>,
    ) -> Result<Response<CreateEventResponse>, Status> {
        let caller = authenticate(&self.auth, &request)?;
        let CreateEventRequest {
            name,
            description,
            location,
            date_time,
        } = request.into_inner();

        let fields = event_fields(name, description, location, date_time).map_err(to_status)?;
        let event = self
            .events
            .create_event(caller, fields)
            .await
            .map_err(to_status)?;

        Ok(Response::new(CreateEventResponse {
            event: Some(event.into()),
        }))
    }

    #[instrument(skip_all, fields(event_id = request.get_ref().id))]
    async fn update_event(
        &self,
        request: Request<UpdateEventRequest>,
    ) -> Result<Response<UpdateEventResponse>, Status> {
        let caller = authenticate(&self.auth, &request)?;
        let UpdateEventRequest {
            id,
            name,
            description,
            location,
            date_time,
        } = request.into_inner();

        let fields = event_fields(name, description, location, date_time).map_err(to_status)?;
        let event = self
            .events
            .update_event(caller, EventId::new(id), fields)
            .await
            .map_err(to_status)?;

        Ok(Response::new(UpdateEventResponse {
            event: Some(event.into()),
        }))
    }

    #[instrument(skip_all, fields(event_id = request.get_ref().id))]
    async fn delete_event(
        &self,
        request: Request<DeleteEventRequest>,
    ) -> Result<Response<DeleteEventResponse>, Status> {
        let caller = authenticate(&self.auth, &request)?;
        let id = EventId::new(request.into_inner().id);

        self.events
            .delete_event(caller, id)
            .await
            .map_err(to_status)?;

        Ok(Response::new(DeleteEventResponse {}))
    }

    #[instrument(skip_all, fields(event_id = request.get_ref().event_id))]
    async fn register_for_event(
        &self,
        request: Request<RegisterForEventRequest>,
    ) -> Result<Response<RegisterForEventResponse>, Status> {
        let caller = authenticate(&self.auth, &request)?;
        let event_id = EventId::new(request.into_inner().event_id);

        let registration = self
            .events
            .register_for_event(caller, event_id)
            .await
            .map_err(to_status)?;

        Ok(Response::new(RegisterForEventResponse {
            registration: Some(registration.into()),
        }))
    }

    #[instrument(skip_all, fields(event_id = request.get_ref().event_id))]
    async fn cancel_registration(
        &self,
        request: Request<CancelRegistrationRequest>,
    ) -> Result<Response<CancelRegistrationResponse>, Status> {
        let caller = authenticate(&self.auth, &request)?;
        let event_id = EventId::new(request.into_inner().event_id);

        self.events
            .cancel_registration(caller, event_id)
            .await
            .map_err(to_status)?;

        Ok(Response::new(CancelRegistrationResponse {}))
    }

    #[instrument(skip_all)]
    async fn get_user_registrations(
        &self,
        request: Request<GetUserRegistrationsRequest>,
    ) -> Result<Response<GetUserRegistrationsResponse>, Status> {
        let caller = authenticate(&self.auth, &request)?;
        let events = self
            .events
            .list_user_registrations(caller)
            .await
            .map_err(to_status)?;

        Ok(Response::new(GetUserRegistrationsResponse {
            events: to_pb_events(events),
        }))
    }
}
