//! Event Domain
//!
//! Events are owned by the user who created them. Only the owner may update
//! or delete an event; any authenticated user may register for one, at most
//! once. Successful writes are announced to a [`NotificationPublisher`]
//! without waiting for delivery.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_events::{EventFields, EventService};
//!
//! let service = EventService::new(store, publisher);
//! let event = service.create_event(caller, fields).await?;
//! service.register_for_event(other_user, event.id).await?;
//! ```

pub mod event;
pub mod message;
pub mod ports;
pub mod service;

pub use event::{Event, EventFields, Registration};
pub use message::{EventAction, EventMessage};
pub use ports::{EventStore, NotificationPublisher};
pub use service::{EventService, DEFAULT_STORE_TIMEOUT};
