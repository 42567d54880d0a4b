//! Request handlers

pub mod auth;
pub mod events;
pub mod registrations;
pub mod health;
