//! HTTP API for the alert bridge service.

pub mod handlers;
pub mod models;
pub mod routes;

pub use routes::create_router;
