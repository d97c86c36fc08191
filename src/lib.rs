//! Alert Bridge Service Library
//!
//! Bridges device alert messages published over MQTT into durable
//! storage and exposes a small HTTP API for resolving a user's devices
//! and subscribing to their alert topics.

pub mod api;
pub mod config;
pub mod directory;
pub mod error;
pub mod ingest;
pub mod mqtt;
pub mod store;
pub mod subscription;

pub use config::BridgeConfig;
pub use error::{BridgeError, Result};

/// Application state shared by the API handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: std::sync::Arc<BridgeConfig>,
    pub registry: std::sync::Arc<subscription::SubscriptionRegistry>,
    pub directory: std::sync::Arc<directory::DeviceDirectory>,
}
