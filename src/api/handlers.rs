//! API handlers for the alert bridge service.

use axum::{
    extract::{Path, State},
    response::Json,
};
use tracing::info;

use crate::api::models::{DevicesResponse, StatusResponse};
use crate::AppState;

/// Health check endpoint
pub async fn health_check() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "alertsrv running".to_string(),
        service: "MQTT alert bridge".to_string(),
        status: "ok".to_string(),
    })
}

/// Resolve a user's devices and subscribe to their alert topics.
///
/// Always answers 200 with the device list: directory failures surface
/// as an empty list and subscribe failures are logged by the registry,
/// never returned to the caller.
pub async fn get_user_devices(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<DevicesResponse> {
    let devices = state.directory.fetch_devices(&user_id).await;
    state.registry.ensure_subscribed(&user_id, &devices).await;

    info!("Resolved {} device(s) for user {}", devices.len(), user_id);
    Json(DevicesResponse { devices })
}
