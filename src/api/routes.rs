//! API routes configuration

use axum::{routing::get, Router};

use crate::api::handlers::{get_user_devices, health_check};
use crate::AppState;

/// Create API routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/user/{user_id}", get(get_user_devices))
        .with_state(state)
}
