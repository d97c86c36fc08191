//! API request/response models.

use serde::{Deserialize, Serialize};

/// Service status payload returned by the root route.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub message: String,
    pub service: String,
    pub status: String,
}

/// Devices resolved for a user.
#[derive(Debug, Serialize, Deserialize)]
pub struct DevicesResponse {
    pub devices: Vec<String>,
}
