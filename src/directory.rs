//! Device directory adapter.
//!
//! Resolves a user id to the list of device ids named in the user's
//! profile document. Lookup failures are absorbed here: the caller only
//! ever sees a device list, never an error, so "lookup failed" and
//! "user has no devices" are indistinguishable by design.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error};

use crate::store::ProfileStore;

/// Resolves users to their device ids via the profile store.
pub struct DeviceDirectory {
    store: Arc<dyn ProfileStore>,
}

impl DeviceDirectory {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// Device ids for a user; empty when the user is unknown, the
    /// document carries no usable `devices` field, or the lookup fails.
    pub async fn fetch_devices(&self, user_id: &str) -> Vec<String> {
        debug!("Fetching devices for user {}", user_id);

        match self.store.fetch_user_document(user_id).await {
            Ok(Some(document)) => devices_from_document(&document),
            Ok(None) => Vec::new(),
            Err(e) => {
                error!("Error fetching devices for user {}: {}", user_id, e);
                Vec::new()
            }
        }
    }
}

/// The `devices` field of a profile document: a list is returned
/// verbatim (string entries only), a map contributes its keys, anything
/// else yields no devices.
fn devices_from_document(document: &Value) -> Vec<String> {
    match document.get("devices") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::Object(map)) => map.keys().cloned().collect(),
        _ => Vec::new(),
    }
}
