//! Alert ingestion pipeline.
//!
//! One inbound broker message becomes one durable [`AlertRecord`] plus a
//! notification-counter increment. The whole pipeline sits behind a
//! single error boundary: whatever goes wrong for one message is logged
//! and dropped, and the receive loop moves on to the next.

use std::sync::Arc;

use chrono::{DateTime, Local};
use serde_json::Value;
use tracing::{error, info};

use crate::error::{BridgeError, Result};
use crate::store::{AlertRecord, AlertStore};

/// Device id substituted when a topic has no second path segment.
pub const UNKNOWN_DEVICE: &str = "unknown_device";

/// Turns inbound broker messages into durable alert records.
#[derive(Clone)]
pub struct AlertIngestor {
    store: Arc<dyn AlertStore>,
}

impl AlertIngestor {
    pub fn new(store: Arc<dyn AlertStore>) -> Self {
        Self { store }
    }

    /// Message callback invoked once per inbound publish.
    ///
    /// Never returns an error: failures are logged here and the message
    /// is dropped, keeping the receive loop alive.
    pub async fn handle_message(&self, topic: &str, payload: &[u8]) {
        match self.ingest(topic, payload).await {
            Ok(record) => {
                info!(
                    "Alert saved for {} at {}",
                    record.device_id, record.timestamp_key
                );
            }
            Err(e) => {
                error!("Error processing message on {}: {}", topic, e);
            }
        }
    }

    async fn ingest(&self, topic: &str, payload: &[u8]) -> Result<AlertRecord> {
        let text = std::str::from_utf8(payload)
            .map_err(|e| BridgeError::Payload(format!("payload is not valid UTF-8: {}", e)))?;
        let data = parse_payload(text);

        // Single captured instant: the storage key and the stored
        // timestamp must never disagree.
        let now = Local::now();
        let record = AlertRecord {
            device_id: device_id_from_topic(topic),
            timestamp_key: timestamp_key(&now),
            message: extract_message(&data),
            created_at: now.to_rfc3339(),
        };

        self.store.put_alert(&record).await?;
        self.store.incr_notification_count().await?;

        Ok(record)
    }
}

/// Best-effort structured parse: a JSON object is taken as-is, anything
/// else (invalid JSON, or valid JSON that is not an object) is wrapped
/// so the raw text survives verbatim in the `message` field.
fn parse_payload(text: &str) -> Value {
    match serde_json::from_str::<Value>(text) {
        Ok(value) if value.is_object() => value,
        _ => serde_json::json!({ "message": text }),
    }
}

/// The `message` field of the parsed payload, or `""` when absent.
/// Non-string values keep their JSON rendering.
fn extract_message(data: &Value) -> String {
    match data.get("message") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Second path segment of the topic, or the sentinel for topics too
/// short to carry a device id.
pub fn device_id_from_topic(topic: &str) -> String {
    topic
        .split('/')
        .nth(1)
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_DEVICE.to_string())
}

/// Second-granularity storage key derived from the ingestion instant.
pub fn timestamp_key(instant: &DateTime<Local>) -> String {
    instant.format("%Y%m%d_%H%M%S").to_string()
}
