//! Storage seams for the two external stores.
//!
//! Alert records and the notification counter live in a hierarchical
//! key-value store; user profile documents live in a document store.
//! Both are abstracted behind traits so the service logic and the test
//! suite are independent of the backing database.

mod memory;
mod redis;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Key of the global notification counter.
pub const NOTIFICATION_COUNT_KEY: &str = "alert/notificationCount";

/// Build the storage key for an alert record.
pub fn alert_key(device_id: &str, timestamp_key: &str) -> String {
    format!("alert/{}/{}", device_id, timestamp_key)
}

/// One ingested device alert.
///
/// Immutable once written. `timestamp_key` and `created_at` are both
/// derived from the single instant captured at ingestion, so the storage
/// key and the stored timestamp always agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    /// Device identifier extracted from the message topic
    pub device_id: String,
    /// Second-granularity storage key (`YYYYMMDD_HHMMSS`, local time)
    pub timestamp_key: String,
    /// Alert message text
    pub message: String,
    /// RFC 3339 ingestion timestamp
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Hierarchical key-value store holding alert records and the
/// notification counter.
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Write an alert record at `alert/<device_id>/<timestamp_key>`.
    ///
    /// A record already present at that key is overwritten.
    async fn put_alert(&self, record: &AlertRecord) -> Result<()>;

    /// Atomically increment the notification counter and return the new
    /// value. A missing counter counts as 0.
    async fn incr_notification_count(&self) -> Result<u64>;

    /// Current notification counter value (0 when absent).
    async fn notification_count(&self) -> Result<u64>;
}

/// Document store holding user profile documents keyed by user id.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the raw profile document for a user, or `None` when the
    /// user has no document.
    async fn fetch_user_document(&self, user_id: &str) -> Result<Option<serde_json::Value>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_key_layout() {
        assert_eq!(
            alert_key("collar-7", "20260806_120000"),
            "alert/collar-7/20260806_120000"
        );
    }

    #[test]
    fn test_counter_key_shares_alert_namespace() {
        assert_eq!(NOTIFICATION_COUNT_KEY, "alert/notificationCount");
    }

    #[test]
    fn test_record_serializes_created_at_field_name() {
        let record = AlertRecord {
            device_id: "d1".to_string(),
            timestamp_key: "20260806_120000".to_string(),
            message: "low battery".to_string(),
            created_at: "2026-08-06T12:00:00+00:00".to_string(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["createdAt"], "2026-08-06T12:00:00+00:00");
        assert_eq!(value["message"], "low battery");
    }
}
