//! In-memory store used by the test suite.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::Result;
use crate::store::{alert_key, AlertRecord, AlertStore, ProfileStore};

/// In-memory implementation of both store seams.
#[derive(Default)]
pub struct MemoryStore {
    alerts: Mutex<HashMap<String, AlertRecord>>,
    notification_count: AtomicU64,
    users: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user profile document.
    pub fn insert_user_document(&self, user_id: &str, document: serde_json::Value) {
        self.users
            .lock()
            .unwrap()
            .insert(user_id.to_string(), document);
    }

    /// Fetch a stored alert record by device id and timestamp key.
    pub fn alert(&self, device_id: &str, timestamp_key: &str) -> Option<AlertRecord> {
        self.alerts
            .lock()
            .unwrap()
            .get(&alert_key(device_id, timestamp_key))
            .cloned()
    }

    /// Number of stored alert records.
    pub fn alert_count(&self) -> usize {
        self.alerts.lock().unwrap().len()
    }

    /// All stored records for a device, in key order.
    pub fn device_alerts(&self, device_id: &str) -> Vec<AlertRecord> {
        let prefix = alert_key(device_id, "");
        let alerts = self.alerts.lock().unwrap();
        let mut keys: Vec<&String> = alerts.keys().filter(|k| k.starts_with(&prefix)).collect();
        keys.sort();
        keys.iter().map(|k| alerts[*k].clone()).collect()
    }
}

#[async_trait]
impl AlertStore for MemoryStore {
    async fn put_alert(&self, record: &AlertRecord) -> Result<()> {
        let key = alert_key(&record.device_id, &record.timestamp_key);
        self.alerts.lock().unwrap().insert(key, record.clone());
        Ok(())
    }

    async fn incr_notification_count(&self) -> Result<u64> {
        Ok(self.notification_count.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn notification_count(&self) -> Result<u64> {
        Ok(self.notification_count.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn fetch_user_document(&self, user_id: &str) -> Result<Option<serde_json::Value>> {
        Ok(self.users.lock().unwrap().get(user_id).cloned())
    }
}
