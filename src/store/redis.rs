//! Redis-backed implementations of the store seams.
//!
//! Alert records are stored as hashes at their hierarchical key and the
//! notification counter is advanced with `INCR`, so concurrent ingestions
//! never lose an increment. User profile documents are JSON strings under
//! `users:<user_id>`.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{debug, info};

use crate::error::{BridgeError, Result};
use crate::store::{alert_key, AlertRecord, AlertStore, ProfileStore, NOTIFICATION_COUNT_KEY};

/// Key prefix for user profile documents.
const USER_KEY_PREFIX: &str = "users:";

/// Redis client shared by both store seams.
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect to Redis and verify the connection with a PING.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;

        let mut conn = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            ConnectionManager::new(client),
        )
        .await
        .map_err(|_| BridgeError::Timeout("Redis connection timeout after 5 seconds".into()))??;

        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        if pong != "PONG" {
            return Err(BridgeError::Store("Redis connection test failed".into()));
        }

        info!("Connected to Redis at {}", url);
        Ok(Self { conn })
    }

    fn user_key(user_id: &str) -> String {
        format!("{}{}", USER_KEY_PREFIX, user_id)
    }
}

#[async_trait]
impl AlertStore for RedisStore {
    async fn put_alert(&self, record: &AlertRecord) -> Result<()> {
        let mut conn = self.conn.clone();
        let key = alert_key(&record.device_id, &record.timestamp_key);

        let fields: Vec<(String, String)> = vec![
            ("message".to_string(), record.message.clone()),
            ("createdAt".to_string(), record.created_at.clone()),
        ];
        let _: () = conn.hset_multiple(&key, &fields).await?;

        debug!("Stored alert record at {}", key);
        Ok(())
    }

    async fn incr_notification_count(&self) -> Result<u64> {
        let mut conn = self.conn.clone();
        Ok(conn.incr(NOTIFICATION_COUNT_KEY, 1).await?)
    }

    async fn notification_count(&self) -> Result<u64> {
        let mut conn = self.conn.clone();
        let count: Option<u64> = conn.get(NOTIFICATION_COUNT_KEY).await?;
        Ok(count.unwrap_or(0))
    }
}

#[async_trait]
impl ProfileStore for RedisStore {
    async fn fetch_user_document(&self, user_id: &str) -> Result<Option<serde_json::Value>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(Self::user_key(user_id)).await?;

        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}
