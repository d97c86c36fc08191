//! Per-user device subscription registry.
//!
//! Tracks which device topics each user is subscribed to and issues the
//! subscribe commands on the broker connection. The set recorded for a
//! user is replaced wholesale on every call; there is no diffing against
//! the previous set and no unsubscribe path.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::error;

use crate::mqtt::{qos_from_u8, Subscriber};

/// Registry of active per-user device subscriptions.
pub struct SubscriptionRegistry {
    subscriber: Arc<dyn Subscriber>,
    topic_prefix: String,
    qos: rumqttc::QoS,
    user_devices: RwLock<HashMap<String, Vec<String>>>,
}

impl SubscriptionRegistry {
    pub fn new(subscriber: Arc<dyn Subscriber>, topic_prefix: impl Into<String>, qos: u8) -> Self {
        Self {
            subscriber,
            topic_prefix: topic_prefix.into(),
            qos: qos_from_u8(qos),
            user_devices: RwLock::new(HashMap::new()),
        }
    }

    /// Fully-qualified alert topic for a device.
    pub fn alert_topic(&self, device_id: &str) -> String {
        format!("{}/{}/alert", self.topic_prefix, device_id)
    }

    /// Subscribe to every device in the list and record the set under
    /// the user, replacing any prior set.
    ///
    /// Repeated calls for the same user re-issue all subscribe commands;
    /// the broker tolerates duplicate subscriptions at QoS 0. A failed
    /// subscribe is logged and does not abort the remaining devices.
    pub async fn ensure_subscribed(&self, user_id: &str, device_ids: &[String]) {
        for device_id in device_ids {
            let topic = self.alert_topic(device_id);
            if let Err(e) = self.subscriber.subscribe(&topic, self.qos).await {
                error!("Failed to subscribe to {}: {}", topic, e);
            }
        }

        self.user_devices
            .write()
            .await
            .insert(user_id.to_string(), device_ids.to_vec());
    }

    /// Devices currently recorded for a user.
    pub async fn subscribed_devices(&self, user_id: &str) -> Option<Vec<String>> {
        self.user_devices.read().await.get(user_id).cloned()
    }
}
