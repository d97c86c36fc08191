//! Common test utilities and helpers

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rumqttc::QoS;

use alertsrv::{
    api::routes,
    config::BridgeConfig,
    directory::DeviceDirectory,
    error::Result,
    mqtt::Subscriber,
    store::MemoryStore,
    subscription::SubscriptionRegistry,
    AppState,
};

/// Subscriber fake that records every topic it is asked to subscribe to.
#[derive(Default)]
pub struct RecordingSubscriber {
    topics: Mutex<Vec<String>>,
}

impl RecordingSubscriber {
    pub fn subscribed_topics(&self) -> Vec<String> {
        self.topics.lock().unwrap().clone()
    }
}

#[async_trait]
impl Subscriber for RecordingSubscriber {
    async fn subscribe(&self, topic: &str, _qos: QoS) -> Result<()> {
        self.topics.lock().unwrap().push(topic.to_string());
        Ok(())
    }
}

/// Everything a router test needs to seed data and observe side effects.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub subscriber: Arc<RecordingSubscriber>,
    pub app: axum::Router,
}

/// Create a test router backed by in-memory stores and a recording
/// subscriber, so no broker or Redis is required.
pub fn create_test_router() -> TestContext {
    let config = Arc::new(BridgeConfig::default());
    let store = Arc::new(MemoryStore::new());
    let subscriber = Arc::new(RecordingSubscriber::default());

    let registry = Arc::new(SubscriptionRegistry::new(
        subscriber.clone(),
        config.mqtt.topic_prefix.clone(),
        config.mqtt.qos,
    ));
    let directory = Arc::new(DeviceDirectory::new(store.clone()));

    let state = AppState {
        config,
        registry,
        directory,
    };

    TestContext {
        store,
        subscriber,
        app: routes::create_router(state),
    }
}
