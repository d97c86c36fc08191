//! MQTT broker connection manager.
//!
//! Owns the single long-lived connection to the broker. Subscribe
//! commands are issued through the [`Subscriber`] seam; inbound publishes
//! are dispatched to the ingestion pipeline by [`run_receive_loop`],
//! which runs on its own task so message handling never blocks HTTP
//! serving.

use std::time::Duration;

use async_trait::async_trait;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::config::MqttConfig;
use crate::error::Result;
use crate::ingest::AlertIngestor;

/// Topic subscription seam between the registry and the broker client.
#[async_trait]
pub trait Subscriber: Send + Sync {
    async fn subscribe(&self, topic: &str, qos: QoS) -> Result<()>;
}

/// Map a numeric QoS level onto the protocol enum.
pub fn qos_from_u8(qos: u8) -> QoS {
    match qos {
        0 => QoS::AtMostOnce,
        1 => QoS::AtLeastOnce,
        2 => QoS::ExactlyOnce,
        _ => QoS::AtMostOnce,
    }
}

/// Handle for issuing commands on the broker connection.
#[derive(Clone)]
pub struct MqttClient {
    client: AsyncClient,
}

impl MqttClient {
    /// Build the broker connection from configuration.
    ///
    /// Returns the command handle together with the event loop that must
    /// be driven by [`run_receive_loop`] for the connection to make
    /// progress.
    pub fn new(config: &MqttConfig) -> (Self, EventLoop) {
        // Random suffix keeps restarted instances from kicking each
        // other off the broker.
        let client_id = format!("{}-{}", config.client_id, Uuid::new_v4());
        let mut options = MqttOptions::new(client_id, &config.broker_host, config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            options.set_credentials(username, password);
        }

        options.set_keep_alive(Duration::from_secs(config.keep_alive_secs));
        options.set_clean_session(true);

        let (client, eventloop) = AsyncClient::new(options, 10);
        (Self { client }, eventloop)
    }
}

#[async_trait]
impl Subscriber for MqttClient {
    async fn subscribe(&self, topic: &str, qos: QoS) -> Result<()> {
        self.client.subscribe(topic, qos).await?;
        info!("Subscribed to {}", topic);
        Ok(())
    }
}

/// Drive the broker event loop for the process lifetime.
///
/// Every inbound publish is handed to the ingestion pipeline, which
/// contains its own error boundary, so a bad message never terminates
/// the loop. A connection-level poll error ends the loop; there is no
/// automatic retry, the process must be restarted.
pub async fn run_receive_loop(mut eventloop: EventLoop, ingestor: AlertIngestor) {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                info!("Connected to MQTT broker (code: {:?})", ack.code);
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                ingestor.handle_message(&publish.topic, &publish.payload).await;
            }
            Ok(event) => {
                debug!("MQTT event: {:?}", event);
            }
            Err(e) => {
                error!("MQTT connection error: {:?}", e);
                break;
            }
        }
    }
}
