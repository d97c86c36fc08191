//! Alert Bridge Service (AlertSrv)
//!
//! Connects the MQTT broker to durable storage and serves the device
//! lookup API.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use alertsrv::api::create_router;
use alertsrv::config::BridgeConfig;
use alertsrv::directory::DeviceDirectory;
use alertsrv::ingest::AlertIngestor;
use alertsrv::mqtt::{self, MqttClient};
use alertsrv::store::RedisStore;
use alertsrv::subscription::SubscriptionRegistry;
use alertsrv::AppState;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[clap(short, long, value_parser, default_value = "config/alertsrv.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting alert bridge service...");

    let args = Args::parse();
    let config = BridgeConfig::load(&args.config)?;

    let store = Arc::new(RedisStore::connect(&config.redis.url).await?);

    // The event loop task owns the broker connection for the process
    // lifetime; it is not restarted if the connection drops.
    let (mqtt_client, eventloop) = MqttClient::new(&config.mqtt);
    let ingestor = AlertIngestor::new(store.clone());
    tokio::spawn(mqtt::run_receive_loop(eventloop, ingestor));

    let registry = Arc::new(SubscriptionRegistry::new(
        Arc::new(mqtt_client),
        config.mqtt.topic_prefix.clone(),
        config.mqtt.qos,
    ));
    let directory = Arc::new(DeviceDirectory::new(store));

    let addr: SocketAddr = format!("{}:{}", config.service.host, config.service.port).parse()?;
    let state = AppState {
        config: Arc::new(config),
        registry,
        directory,
    };
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Alert bridge service started on {}", addr);
    info!("API endpoints:");
    info!("  GET / - Service status");
    info!("  GET /user/{{user_id}} - Resolve devices and subscribe to their alert topics");

    axum::serve(listener, app).await?;
    Ok(())
}
