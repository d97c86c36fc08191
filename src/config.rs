//! Service configuration.
//!
//! Layered the usual way: compiled-in defaults, then an optional YAML
//! file, then explicit environment overrides (highest priority).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Fallback config file locations, probed in order.
const CONFIG_PATHS: [&str; 2] = ["config/alertsrv.yaml", "alertsrv.yaml"];

/// Bridge service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// HTTP service configuration
    #[serde(default)]
    pub service: ServiceConfig,
    /// MQTT broker configuration
    #[serde(default)]
    pub mqtt: MqttConfig,
    /// Redis configuration
    #[serde(default)]
    pub redis: RedisConfig,
}

/// HTTP service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    #[serde(default = "default_service_name")]
    pub name: String,
    /// Listen address
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// MQTT broker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MqttConfig {
    /// Broker address
    #[serde(default = "default_broker_host")]
    pub broker_host: String,
    /// Broker port
    #[serde(default = "default_broker_port")]
    pub port: u16,
    /// Client id stem (a random suffix is appended per process)
    #[serde(default = "default_client_id")]
    pub client_id: String,
    /// Broker username
    pub username: Option<String>,
    /// Broker password
    pub password: Option<String>,
    /// First segment of every device alert topic
    #[serde(default = "default_topic_prefix")]
    pub topic_prefix: String,
    /// Subscription QoS level
    #[serde(default)]
    pub qos: u8,
    /// Keep-alive interval in seconds
    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,
}

/// Redis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub url: String,
}

fn default_service_name() -> String {
    "alertsrv".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_broker_host() -> String {
    "broker.hivemq.com".to_string()
}

fn default_broker_port() -> u16 {
    1883
}

fn default_client_id() -> String {
    "alertsrv".to_string()
}

fn default_topic_prefix() -> String {
    "pets_live".to_string()
}

fn default_keep_alive_secs() -> u64 {
    60
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: default_broker_host(),
            port: default_broker_port(),
            client_id: default_client_id(),
            username: None,
            password: None,
            topic_prefix: default_topic_prefix(),
            qos: 0,
            keep_alive_secs: default_keep_alive_secs(),
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
        }
    }
}

impl BridgeConfig {
    /// Load configuration from the given file, falling back to the
    /// standard locations and then to defaults when no file exists.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = match Self::probe_config_file(path) {
            Some(found) => serde_yaml::from_str(&std::fs::read_to_string(found)?)?,
            None => Self::default(),
        };

        // Environment overrides win over the file
        if let Ok(url) = std::env::var("ALERTSRV_REDIS_URL") {
            config.redis.url = url;
        }
        if let Ok(host) = std::env::var("ALERTSRV_MQTT_HOST") {
            config.mqtt.broker_host = host;
        }
        if let Ok(port) = std::env::var("ALERTSRV_MQTT_PORT") {
            if let Ok(port) = port.parse() {
                config.mqtt.port = port;
            }
        }
        if let Ok(username) = std::env::var("ALERTSRV_MQTT_USERNAME") {
            config.mqtt.username = Some(username);
        }
        if let Ok(password) = std::env::var("ALERTSRV_MQTT_PASSWORD") {
            config.mqtt.password = Some(password);
        }
        if let Ok(prefix) = std::env::var("ALERTSRV_TOPIC_PREFIX") {
            config.mqtt.topic_prefix = prefix;
        }
        if let Ok(port) = std::env::var("ALERTSRV_PORT") {
            if let Ok(port) = port.parse() {
                config.service.port = port;
            }
        }

        Ok(config)
    }

    fn probe_config_file(path: &Path) -> Option<std::path::PathBuf> {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        CONFIG_PATHS
            .iter()
            .map(Path::new)
            .find(|p| p.exists())
            .map(Path::to_path_buf)
    }

    /// Render the default configuration as YAML.
    pub fn generate_default_config() -> String {
        serde_yaml::to_string(&Self::default())
            .unwrap_or_else(|_| "# Failed to generate config file".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert_eq!(config.service.name, "alertsrv");
        assert_eq!(config.service.port, 5000);
        assert_eq!(config.mqtt.broker_host, "broker.hivemq.com");
        assert_eq!(config.mqtt.port, 1883);
        assert_eq!(config.mqtt.topic_prefix, "pets_live");
        assert_eq!(config.mqtt.qos, 0);
        assert!(config.mqtt.username.is_none());
        assert!(config.redis.url.contains("redis://"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "mqtt:\n  broker_host: mqtt.example.com\n  topic_prefix: barn_live"
        )
        .unwrap();

        let config = BridgeConfig::load(file.path()).unwrap();
        assert_eq!(config.mqtt.broker_host, "mqtt.example.com");
        assert_eq!(config.mqtt.topic_prefix, "barn_live");
        // Untouched sections keep their defaults
        assert_eq!(config.mqtt.port, 1883);
        assert_eq!(config.service.port, 5000);
    }

    #[test]
    fn test_env_override_wins() {
        std::env::set_var("ALERTSRV_MQTT_USERNAME", "bridge-user");

        let config = BridgeConfig::load(Path::new("does-not-exist.yaml")).unwrap();
        assert_eq!(config.mqtt.username.as_deref(), Some("bridge-user"));

        std::env::remove_var("ALERTSRV_MQTT_USERNAME");
    }

    #[test]
    fn test_generate_default_config() {
        let yaml = BridgeConfig::generate_default_config();
        assert!(yaml.contains("mqtt"));
        assert!(yaml.contains("redis"));
        assert!(yaml.contains("service"));
    }
}
