//! Error types for the alert bridge service.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Bridge service errors
#[derive(Debug, Error)]
pub enum BridgeError {
    /// MQTT client or connection error
    #[error("MQTT error: {0}")]
    Mqtt(String),

    /// Storage backend error
    #[error("Store error: {0}")]
    Store(String),

    /// Message payload error
    #[error("Payload error: {0}")]
    Payload(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation timeout
    #[error("Operation timeout: {0}")]
    Timeout(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<redis::RedisError> for BridgeError {
    fn from(err: redis::RedisError) -> Self {
        BridgeError::Store(err.to_string())
    }
}

impl From<rumqttc::ClientError> for BridgeError {
    fn from(err: rumqttc::ClientError) -> Self {
        BridgeError::Mqtt(err.to_string())
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for BridgeError {
    fn from(err: serde_yaml::Error) -> Self {
        BridgeError::Config(err.to_string())
    }
}
