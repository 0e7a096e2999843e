use std::time::Duration;

use snapwire_shared::{ConfigError, ConnectionConfig, PrivateKey, DEFAULT_PRIVATE_KEY};

/// Contains Config properties which will be used by a Client
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    /// Channel layout, must match the server's
    pub connection: ConnectionConfig,
    /// Application key presented on connect
    pub private_key: PrivateKey,
    /// How often a Ping is sent once the handshake completes
    pub ping_interval: Duration,
    /// Bound on messages waiting to be flushed. `send` fails past it.
    pub max_outbound_messages: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            private_key: DEFAULT_PRIVATE_KEY,
            ping_interval: Duration::from_secs(1),
            max_outbound_messages: 1024,
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.connection.validate()
    }
}
