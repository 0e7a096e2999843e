use std::{default::Default, time::Duration};

use snapwire_shared::{ConfigError, ConnectionConfig, PrivateKey, DEFAULT_PRIVATE_KEY};

/// Largest `max_peers` a server accepts
pub const MAX_PEERS: usize = 256;

/// Contains Config properties which will be used by the Server
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// Channel layout, must match every client's
    pub connection: ConnectionConfig,
    /// Application key clients must present
    pub private_key: PrivateKey,
    /// Number of peer slots
    pub max_peers: usize,
    /// Length of one simulation tick
    pub tick_interval: Duration,
    /// Payload bytes per `WorldChunk` when streaming an archive
    pub world_chunk_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            private_key: DEFAULT_PRIVATE_KEY,
            max_peers: 32,
            tick_interval: Duration::from_secs_f64(1.0 / 60.0),
            world_chunk_size: snapwire_shared::DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.connection.validate()?;
        if self.max_peers == 0 || self.max_peers > MAX_PEERS {
            return Err(ConfigError::MaxPeers {
                found: self.max_peers,
                max: MAX_PEERS,
            });
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::TickInterval(format!(
                "{}",
                self.tick_interval.as_secs_f64()
            )));
        }
        Ok(())
    }
}
