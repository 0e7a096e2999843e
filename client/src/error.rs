use thiserror::Error;

use snapwire_shared::{ConfigError, MessageError, TransportError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The server runs a build with a different component list
    #[error("Incompatible server build: local schema fingerprint {local:#018x}, server {remote:#018x}. Update the client and server to the same version")]
    FormatIncompatible { local: u64, remote: u64 },

    #[error("Client is not connected. Call `connect()` and wait for a ConnectEvent before sending")]
    NotConnected,

    #[error("Client is already connecting or connected. Call `disconnect()` first")]
    AlreadyConnected,

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Message(#[from] MessageError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
