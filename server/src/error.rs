use thiserror::Error;

use snapwire_shared::{
    ConfigError, MessageError, PeerIndex, RoleError, TransferError, TransportError,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServerError {
    /// A peer runs a build with a different component list. The peer is
    /// sent a `Reject` and disconnected.
    #[error("{peer} runs an incompatible build: server schema fingerprint {local:#018x}, peer {remote:#018x}. Update the client and server to the same version")]
    FormatIncompatible {
        peer: PeerIndex,
        local: u64,
        remote: u64,
    },

    /// A frame from a peer could not be decoded
    #[error("Bad message from {peer}: {source}")]
    Message {
        peer: PeerIndex,
        source: MessageError,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Role(#[from] RoleError),

    #[error(transparent)]
    Transfer(#[from] TransferError),
}
