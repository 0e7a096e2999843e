use thiserror::Error;

use snapwire_serde::SerdeErr;

use crate::{ChannelMode, MessageKind};

/// Errors raised while decoding a message frame
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// The discriminant is not known to this build. Never fatal.
    #[error("Unknown message kind {0}. The peer may run a newer protocol; the message is ignored")]
    UnknownKind(u16),

    /// The frame is too short to hold a discriminant
    #[error("Message frame of {len} bytes is too short to hold a kind")]
    Truncated { len: usize },

    /// The body of a known kind is malformed
    #[error("Malformed {kind:?} message: {source}")]
    Malformed {
        kind: MessageKind,
        source: SerdeErr,
    },
}

/// Invalid adapter configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Unsupported channel layout {found:?}. Sessions use exactly two channels: 0 reliable-ordered, 1 unreliable-unordered")]
    ChannelLayout { found: Vec<ChannelMode> },

    #[error("Server must allow at least one peer and at most {max}, got {found}")]
    MaxPeers { found: usize, max: usize },

    #[error("Tick interval must be positive and finite, got {0} seconds")]
    TickInterval(String),
}
