use thiserror::Error;

use crate::{Channel, PeerIndex};

/// Why a connect attempt was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefusalReason {
    InvalidKey,
    PeerSlotsExhausted,
    ServerNotRunning,
    TimedOut,
    WrongAddress,
}

/// Errors raised by a transport or by an adapter talking to one
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The server refused or never answered the connect request
    #[error("Connection refused: {reason:?}")]
    ConnectRefused { reason: RefusalReason },

    /// A send was attempted on a link that is not connected
    #[error("Cannot send on {channel:?}: the link is not connected")]
    NotConnected { channel: Channel },

    /// The peer slot is empty
    #[error("Cannot send to {peer}: no such connected peer")]
    PeerNotConnected { peer: PeerIndex },

    /// The adapter's bounded outbound queue is full
    #[error("Outbound queue is full ({capacity} messages waiting). Slow down sends or raise `max_outbound_messages`")]
    SendQueueFull { capacity: usize },

    /// The server transport was started twice
    #[error("Server transport is already running")]
    AlreadyRunning,

    /// The connect call was issued while a session was already in progress
    #[error("A connection is already in progress or established")]
    AlreadyConnected,
}
