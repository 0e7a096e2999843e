//! Non-blocking polling seam between the adapters and whatever moves bytes.
//!
//! Nothing here waits on I/O: an empty queue is reported as `None`. Peer
//! lifecycle changes are only ever returned from
//! [`ServerTransport::receive_packets`], so they are observed inside the
//! adapter's own update.

use std::net::SocketAddr;

use crate::{Channel, PeerIndex, SessionId};

pub mod error;
pub mod link_conditioner;
pub mod local_hub;
pub mod message_pool;

pub use error::{RefusalReason, TransportError};

/// Shared application key presented on connect
pub type PrivateKey = [u8; 32];

pub const DEFAULT_PRIVATE_KEY: PrivateKey = [0; 32];

/// Client-side view of the link
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkStatus {
    Disconnected,
    Connecting,
    Connected,
    Refused(RefusalReason),
}

/// Server-side lifecycle change
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeerEvent {
    Connected(PeerIndex),
    Disconnected(PeerIndex),
}

pub trait ClientTransport {
    /// Issues a connect request. Acceptance is reported later through
    /// [`ClientTransport::status`].
    fn insecure_connect(
        &mut self,
        private_key: &PrivateKey,
        session_id: SessionId,
        server_addr: SocketAddr,
    ) -> Result<(), TransportError>;

    fn disconnect(&mut self);

    fn status(&self) -> LinkStatus;

    fn advance_time(&mut self, time: f64);

    /// Pulls everything that arrived since the last call into the inbox
    fn receive_packets(&mut self);

    /// Flushes messages queued with `send_message`
    fn send_packets(&mut self);

    fn receive_message(&mut self, channel: Channel) -> Option<Vec<u8>>;

    fn send_message(&mut self, channel: Channel, payload: Vec<u8>) -> Result<(), TransportError>;

    /// A cleared buffer from the transport's pool
    fn allocate_buffer(&mut self) -> Vec<u8>;

    /// Returns a received payload to the pool once it has been handled
    fn release_message(&mut self, payload: Vec<u8>);
}

pub trait ServerTransport {
    fn start(&mut self, max_peers: usize) -> Result<(), TransportError>;

    fn stop(&mut self);

    fn is_running(&self) -> bool;

    fn advance_time(&mut self, time: f64);

    /// Pulls inbound traffic and returns peers that connected or dropped.
    /// Peers removed with [`ServerTransport::disconnect_peer`] are not
    /// reported again.
    fn receive_packets(&mut self) -> Vec<PeerEvent>;

    fn send_packets(&mut self);

    fn is_peer_connected(&self, peer: PeerIndex) -> bool;

    fn receive_message(&mut self, peer: PeerIndex, channel: Channel) -> Option<Vec<u8>>;

    fn send_message(
        &mut self,
        peer: PeerIndex,
        channel: Channel,
        payload: Vec<u8>,
    ) -> Result<(), TransportError>;

    fn allocate_buffer(&mut self) -> Vec<u8>;

    fn release_message(&mut self, payload: Vec<u8>);

    /// Flushes anything queued for `peer`, then closes it and drops its
    /// undelivered inbound messages.
    fn disconnect_peer(&mut self, peer: PeerIndex);
}
