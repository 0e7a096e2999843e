//! # Snapwire Server
//! Authoritative side of a snapwire session: accepts peers through a
//! [`ServerTransport`](snapwire_shared::ServerTransport), checks their schema
//! fingerprint, advances simulation time on a fixed tick and broadcasts
//! entity snapshots.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use snapwire_shared::{
        Channel, ComponentKinds, ConnectionConfig, LocalHub, LocalServerTransport, NetMessage,
        PeerIndex, SimClock, Tick,
    };
}

mod error;
mod events;
mod peer;
mod server;

pub use error::ServerError;
pub use events::{
    ConnectEvent, DisconnectEvent, ErrorEvent, MessageEvent, ServerEvent, ServerEvents, TickEvent,
};
pub use peer::{Peer, PeerHandler};
pub use server::{Server, ServerConfig, MAX_PEERS};
