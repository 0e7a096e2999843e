//! # Snapwire Client
//! Client side of a snapwire session: connects through a
//! [`ClientTransport`](snapwire_shared::ClientTransport), proves its schema
//! fingerprint to the server, and surfaces inbound messages as typed events.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use snapwire_shared::{
        Channel, ComponentKinds, ConnectionConfig, LinkStatus, LocalClientTransport, LocalHub,
        NetMessage, PeerIndex, SessionId,
    };
}

mod client;
mod client_config;
mod connection;
mod error;
mod events;

pub use client::Client;
pub use client_config::ClientConfig;
pub use connection::{client_state::ClientState, ping_stats::PingStats};
pub use error::ClientError;
pub use events::{
    ClientEvent, ClientEvents, ConnectEvent, DisconnectEvent, ErrorEvent, MessageEvent,
    WelcomeEvent,
};
