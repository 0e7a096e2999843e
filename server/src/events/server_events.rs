use std::vec::IntoIter;

use snapwire_shared::{NetMessage, PeerIndex, Tick};

use crate::ServerError;

pub struct ServerEvents {
    connections: Vec<PeerIndex>,
    disconnections: Vec<PeerIndex>,
    messages: Vec<(PeerIndex, NetMessage)>,
    ticks: Vec<Tick>,
    errors: Vec<ServerError>,
    empty: bool,
}

impl Default for ServerEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerEvents {
    pub(crate) fn new() -> Self {
        Self {
            connections: Vec::new(),
            disconnections: Vec::new(),
            messages: Vec::new(),
            ticks: Vec::new(),
            errors: Vec::new(),
            empty: true,
        }
    }

    // Public

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn read<V: ServerEvent>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: ServerEvent>(&self) -> bool {
        V::has(self)
    }

    // Crate-public

    pub(crate) fn push_connection(&mut self, peer: PeerIndex) {
        self.connections.push(peer);
        self.empty = false;
    }

    pub(crate) fn push_disconnection(&mut self, peer: PeerIndex) {
        self.disconnections.push(peer);
        self.empty = false;
    }

    pub(crate) fn push_message(&mut self, peer: PeerIndex, message: NetMessage) {
        self.messages.push((peer, message));
        self.empty = false;
    }

    pub(crate) fn push_tick(&mut self, tick: Tick) {
        self.ticks.push(tick);
        self.empty = false;
    }

    pub(crate) fn push_error(&mut self, error: ServerError) {
        self.errors.push(error);
        self.empty = false;
    }
}

// Event Trait
pub trait ServerEvent {
    type Iter;

    fn iter(events: &mut ServerEvents) -> Self::Iter;

    fn has(events: &ServerEvents) -> bool;
}

/// A peer took a slot
pub struct ConnectEvent;
impl ServerEvent for ConnectEvent {
    type Iter = IntoIter<PeerIndex>;

    fn iter(events: &mut ServerEvents) -> Self::Iter {
        std::mem::take(&mut events.connections).into_iter()
    }

    fn has(events: &ServerEvents) -> bool {
        !events.connections.is_empty()
    }
}

pub struct DisconnectEvent;
impl ServerEvent for DisconnectEvent {
    type Iter = IntoIter<PeerIndex>;

    fn iter(events: &mut ServerEvents) -> Self::Iter {
        std::mem::take(&mut events.disconnections).into_iter()
    }

    fn has(events: &ServerEvents) -> bool {
        !events.disconnections.is_empty()
    }
}

/// Application message from a verified peer
pub struct MessageEvent;
impl ServerEvent for MessageEvent {
    type Iter = IntoIter<(PeerIndex, NetMessage)>;

    fn iter(events: &mut ServerEvents) -> Self::Iter {
        std::mem::take(&mut events.messages).into_iter()
    }

    fn has(events: &ServerEvents) -> bool {
        !events.messages.is_empty()
    }
}

// Tick Event
pub struct TickEvent;
impl ServerEvent for TickEvent {
    type Iter = IntoIter<Tick>;

    fn iter(events: &mut ServerEvents) -> Self::Iter {
        std::mem::take(&mut events.ticks).into_iter()
    }

    fn has(events: &ServerEvents) -> bool {
        !events.ticks.is_empty()
    }
}

pub struct ErrorEvent;
impl ServerEvent for ErrorEvent {
    type Iter = IntoIter<ServerError>;

    fn iter(events: &mut ServerEvents) -> Self::Iter {
        std::mem::take(&mut events.errors).into_iter()
    }

    fn has(events: &ServerEvents) -> bool {
        !events.errors.is_empty()
    }
}
