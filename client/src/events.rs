use std::vec::IntoIter;

use snapwire_shared::{NetMessage, PeerIndex};

use crate::ClientError;

pub struct ClientEvents {
    connections: u32,
    disconnections: u32,
    welcomes: Vec<PeerIndex>,
    messages: Vec<NetMessage>,
    errors: Vec<ClientError>,
    empty: bool,
}

impl Default for ClientEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientEvents {
    pub(crate) fn new() -> Self {
        Self {
            connections: 0,
            disconnections: 0,
            welcomes: Vec::new(),
            messages: Vec::new(),
            errors: Vec::new(),
            empty: true,
        }
    }

    // Public

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn read<V: ClientEvent>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: ClientEvent>(&self) -> bool {
        V::has(self)
    }

    // Crate-public

    pub(crate) fn push_connection(&mut self) {
        self.connections += 1;
        self.empty = false;
    }

    pub(crate) fn push_disconnection(&mut self) {
        self.disconnections += 1;
        self.empty = false;
    }

    pub(crate) fn push_welcome(&mut self, peer: PeerIndex) {
        self.welcomes.push(peer);
        self.empty = false;
    }

    pub(crate) fn push_message(&mut self, message: NetMessage) {
        self.messages.push(message);
        self.empty = false;
    }

    pub(crate) fn push_error(&mut self, error: ClientError) {
        self.errors.push(error);
        self.empty = false;
    }
}

// Event Trait
pub trait ClientEvent {
    type Iter;

    fn iter(events: &mut ClientEvents) -> Self::Iter;

    fn has(events: &ClientEvents) -> bool;
}

/// The transport accepted the connection
pub struct ConnectEvent;
impl ClientEvent for ConnectEvent {
    type Iter = IntoIter<()>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        let count = std::mem::take(&mut events.connections);
        vec![(); count as usize].into_iter()
    }

    fn has(events: &ClientEvents) -> bool {
        events.connections > 0
    }
}

pub struct DisconnectEvent;
impl ClientEvent for DisconnectEvent {
    type Iter = IntoIter<()>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        let count = std::mem::take(&mut events.disconnections);
        vec![(); count as usize].into_iter()
    }

    fn has(events: &ClientEvents) -> bool {
        events.disconnections > 0
    }
}

/// The server verified the schema and assigned this peer index
pub struct WelcomeEvent;
impl ClientEvent for WelcomeEvent {
    type Iter = IntoIter<PeerIndex>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        std::mem::take(&mut events.welcomes).into_iter()
    }

    fn has(events: &ClientEvents) -> bool {
        !events.welcomes.is_empty()
    }
}

pub struct MessageEvent;
impl ClientEvent for MessageEvent {
    type Iter = IntoIter<NetMessage>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        std::mem::take(&mut events.messages).into_iter()
    }

    fn has(events: &ClientEvents) -> bool {
        !events.messages.is_empty()
    }
}

pub struct ErrorEvent;
impl ClientEvent for ErrorEvent {
    type Iter = IntoIter<ClientError>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        std::mem::take(&mut events.errors).into_iter()
    }

    fn has(events: &ClientEvents) -> bool {
        !events.errors.is_empty()
    }
}
