use std::{
    collections::{HashSet, VecDeque},
    net::SocketAddr,
    sync::Arc,
};

use log::{debug, info, warn};

use snapwire_shared::{
    ByteWriter, Channel, ClientTransport, ComponentKinds, LinkStatus, MessageError, NetMessage,
    PeerIndex, RoleContext, SessionId, TransportError,
};

use crate::{
    connection::{client_state::ClientState, ping_stats::PingStats},
    events::ClientEvents,
    ClientConfig, ClientError,
};

/// Client side of a session. Drives a [`ClientTransport`] once per frame,
/// performs the schema handshake, and turns inbound frames into events.
pub struct Client<T: ClientTransport> {
    // Config
    config: ClientConfig,
    kinds: Arc<ComponentKinds>,
    context: RoleContext,
    // Connection
    transport: T,
    state: ClientState,
    session_id: SessionId,
    peer_index: Option<PeerIndex>,
    verified: bool,
    time: f64,
    last_ping: Option<f64>,
    ping_stats: PingStats,
    outbound: VecDeque<NetMessage>,
    // Diagnostics
    unknown_kinds: HashSet<u16>,
    unknown_messages: u64,
    // Events
    incoming_events: ClientEvents,
}

impl<T: ClientTransport> Client<T> {
    /// Create a new Client
    pub fn new(
        config: ClientConfig,
        kinds: Arc<ComponentKinds>,
        transport: T,
    ) -> Result<Self, ClientError> {
        config.validate()?;

        Ok(Self {
            config,
            kinds,
            context: RoleContext::client_main(),
            transport,
            state: ClientState::Disconnected,
            session_id: 0,
            peer_index: None,
            verified: false,
            time: 0.0,
            last_ping: None,
            ping_stats: PingStats::default(),
            outbound: VecDeque::new(),
            unknown_kinds: HashSet::new(),
            unknown_messages: 0,
            incoming_events: ClientEvents::new(),
        })
    }

    /// Issues a connect request. Success is reported later by a
    /// `ConnectEvent`, and a `WelcomeEvent` once the server accepted the
    /// schema.
    pub fn connect(&mut self, server_addr: SocketAddr) -> Result<(), ClientError> {
        if self.state != ClientState::Disconnected {
            return Err(ClientError::AlreadyConnected);
        }
        let session_id = fastrand::u64(..);
        self.transport
            .insecure_connect(&self.config.private_key, session_id, server_addr)?;

        info!("Connecting to {} (session {:#x})", server_addr, session_id);
        self.session_id = session_id;
        self.state = ClientState::Connecting;
        Ok(())
    }

    /// Hangs up. Emits a `DisconnectEvent` if a session was in progress.
    pub fn disconnect(&mut self) {
        if self.state == ClientState::Disconnected {
            return;
        }
        info!("Disconnecting (session {:#x})", self.session_id);
        self.enter_disconnected(None);
    }

    /// Must be called once per frame with the elapsed seconds.
    pub fn update(&mut self, delta: f64) {
        if delta.is_finite() && delta > 0.0 {
            self.time += delta;
        }
        self.transport.advance_time(self.time);

        if self.state == ClientState::Disconnected {
            return;
        }

        self.transport.receive_packets();
        let link = self.transport.status();

        if self.state == ClientState::Connecting && link == LinkStatus::Connected {
            self.on_link_connected();
        }

        // drain before reacting to a dropped link, so a final Reject is seen
        if self.state == ClientState::Connected {
            self.process_inbound();
        }

        match self.transport.status() {
            LinkStatus::Refused(reason) if self.state != ClientState::Disconnected => {
                warn!("Connect request refused: {:?}", reason);
                self.enter_disconnected(Some(TransportError::ConnectRefused { reason }.into()));
            }
            LinkStatus::Disconnected if self.state != ClientState::Disconnected => {
                info!("Connection to server lost");
                self.enter_disconnected(None);
            }
            _ => {}
        }

        if self.state == ClientState::Connected {
            self.maybe_ping();
        }
        if self.state == ClientState::Connected {
            self.flush_outbound();
        }
        if self.state == ClientState::Connected {
            self.transport.send_packets();
        }
    }

    /// Returns every event collected since the last call
    pub fn receive(&mut self) -> ClientEvents {
        std::mem::take(&mut self.incoming_events)
    }

    /// Queues a message for the next flush. User messages wait for the
    /// handshake to complete before they are sent.
    pub fn send(&mut self, message: NetMessage) -> Result<(), ClientError> {
        if self.state != ClientState::Connected {
            return Err(ClientError::NotConnected);
        }
        let capacity = self.config.max_outbound_messages;
        if self.outbound.len() >= capacity {
            return Err(TransportError::SendQueueFull { capacity }.into());
        }
        self.outbound.push_back(message);
        Ok(())
    }

    // Getters

    pub fn is_connected(&self) -> bool {
        self.state == ClientState::Connected
    }

    pub fn is_connecting(&self) -> bool {
        self.state == ClientState::Connecting
    }

    pub fn is_disconnected(&self) -> bool {
        self.state == ClientState::Disconnected
    }

    /// True once the server accepted this build's schema
    pub fn is_verified(&self) -> bool {
        self.verified
    }

    pub fn state(&self) -> ClientState {
        self.state
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Index the server assigned in its `Welcome`
    pub fn peer_index(&self) -> Option<PeerIndex> {
        self.peer_index
    }

    pub fn ping_stats(&self) -> PingStats {
        self.ping_stats
    }

    pub fn component_kinds(&self) -> &ComponentKinds {
        &self.kinds
    }

    pub fn role_context(&self) -> &RoleContext {
        &self.context
    }

    pub fn outbound_len(&self) -> usize {
        self.outbound.len()
    }

    /// Frames received with a discriminant this build does not know
    pub fn unknown_messages(&self) -> u64 {
        self.unknown_messages
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    // Private

    fn on_link_connected(&mut self) {
        info!("Connected, sending schema fingerprint {:#018x}", self.kinds.fingerprint());
        self.state = ClientState::Connected;
        self.verified = false;
        self.last_ping = None;
        self.incoming_events.push_connection();

        let hello = NetMessage::Hello {
            fingerprint: self.kinds.fingerprint(),
            session_id: self.session_id,
        };
        if let Err(error) = self.write_message(&hello) {
            self.fail_transport(error);
        }
    }

    fn process_inbound(&mut self) {
        for channel in Channel::ALL {
            while self.state == ClientState::Connected {
                let Some(payload) = self.transport.receive_message(channel) else {
                    break;
                };
                let result = NetMessage::read(&payload);
                self.transport.release_message(payload);
                match result {
                    Ok(message) => self.dispatch(message),
                    Err(MessageError::UnknownKind(kind)) => self.on_unknown_kind(kind),
                    Err(error) => {
                        warn!("Dropping bad frame on {:?}: {}", channel, error);
                        self.incoming_events.push_error(error.into());
                    }
                }
            }
        }
    }

    fn dispatch(&mut self, message: NetMessage) {
        match message {
            NetMessage::Welcome { peer, fingerprint } => {
                let local = self.kinds.fingerprint();
                if fingerprint != local {
                    self.fail_handshake(local, fingerprint);
                    return;
                }
                info!("Server accepted schema, assigned {}", peer);
                self.verified = true;
                self.peer_index = Some(peer);
                self.incoming_events.push_welcome(peer);
            }
            NetMessage::Reject { expected, found } => {
                debug!("Server expected {:#018x}, we sent {:#018x}", expected, found);
                self.fail_handshake(found, expected);
            }
            NetMessage::Ping { ping, pong } => {
                self.ping_stats.record(ping, pong, self.time_ms());
            }
            NetMessage::Hello { .. } => {
                debug!("Ignoring Hello sent by the server");
            }
            message => {
                if self.verified {
                    self.incoming_events.push_message(message);
                } else {
                    debug!("Dropping {:?} received before Welcome", message.kind());
                }
            }
        }
    }

    fn fail_handshake(&mut self, local: u64, remote: u64) {
        let error = ClientError::FormatIncompatible { local, remote };
        warn!("{}", error);
        self.enter_disconnected(Some(error));
    }

    fn on_unknown_kind(&mut self, kind: u16) {
        self.unknown_messages += 1;
        if self.unknown_kinds.insert(kind) {
            warn!("Ignoring unknown message kind {} from server", kind);
        }
    }

    fn maybe_ping(&mut self) {
        if !self.verified {
            return;
        }
        let interval = self.config.ping_interval.as_secs_f64();
        let due = match self.last_ping {
            None => true,
            Some(last) => self.time - last >= interval,
        };
        if !due {
            return;
        }
        self.last_ping = Some(self.time);
        let ping = NetMessage::Ping {
            ping: self.time_ms(),
            pong: 0,
        };
        if let Err(error) = self.write_message(&ping) {
            self.fail_transport(error);
        }
    }

    fn flush_outbound(&mut self) {
        if !self.verified {
            return;
        }
        while let Some(message) = self.outbound.pop_front() {
            if let Err(error) = self.write_message(&message) {
                warn!("Failed to send {:?}", message.kind());
                self.fail_transport(error);
                return;
            }
        }
    }

    fn write_message(&mut self, message: &NetMessage) -> Result<(), TransportError> {
        let mut writer = ByteWriter::from_buffer(self.transport.allocate_buffer());
        message.write(&mut writer);
        self.transport
            .send_message(message.channel(), writer.to_bytes())
    }

    /// A send the transport refused leaves the session unusable
    fn fail_transport(&mut self, error: TransportError) {
        warn!("Transport failure, disconnecting: {}", error);
        self.enter_disconnected(Some(error.into()));
    }

    fn enter_disconnected(&mut self, error: Option<ClientError>) {
        self.transport.disconnect();
        self.state = ClientState::Disconnected;
        self.verified = false;
        self.peer_index = None;
        self.last_ping = None;
        self.outbound.clear();
        if let Some(error) = error {
            self.incoming_events.push_error(error);
        }
        self.incoming_events.push_disconnection();
    }

    fn time_ms(&self) -> i64 {
        (self.time * 1000.0).round() as i64
    }
}
