use std::{collections::HashSet, sync::Arc};

use log::{debug, info, warn};

use snapwire_shared::{
    split_world, ByteWriter, Channel, ComponentKinds, MessageError, NetMessage, PeerEvent,
    PeerIndex, RoleContext, ServerTransport, SimClock, SnapshotArchive, SnapshotRecord, Tick,
    TransportError, WorldChunk,
};

use crate::{events::ServerEvents, Peer, PeerHandler, ServerConfig, ServerError};

/// Authoritative side of a session. Owns the peer slot table and the fixed
/// simulation clock, and processes inbound messages once per tick.
pub struct Server<T: ServerTransport, H: PeerHandler = ()> {
    // Config
    config: ServerConfig,
    kinds: Arc<ComponentKinds>,
    context: RoleContext,
    // Connection
    transport: T,
    handler: H,
    peers: Vec<Option<Peer>>,
    clock: SimClock,
    next_world_id: u32,
    // Diagnostics
    unknown_kinds: HashSet<u16>,
    unknown_messages: u64,
    // Events
    incoming_events: ServerEvents,
}

impl<T: ServerTransport, H: PeerHandler> Server<T, H> {
    /// Create a new Server. `handler` receives the peer lifecycle hooks.
    pub fn new(
        config: ServerConfig,
        kinds: Arc<ComponentKinds>,
        transport: T,
        handler: H,
    ) -> Result<Self, ServerError> {
        config.validate()?;

        let clock = SimClock::new(config.tick_interval.as_secs_f64());
        let peers = vec![None; config.max_peers];

        Ok(Self {
            config,
            kinds,
            context: RoleContext::server(),
            transport,
            handler,
            peers,
            clock,
            next_world_id: 1,
            unknown_kinds: HashSet::new(),
            unknown_messages: 0,
            incoming_events: ServerEvents::new(),
        })
    }

    /// Starts accepting peers
    pub fn listen(&mut self) -> Result<(), ServerError> {
        self.transport.start(self.config.max_peers)?;
        info!(
            "Server listening for up to {} peers, schema fingerprint {:#018x}",
            self.config.max_peers,
            self.kinds.fingerprint()
        );
        Ok(())
    }

    /// Returns whether or not the Server is accepting peers
    pub fn is_listening(&self) -> bool {
        self.transport.is_running()
    }

    /// Disconnects every peer and stops the transport
    pub fn stop(&mut self) {
        let connected: Vec<PeerIndex> = self.peers().map(Peer::index).collect();
        for peer in connected {
            self.disconnect(peer);
        }
        self.transport.stop();
        info!("Server stopped at tick {}", self.clock.tick());
    }

    /// Must be called regularly with the elapsed wall time in seconds.
    ///
    /// Runs one simulation tick for every whole tick interval accumulated so
    /// far. Each tick pulls inbound traffic, applies connects and
    /// disconnects, drains every channel of every connected peer, then
    /// flushes outbound traffic. Calls that do not complete a tick only
    /// accumulate time.
    pub fn update(&mut self, delta: f64) {
        if !self.transport.is_running() {
            debug!("Server update skipped, not listening");
            return;
        }
        self.clock.accumulate(delta);

        loop {
            match self.clock.try_advance(&self.context) {
                Ok(true) => self.run_tick(),
                Ok(false) => break,
                Err(error) => {
                    self.incoming_events.push_error(error.into());
                    break;
                }
            }
        }
    }

    /// Returns every event collected since the last call
    pub fn receive(&mut self) -> ServerEvents {
        std::mem::take(&mut self.incoming_events)
    }

    // Messages

    /// Queues `message` for one verified peer. Messages addressed to a peer
    /// that is gone or not yet verified are dropped.
    pub fn send(&mut self, peer: PeerIndex, message: &NetMessage) {
        if !self.is_peer_verified(peer) {
            debug!("Dropping {:?} for {}: not a verified peer", message.kind(), peer);
            return;
        }
        if let Err(error) = self.write_message(peer, message) {
            debug!("Dropping {:?} for {}: {}", message.kind(), peer, error);
        }
    }

    /// Queues `message` for every verified peer
    pub fn broadcast(&mut self, message: &NetMessage) {
        self.broadcast_filtered(None, message);
    }

    /// Queues `message` for every verified peer but `except`
    pub fn broadcast_except(&mut self, except: PeerIndex, message: &NetMessage) {
        self.broadcast_filtered(Some(except), message);
    }

    /// Sends a full entity snapshot to every verified peer
    pub fn broadcast_snapshot(&mut self, record: &SnapshotRecord) -> Result<(), ServerError> {
        self.context.require_server("broadcast_snapshot")?;
        self.broadcast(&NetMessage::EntitySnapshot(record.clone()));
        Ok(())
    }

    /// Sends a loss-tolerant entity update to every verified peer
    pub fn broadcast_update(&mut self, record: &SnapshotRecord) -> Result<(), ServerError> {
        self.context.require_server("broadcast_update")?;
        self.broadcast(&NetMessage::EntityUpdate(record.clone()));
        Ok(())
    }

    /// Streams `archive` to every verified peer as a chunked transfer and
    /// returns the transfer's snapshot id.
    pub fn broadcast_world(&mut self, archive: &SnapshotArchive) -> Result<u32, ServerError> {
        self.context.require_server("broadcast_world")?;
        let (snapshot_id, chunks) = self.prepare_world(archive)?;
        for chunk in chunks {
            self.broadcast(&NetMessage::WorldChunk(chunk));
        }
        Ok(snapshot_id)
    }

    /// Streams `archive` to one peer, typically one that just joined
    pub fn send_world(
        &mut self,
        peer: PeerIndex,
        archive: &SnapshotArchive,
    ) -> Result<u32, ServerError> {
        self.context.require_server("send_world")?;
        let (snapshot_id, chunks) = self.prepare_world(archive)?;
        for chunk in chunks {
            self.send(peer, &NetMessage::WorldChunk(chunk));
        }
        Ok(snapshot_id)
    }

    // Peers

    /// Closes a peer's connection. Anything already queued for it is
    /// flushed first, its pending inbound messages are dropped.
    pub fn disconnect(&mut self, peer: PeerIndex) {
        if self.peer(peer).is_none() {
            debug!("Ignoring disconnect of {}: slot is empty", peer);
            return;
        }
        self.transport.disconnect_peer(peer);
        self.on_peer_disconnected(peer);
    }

    pub fn peer(&self, peer: PeerIndex) -> Option<&Peer> {
        self.peers.get(peer.as_usize()).and_then(Option::as_ref)
    }

    /// Connected peers, verified or not, in index order
    pub fn peers(&self) -> impl Iterator<Item = &Peer> {
        self.peers.iter().flatten()
    }

    pub fn peers_count(&self) -> usize {
        self.peers().count()
    }

    pub fn is_peer_verified(&self, peer: PeerIndex) -> bool {
        self.peer(peer).map(Peer::is_verified).unwrap_or(false)
    }

    /// Attaches the game's identity to a connected peer. Returns false if
    /// the slot is empty.
    pub fn set_peer_identity(&mut self, peer: PeerIndex, identity: impl Into<String>) -> bool {
        match self.peers.get_mut(peer.as_usize()).and_then(Option::as_mut) {
            Some(record) => {
                record.set_identity(identity.into());
                true
            }
            None => false,
        }
    }

    // Getters

    pub fn tick(&self) -> Tick {
        self.clock.tick()
    }

    /// Simulation time in seconds. Only advanced by whole ticks.
    pub fn sim_time(&self) -> f64 {
        self.clock.sim_time()
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn component_kinds(&self) -> &ComponentKinds {
        &self.kinds
    }

    pub fn role_context(&self) -> &RoleContext {
        &self.context
    }

    /// Frames received with a discriminant this build does not know
    pub fn unknown_messages(&self) -> u64 {
        self.unknown_messages
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    // Private

    fn run_tick(&mut self) {
        self.transport.advance_time(self.clock.sim_time());
        for event in self.transport.receive_packets() {
            match event {
                PeerEvent::Connected(peer) => self.on_peer_connected(peer),
                PeerEvent::Disconnected(peer) => self.on_peer_disconnected(peer),
            }
        }

        self.incoming_events.push_tick(self.clock.tick());

        let connected: Vec<PeerIndex> = self.peers().map(Peer::index).collect();
        for peer in connected {
            self.process_peer_messages(peer);
        }

        self.transport.send_packets();
    }

    fn on_peer_connected(&mut self, peer: PeerIndex) {
        let Some(slot) = self.peers.get_mut(peer.as_usize()) else {
            warn!("Transport reported {} beyond the configured slots, dropping it", peer);
            self.transport.disconnect_peer(peer);
            return;
        };
        if slot.is_some() {
            warn!("{} connected twice without a disconnect", peer);
        }
        *slot = Some(Peer::new(peer));
        info!("{} connected", peer);
        self.handler.peer_connected(peer);
        self.incoming_events.push_connection(peer);
    }

    fn on_peer_disconnected(&mut self, peer: PeerIndex) {
        let Some(record) = self.peers.get_mut(peer.as_usize()).and_then(Option::take) else {
            debug!("Disconnect for unknown {}", peer);
            return;
        };
        info!("{} disconnected", record.index());
        self.handler.peer_disconnected(peer);
        self.incoming_events.push_disconnection(peer);
    }

    fn process_peer_messages(&mut self, peer: PeerIndex) {
        for channel in Channel::ALL {
            // a handler may disconnect the peer mid-drain
            while self.peer(peer).is_some() {
                let Some(payload) = self.transport.receive_message(peer, channel) else {
                    break;
                };
                let result = NetMessage::read(&payload);
                self.transport.release_message(payload);
                match result {
                    Ok(message) => self.dispatch(peer, message),
                    Err(MessageError::UnknownKind(kind)) => self.on_unknown_kind(peer, kind),
                    Err(source) => {
                        warn!("Dropping bad frame from {} on {:?}: {}", peer, channel, source);
                        self.incoming_events
                            .push_error(ServerError::Message { peer, source });
                    }
                }
            }
        }
    }

    fn dispatch(&mut self, peer: PeerIndex, message: NetMessage) {
        match message {
            NetMessage::Hello {
                fingerprint,
                session_id,
            } => self.on_hello(peer, fingerprint, session_id),
            NetMessage::Ping { ping, .. } => {
                let pong = NetMessage::Ping {
                    ping,
                    pong: self.clock.sim_time_ms(),
                };
                if let Err(error) = self.write_message(peer, &pong) {
                    debug!("Pong to {} not sent: {}", peer, error);
                }
            }
            message if !self.is_peer_verified(peer) => {
                debug!("Dropping {:?} from unverified {}", message.kind(), peer);
            }
            NetMessage::Test { data } => {
                debug!("Echoing test message from {}", peer);
                self.send(peer, &NetMessage::Test { data });
                self.incoming_events
                    .push_message(peer, NetMessage::Test { data });
            }
            NetMessage::Welcome { .. } | NetMessage::Reject { .. } => {
                debug!("Ignoring handshake reply sent by {}", peer);
            }
            message => self.incoming_events.push_message(peer, message),
        }
    }

    fn on_hello(&mut self, peer: PeerIndex, fingerprint: u64, session_id: u64) {
        if self.is_peer_verified(peer) {
            debug!("Ignoring repeated Hello from {}", peer);
            return;
        }
        let local = self.kinds.fingerprint();
        if fingerprint != local {
            let error = ServerError::FormatIncompatible {
                peer,
                local,
                remote: fingerprint,
            };
            warn!("{}", error);
            let reject = NetMessage::Reject {
                expected: local,
                found: fingerprint,
            };
            if let Err(send_error) = self.write_message(peer, &reject) {
                debug!("Reject to {} not sent: {}", peer, send_error);
            }
            self.incoming_events.push_error(error);
            self.disconnect(peer);
            return;
        }

        if let Some(record) = self.peers.get_mut(peer.as_usize()).and_then(Option::as_mut) {
            record.verify(session_id);
        }
        info!("{} verified (session {:#x})", peer, session_id);
        let welcome = NetMessage::Welcome {
            peer,
            fingerprint: local,
        };
        if let Err(error) = self.write_message(peer, &welcome) {
            warn!("Welcome to {} not sent: {}", peer, error);
        }
    }

    fn on_unknown_kind(&mut self, peer: PeerIndex, kind: u16) {
        self.unknown_messages += 1;
        if self.unknown_kinds.insert(kind) {
            warn!("Ignoring unknown message kind {} from {}", kind, peer);
        }
    }

    fn broadcast_filtered(&mut self, except: Option<PeerIndex>, message: &NetMessage) {
        let targets: Vec<PeerIndex> = self
            .peers()
            .filter(|record| record.is_verified() && Some(record.index()) != except)
            .map(Peer::index)
            .collect();
        for peer in targets {
            self.send(peer, message);
        }
    }

    fn prepare_world(
        &mut self,
        archive: &SnapshotArchive,
    ) -> Result<(u32, Vec<WorldChunk>), ServerError> {
        let snapshot_id = self.next_world_id;
        self.next_world_id = self.next_world_id.wrapping_add(1).max(1);
        let bytes = archive.to_bytes();
        let chunks = split_world(snapshot_id, &bytes, self.config.world_chunk_size)?;
        info!(
            "Streaming world {} ({} records, {} bytes) in {} messages",
            snapshot_id,
            archive.len(),
            bytes.len(),
            chunks.len()
        );
        Ok((snapshot_id, chunks))
    }

    fn write_message(&mut self, peer: PeerIndex, message: &NetMessage) -> Result<(), TransportError> {
        let mut writer = ByteWriter::from_buffer(self.transport.allocate_buffer());
        message.write(&mut writer);
        self.transport
            .send_message(peer, message.channel(), writer.to_bytes())
    }
}
