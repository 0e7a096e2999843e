use std::{
    collections::{HashMap, VecDeque},
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::{Arc, Mutex, MutexGuard},
};

use log::{debug, info, warn};

use crate::{
    transport::{
        link_conditioner::{LinkConditioner, LinkConditionerConfig},
        message_pool::MessagePool,
        ClientTransport, LinkStatus, PeerEvent, PrivateKey, RefusalReason, ServerTransport,
        TransportError, DEFAULT_PRIVATE_KEY,
    },
    Channel, PeerIndex, SessionId,
};

pub const DEFAULT_HUB_PORT: u16 = 40000;

#[derive(Clone, Debug, PartialEq)]
pub struct LocalHubConfig {
    /// Address clients must connect to
    pub address: SocketAddr,
    pub private_key: PrivateKey,
    /// Seconds of server time without traffic before a peer is dropped
    pub connection_timeout: f64,
    /// Seconds of client time a connect request may stay unanswered
    pub connect_timeout: f64,
    /// Applied to the unreliable channel in both directions
    pub link_conditioner: Option<LinkConditionerConfig>,
}

impl Default for LocalHubConfig {
    fn default() -> Self {
        Self {
            address: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_HUB_PORT),
            private_key: DEFAULT_PRIVATE_KEY,
            connection_timeout: 5.0,
            connect_timeout: 5.0,
            link_conditioner: None,
        }
    }
}

type EndpointId = u64;
type Queues = [VecDeque<Vec<u8>>; 2];

struct Endpoint {
    status: LinkStatus,
    private_key: PrivateKey,
    session_id: SessionId,
    peer: Option<PeerIndex>,
    to_server: Queues,
    to_client: Queues,
    heard: bool,
    last_heard: f64,
    client_closed: bool,
}

struct HubState {
    config: LocalHubConfig,
    running: bool,
    next_endpoint: EndpointId,
    pending: VecDeque<EndpointId>,
    endpoints: HashMap<EndpointId, Endpoint>,
    slots: Vec<Option<EndpointId>>,
}

impl HubState {
    fn close_slot(&mut self, peer: PeerIndex) -> bool {
        let Some(slot) = self.slots.get_mut(peer.as_usize()) else {
            return false;
        };
        let Some(id) = slot.take() else {
            return false;
        };
        if let Some(endpoint) = self.endpoints.get_mut(&id) {
            endpoint.status = LinkStatus::Disconnected;
            endpoint.peer = None;
        }
        true
    }
}

/// In-process transport connecting one server with any number of clients
/// through shared queues. Used for local play and tests.
#[derive(Clone)]
pub struct LocalHub {
    state: Arc<Mutex<HubState>>,
}

impl Default for LocalHub {
    fn default() -> Self {
        Self::new(LocalHubConfig::default())
    }
}

impl LocalHub {
    pub fn new(config: LocalHubConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(HubState {
                config,
                running: false,
                next_endpoint: 1,
                pending: VecDeque::new(),
                endpoints: HashMap::new(),
                slots: Vec::new(),
            })),
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.lock().config.address
    }

    pub fn server_transport(&self) -> LocalServerTransport {
        let conditioner = self.lock().config.link_conditioner.clone();
        LocalServerTransport {
            hub: self.clone(),
            time: 0.0,
            inbox: HashMap::new(),
            outbox: HashMap::new(),
            pool: MessagePool::default(),
            conditioner: conditioner.map(LinkConditioner::new),
        }
    }

    pub fn client_transport(&self) -> LocalClientTransport {
        let conditioner = self.lock().config.link_conditioner.clone();
        LocalClientTransport {
            hub: self.clone(),
            endpoint: None,
            status: LinkStatus::Disconnected,
            time: 0.0,
            connect_started: 0.0,
            inbox: Queues::default(),
            outbox: [Vec::new(), Vec::new()],
            pool: MessagePool::default(),
            // a different stream than the server side so both directions are independent
            conditioner: conditioner
                .map(|config| LinkConditioner::new(config.clone().with_seed(!config.seed))),
        }
    }

    /// Number of occupied peer slots
    pub fn connected_peers(&self) -> usize {
        self.lock().slots.iter().filter(|slot| slot.is_some()).count()
    }

    fn lock(&self) -> MutexGuard<'_, HubState> {
        // a panic on another thread leaves queues intact, keep using them
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub struct LocalServerTransport {
    hub: LocalHub,
    time: f64,
    inbox: HashMap<PeerIndex, Queues>,
    outbox: HashMap<PeerIndex, [Vec<Vec<u8>>; 2]>,
    pool: MessagePool,
    conditioner: Option<LinkConditioner>,
}

impl LocalServerTransport {
    fn discard_peer_queues(&mut self, peer: PeerIndex) {
        if let Some(queues) = self.inbox.remove(&peer) {
            for payload in queues.into_iter().flatten() {
                self.pool.release(payload);
            }
        }
        if let Some(queues) = self.outbox.remove(&peer) {
            for payload in queues.into_iter().flatten() {
                self.pool.release(payload);
            }
        }
    }

    fn flush_peer(&mut self, state: &mut HubState, peer: PeerIndex, mut queues: [Vec<Vec<u8>>; 2]) {
        let endpoint = state
            .slots
            .get(peer.as_usize())
            .copied()
            .flatten()
            .and_then(|id| state.endpoints.get_mut(&id));
        let Some(endpoint) = endpoint else {
            debug!("Dropping outbound messages for {}, which is gone", peer);
            for payload in queues.into_iter().flatten() {
                self.pool.release(payload);
            }
            return;
        };
        for channel in Channel::ALL {
            let mut batch = std::mem::take(&mut queues[channel.index()]);
            if channel == Channel::Unreliable {
                if let Some(conditioner) = self.conditioner.as_mut() {
                    conditioner.condition(&mut batch);
                }
            }
            endpoint.to_client[channel.index()].extend(batch);
        }
    }
}

impl ServerTransport for LocalServerTransport {
    fn start(&mut self, max_peers: usize) -> Result<(), TransportError> {
        let mut state = self.hub.lock();
        if state.running {
            return Err(TransportError::AlreadyRunning);
        }
        state.running = true;
        state.slots = vec![None; max_peers];
        info!(
            "Local hub listening on {} with {} peer slots",
            state.config.address, max_peers
        );
        Ok(())
    }

    fn stop(&mut self) {
        let mut guard = self.hub.lock();
        let state = &mut *guard;
        state.running = false;
        for id in state.slots.drain(..).flatten() {
            if let Some(endpoint) = state.endpoints.get_mut(&id) {
                endpoint.status = LinkStatus::Disconnected;
                endpoint.peer = None;
            }
        }
        for id in state.pending.drain(..) {
            if let Some(endpoint) = state.endpoints.get_mut(&id) {
                endpoint.status = LinkStatus::Refused(RefusalReason::ServerNotRunning);
            }
        }
        drop(guard);

        let peers: Vec<PeerIndex> = self
            .inbox
            .keys()
            .chain(self.outbox.keys())
            .copied()
            .collect();
        for peer in peers {
            self.discard_peer_queues(peer);
        }
    }

    fn is_running(&self) -> bool {
        self.hub.lock().running
    }

    fn advance_time(&mut self, time: f64) {
        self.time = time;
    }

    fn receive_packets(&mut self) -> Vec<PeerEvent> {
        let mut events = Vec::new();
        let hub = self.hub.clone();
        let mut guard = hub.lock();
        let state = &mut *guard;
        if !state.running {
            return events;
        }
        let now = self.time;

        // clients that hung up
        let closed: Vec<EndpointId> = state
            .endpoints
            .iter()
            .filter(|(_, endpoint)| endpoint.client_closed)
            .map(|(id, _)| *id)
            .collect();
        for id in closed {
            state.pending.retain(|pending| *pending != id);
            let Some(endpoint) = state.endpoints.remove(&id) else {
                continue;
            };
            if let Some(peer) = endpoint.peer {
                if let Some(slot) = state.slots.get_mut(peer.as_usize()) {
                    *slot = None;
                }
                info!("{} disconnected (session {:#x})", peer, endpoint.session_id);
                self.discard_peer_queues(peer);
                events.push(PeerEvent::Disconnected(peer));
            }
        }

        // connect requests
        while let Some(id) = state.pending.pop_front() {
            let free_slot = state.slots.iter().position(Option::is_none);
            let max_peers = state.slots.len();
            let expected_key = state.config.private_key;
            let Some(endpoint) = state.endpoints.get_mut(&id) else {
                continue;
            };
            if endpoint.private_key != expected_key {
                warn!("Refusing session {:#x}: invalid key", endpoint.session_id);
                endpoint.status = LinkStatus::Refused(RefusalReason::InvalidKey);
                continue;
            }
            let Some(peer) = free_slot.and_then(PeerIndex::from_usize) else {
                warn!(
                    "Refusing session {:#x}: all {} peer slots are taken",
                    endpoint.session_id, max_peers
                );
                endpoint.status = LinkStatus::Refused(RefusalReason::PeerSlotsExhausted);
                continue;
            };
            endpoint.status = LinkStatus::Connected;
            endpoint.peer = Some(peer);
            endpoint.heard = false;
            endpoint.last_heard = now;
            info!("{} connected (session {:#x})", peer, endpoint.session_id);
            state.slots[peer.as_usize()] = Some(id);
            events.push(PeerEvent::Connected(peer));
        }

        // liveness, then inbound traffic
        let timeout = state.config.connection_timeout;
        for index in 0..state.slots.len() {
            let Some(id) = state.slots[index] else {
                continue;
            };
            let Some(endpoint) = state.endpoints.get_mut(&id) else {
                state.slots[index] = None;
                continue;
            };
            let Some(peer) = endpoint.peer else {
                continue;
            };
            if endpoint.heard {
                endpoint.heard = false;
                endpoint.last_heard = now;
            } else if now - endpoint.last_heard > timeout {
                info!("{} timed out after {:.2}s of silence", peer, now - endpoint.last_heard);
                endpoint.status = LinkStatus::Disconnected;
                endpoint.peer = None;
                state.slots[index] = None;
                self.discard_peer_queues(peer);
                events.push(PeerEvent::Disconnected(peer));
                continue;
            }
            let inbox = self.inbox.entry(peer).or_default();
            for channel in Channel::ALL {
                inbox[channel.index()].extend(endpoint.to_server[channel.index()].drain(..));
            }
        }

        events
    }

    fn send_packets(&mut self) {
        let hub = self.hub.clone();
        let mut guard = hub.lock();
        let outbox: Vec<(PeerIndex, [Vec<Vec<u8>>; 2])> = self.outbox.drain().collect();
        for (peer, queues) in outbox {
            self.flush_peer(&mut guard, peer, queues);
        }
    }

    fn is_peer_connected(&self, peer: PeerIndex) -> bool {
        self.hub
            .lock()
            .slots
            .get(peer.as_usize())
            .map(Option::is_some)
            .unwrap_or(false)
    }

    fn receive_message(&mut self, peer: PeerIndex, channel: Channel) -> Option<Vec<u8>> {
        self.inbox.get_mut(&peer)?[channel.index()].pop_front()
    }

    fn send_message(
        &mut self,
        peer: PeerIndex,
        channel: Channel,
        payload: Vec<u8>,
    ) -> Result<(), TransportError> {
        if !self.is_peer_connected(peer) {
            self.pool.release(payload);
            return Err(TransportError::PeerNotConnected { peer });
        }
        self.outbox.entry(peer).or_default()[channel.index()].push(payload);
        Ok(())
    }

    fn allocate_buffer(&mut self) -> Vec<u8> {
        self.pool.allocate()
    }

    fn release_message(&mut self, payload: Vec<u8>) {
        self.pool.release(payload);
    }

    fn disconnect_peer(&mut self, peer: PeerIndex) {
        let hub = self.hub.clone();
        let mut guard = hub.lock();
        if let Some(queues) = self.outbox.remove(&peer) {
            self.flush_peer(&mut guard, peer, queues);
        }
        if guard.close_slot(peer) {
            info!("{} disconnected by server", peer);
        }
        drop(guard);
        self.discard_peer_queues(peer);
    }
}

pub struct LocalClientTransport {
    hub: LocalHub,
    endpoint: Option<EndpointId>,
    status: LinkStatus,
    time: f64,
    connect_started: f64,
    inbox: Queues,
    outbox: [Vec<Vec<u8>>; 2],
    pool: MessagePool,
    conditioner: Option<LinkConditioner>,
}

impl LocalClientTransport {
    fn clear_outbox(&mut self) {
        for queue in self.outbox.iter_mut() {
            for payload in queue.drain(..) {
                self.pool.release(payload);
            }
        }
    }
}

impl ClientTransport for LocalClientTransport {
    fn insecure_connect(
        &mut self,
        private_key: &PrivateKey,
        session_id: SessionId,
        server_addr: SocketAddr,
    ) -> Result<(), TransportError> {
        if matches!(self.status, LinkStatus::Connecting | LinkStatus::Connected) {
            return Err(TransportError::AlreadyConnected);
        }
        self.inbox = Queues::default();
        self.clear_outbox();

        let mut state = self.hub.lock();
        if server_addr != state.config.address {
            warn!("No local server at {}", server_addr);
            self.status = LinkStatus::Refused(RefusalReason::WrongAddress);
            return Ok(());
        }
        let id = state.next_endpoint;
        state.next_endpoint += 1;
        state.endpoints.insert(
            id,
            Endpoint {
                status: LinkStatus::Connecting,
                private_key: *private_key,
                session_id,
                peer: None,
                to_server: Queues::default(),
                to_client: Queues::default(),
                heard: false,
                last_heard: 0.0,
                client_closed: false,
            },
        );
        state.pending.push_back(id);
        drop(state);

        self.endpoint = Some(id);
        self.status = LinkStatus::Connecting;
        self.connect_started = self.time;
        Ok(())
    }

    fn disconnect(&mut self) {
        if let Some(id) = self.endpoint.take() {
            let mut state = self.hub.lock();
            if let Some(endpoint) = state.endpoints.get_mut(&id) {
                endpoint.client_closed = true;
                endpoint.status = LinkStatus::Disconnected;
            }
        }
        self.status = LinkStatus::Disconnected;
        self.inbox = Queues::default();
        self.clear_outbox();
    }

    fn status(&self) -> LinkStatus {
        self.status
    }

    fn advance_time(&mut self, time: f64) {
        self.time = time;
    }

    fn receive_packets(&mut self) {
        let Some(id) = self.endpoint else {
            return;
        };
        let hub = self.hub.clone();
        let mut guard = hub.lock();
        let state = &mut *guard;
        let connect_timeout = state.config.connect_timeout;

        let finished = match state.endpoints.get_mut(&id) {
            None => {
                self.status = LinkStatus::Disconnected;
                true
            }
            Some(endpoint) => {
                for channel in Channel::ALL {
                    self.inbox[channel.index()]
                        .extend(endpoint.to_client[channel.index()].drain(..));
                }
                if endpoint.status == LinkStatus::Connecting
                    && self.time - self.connect_started > connect_timeout
                {
                    warn!("Connect request for session {:#x} timed out", endpoint.session_id);
                    endpoint.status = LinkStatus::Refused(RefusalReason::TimedOut);
                }
                self.status = endpoint.status;
                matches!(
                    endpoint.status,
                    LinkStatus::Disconnected | LinkStatus::Refused(_)
                )
            }
        };

        if finished {
            state.endpoints.remove(&id);
            state.pending.retain(|pending| *pending != id);
            self.endpoint = None;
        }
    }

    fn send_packets(&mut self) {
        let Some(id) = self.endpoint else {
            self.clear_outbox();
            return;
        };
        if self.status != LinkStatus::Connected {
            return;
        }
        let hub = self.hub.clone();
        let mut state = hub.lock();
        let Some(endpoint) = state.endpoints.get_mut(&id) else {
            self.clear_outbox();
            return;
        };
        endpoint.heard = true;
        for channel in Channel::ALL {
            let mut batch = std::mem::take(&mut self.outbox[channel.index()]);
            if channel == Channel::Unreliable {
                if let Some(conditioner) = self.conditioner.as_mut() {
                    conditioner.condition(&mut batch);
                }
            }
            endpoint.to_server[channel.index()].extend(batch);
        }
    }

    fn receive_message(&mut self, channel: Channel) -> Option<Vec<u8>> {
        self.inbox[channel.index()].pop_front()
    }

    fn send_message(&mut self, channel: Channel, payload: Vec<u8>) -> Result<(), TransportError> {
        if self.status != LinkStatus::Connected {
            self.pool.release(payload);
            return Err(TransportError::NotConnected { channel });
        }
        self.outbox[channel.index()].push(payload);
        Ok(())
    }

    fn allocate_buffer(&mut self) -> Vec<u8> {
        self.pool.allocate()
    }

    fn release_message(&mut self, payload: Vec<u8>) {
        self.pool.release(payload);
    }
}

impl Drop for LocalClientTransport {
    fn drop(&mut self) {
        if let Some(id) = self.endpoint.take() {
            let mut state = self.hub.lock();
            if let Some(endpoint) = state.endpoints.get_mut(&id) {
                endpoint.client_closed = true;
            }
        }
    }
}
