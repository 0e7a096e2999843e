use snapwire_shared::PeerIndex;

/// Lifecycle hooks injected into a [`Server`](crate::Server) at construction.
///
/// Both are only ever called from inside `Server::update` (or the explicit
/// `disconnect` / `stop` calls), on the thread that owns the server.
pub trait PeerHandler {
    fn peer_connected(&mut self, peer: PeerIndex);

    fn peer_disconnected(&mut self, peer: PeerIndex);
}

impl PeerHandler for () {
    fn peer_connected(&mut self, _peer: PeerIndex) {}

    fn peer_disconnected(&mut self, _peer: PeerIndex) {}
}
