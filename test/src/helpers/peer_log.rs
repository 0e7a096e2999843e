use snapwire_server::PeerHandler;
use snapwire_shared::PeerIndex;

/// Records the server's lifecycle hooks in call order
#[derive(Debug, Default)]
pub struct PeerLog {
    pub joined: Vec<PeerIndex>,
    pub left: Vec<PeerIndex>,
}

impl PeerHandler for PeerLog {
    fn peer_connected(&mut self, peer: PeerIndex) {
        self.joined.push(peer);
    }

    fn peer_disconnected(&mut self, peer: PeerIndex) {
        self.left.push(peer);
    }
}
