use snapwire_shared::{PeerIndex, SessionId};

/// Server-side record of one connected peer. Dropped as soon as the peer
/// disconnects, together with everything keyed by it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Peer {
    index: PeerIndex,
    session_id: Option<SessionId>,
    verified: bool,
    identity: Option<String>,
}

impl Peer {
    pub(crate) fn new(index: PeerIndex) -> Self {
        Self {
            index,
            session_id: None,
            verified: false,
            identity: None,
        }
    }

    pub fn index(&self) -> PeerIndex {
        self.index
    }

    /// Session id announced in the peer's `Hello`
    pub fn session_id(&self) -> Option<SessionId> {
        self.session_id
    }

    /// True once the peer's schema fingerprint matched
    pub fn is_verified(&self) -> bool {
        self.verified
    }

    /// Name the game gave this peer, if any
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub(crate) fn verify(&mut self, session_id: SessionId) {
        self.session_id = Some(session_id);
        self.verified = true;
    }

    pub(crate) fn set_identity(&mut self, identity: String) {
        self.identity = Some(identity);
    }
}
