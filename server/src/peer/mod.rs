mod peer_handler;
mod peer_record;

pub use peer_handler::PeerHandler;
pub use peer_record::Peer;
