pub mod peer_log;
pub mod session;

pub use peer_log::PeerLog;
pub use session::{
    connect, exchange, init_logger, new_client, start_server, TestClient, TestServer, FRAME,
};
