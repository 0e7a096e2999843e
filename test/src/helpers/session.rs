use std::sync::Arc;

use log::debug;

use snapwire_client::{Client, ClientConfig};
use snapwire_server::{Server, ServerConfig};
use snapwire_shared::{ComponentKinds, LocalClientTransport, LocalHub, LocalServerTransport};

use crate::PeerLog;

pub type TestServer = Server<LocalServerTransport, PeerLog>;
pub type TestClient = Client<LocalClientTransport>;

/// One frame at 60 Hz, also the default server tick
pub const FRAME: f64 = 1.0 / 60.0;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn start_server(hub: &LocalHub, kinds: ComponentKinds, config: ServerConfig) -> TestServer {
    let mut server = Server::new(
        config,
        Arc::new(kinds),
        hub.server_transport(),
        PeerLog::default(),
    )
    .expect("test server config is valid");
    server.listen().expect("hub starts once");
    server
}

pub fn new_client(hub: &LocalHub, kinds: ComponentKinds) -> TestClient {
    Client::new(ClientConfig::default(), Arc::new(kinds), hub.client_transport())
        .expect("test client config is valid")
}

/// Runs `frames` frames: every client updates, then the server
pub fn exchange(server: &mut TestServer, clients: &mut [&mut TestClient], frames: usize) {
    for _ in 0..frames {
        for client in clients.iter_mut() {
            client.update(FRAME);
        }
        server.update(FRAME);
    }
}

/// Connects `client` and runs frames until the handshake settles either
/// way. Returns whether the client ended up verified.
pub fn connect(server: &mut TestServer, client: &mut TestClient, hub: &LocalHub) -> bool {
    client
        .connect(hub.address())
        .expect("client starts disconnected");
    for _ in 0..10 {
        exchange(server, &mut [&mut *client], 1);
        if client.is_verified() || client.is_disconnected() {
            break;
        }
    }
    debug!(
        "Handshake settled: verified {}, state {:?}",
        client.is_verified(),
        client.state()
    );
    client.is_verified()
}
