/// End-to-end tests: a server and clients talking over the in-process hub,
/// covering the schema handshake, echo traffic, ping, lifecycle hooks and
/// peer slot limits.

use snapwire_client::{self as client, ClientError};
use snapwire_server::{self as server, ServerConfig, ServerError};
use snapwire_shared::{
    reset_on_connection_lost, Channel, ClientTransport, GameState, GameStateManager, LocalHub,
    MenuState, MenuStateManager, NetMessage, PeerIndex, RefusalReason, ServerTransport,
    TransportError,
};
use snapwire_test::{
    connect, exchange, init_logger, new_client, older_schema, schema, start_server,
};

#[test]
fn matching_builds_complete_the_handshake() {
    init_logger();
    let hub = LocalHub::default();
    let mut server = start_server(&hub, schema(), ServerConfig::default());
    let mut client = new_client(&hub, schema());

    assert!(connect(&mut server, &mut client, &hub));

    let peer = PeerIndex::new(0);
    let mut client_events = client.receive();
    assert!(client_events.has::<client::ConnectEvent>());
    assert_eq!(
        client_events.read::<client::WelcomeEvent>().collect::<Vec<_>>(),
        vec![peer]
    );
    let mut server_events = server.receive();
    assert_eq!(
        server_events.read::<server::ConnectEvent>().collect::<Vec<_>>(),
        vec![peer]
    );
    assert_eq!(server.handler().joined, vec![peer]);
    assert!(server.is_peer_verified(peer));
    assert_eq!(
        server.peer(peer).and_then(|record| record.session_id()),
        Some(client.session_id())
    );
}

#[test]
fn mismatched_builds_are_refused_on_both_sides() {
    init_logger();
    let hub = LocalHub::default();
    let mut server = start_server(&hub, schema(), ServerConfig::default());
    let mut client = new_client(&hub, older_schema());

    assert!(!connect(&mut server, &mut client, &hub));
    assert!(client.is_disconnected());

    let local = older_schema().fingerprint();
    let remote = schema().fingerprint();
    let mut client_events = client.receive();
    assert_eq!(
        client_events.read::<client::ErrorEvent>().collect::<Vec<_>>(),
        vec![ClientError::FormatIncompatible { local, remote }]
    );
    assert!(client_events.has::<client::DisconnectEvent>());

    let peer = PeerIndex::new(0);
    let mut server_events = server.receive();
    assert_eq!(
        server_events.read::<server::ErrorEvent>().collect::<Vec<_>>(),
        vec![ServerError::FormatIncompatible {
            peer,
            local: remote,
            remote: local,
        }]
    );
    assert_eq!(server.handler().left, vec![peer]);
    assert_eq!(server.peers_count(), 0);
}

#[test]
fn test_messages_are_echoed() {
    let hub = LocalHub::default();
    let mut server = start_server(&hub, schema(), ServerConfig::default());
    let mut client = new_client(&hub, schema());
    assert!(connect(&mut server, &mut client, &hub));
    client.receive();
    server.receive();

    client.send(NetMessage::Test { data: 1234 }).unwrap();
    exchange(&mut server, &mut [&mut client], 3);

    let peer = PeerIndex::new(0);
    assert_eq!(
        server
            .receive()
            .read::<server::MessageEvent>()
            .collect::<Vec<_>>(),
        vec![(peer, NetMessage::Test { data: 1234 })]
    );
    assert_eq!(
        client
            .receive()
            .read::<client::MessageEvent>()
            .collect::<Vec<_>>(),
        vec![NetMessage::Test { data: 1234 }]
    );
}

#[test]
fn ping_produces_round_trip_stats() {
    let hub = LocalHub::default();
    let mut server = start_server(&hub, schema(), ServerConfig::default());
    let mut client = new_client(&hub, schema());
    assert!(connect(&mut server, &mut client, &hub));

    exchange(&mut server, &mut [&mut client], 4);
    let stats = client.ping_stats();
    assert!(stats.has_sample());
    assert!(stats.total >= 0);
    assert_eq!(stats.total, stats.there + stats.back);
}

#[test]
fn unknown_kinds_do_not_block_later_messages() {
    init_logger();
    let hub = LocalHub::default();
    let mut server = start_server(&hub, schema(), ServerConfig::default());
    let mut client = new_client(&hub, schema());
    assert!(connect(&mut server, &mut client, &hub));
    client.receive();
    server.receive();
    let peer = PeerIndex::new(0);

    // client -> server: an unknown frame ahead of a known one, same tick
    client
        .transport_mut()
        .send_message(Channel::Reliable, vec![0xee, 0xee, 1, 2])
        .unwrap();
    client.send(NetMessage::Test { data: 1 }).unwrap();
    exchange(&mut server, &mut [&mut client], 1);

    assert_eq!(server.unknown_messages(), 1);
    assert_eq!(server.peers_count(), 1);
    assert_eq!(
        server
            .receive()
            .read::<server::MessageEvent>()
            .collect::<Vec<_>>(),
        vec![(peer, NetMessage::Test { data: 1 })]
    );

    // server -> client
    server
        .transport_mut()
        .send_message(peer, Channel::Reliable, vec![0xee, 0xee])
        .unwrap();
    server.send(peer, &NetMessage::Test { data: 2 });
    exchange(&mut server, &mut [&mut client], 2);

    assert_eq!(client.unknown_messages(), 1);
    assert!(client.is_connected());
    let messages: Vec<NetMessage> = client.receive().read::<client::MessageEvent>().collect();
    assert!(messages.contains(&NetMessage::Test { data: 2 }));
}

#[test]
fn peer_slots_are_bounded() {
    let hub = LocalHub::default();
    let mut server = start_server(
        &hub,
        schema(),
        ServerConfig {
            max_peers: 1,
            ..Default::default()
        },
    );
    let mut first = new_client(&hub, schema());
    let mut second = new_client(&hub, schema());
    assert!(connect(&mut server, &mut first, &hub));
    assert!(!connect(&mut server, &mut second, &hub));

    assert_eq!(
        second
            .receive()
            .read::<client::ErrorEvent>()
            .collect::<Vec<_>>(),
        vec![ClientError::Transport(TransportError::ConnectRefused {
            reason: RefusalReason::PeerSlotsExhausted
        })]
    );
    assert!(first.is_verified());
    assert_eq!(server.peers_count(), 1);
}

#[test]
fn client_hangup_reaches_the_handler() {
    let hub = LocalHub::default();
    let mut server = start_server(&hub, schema(), ServerConfig::default());
    let mut client = new_client(&hub, schema());
    assert!(connect(&mut server, &mut client, &hub));

    client.disconnect();
    assert!(client.receive().has::<client::DisconnectEvent>());
    exchange(&mut server, &mut [&mut client], 1);

    let peer = PeerIndex::new(0);
    assert_eq!(
        server
            .receive()
            .read::<server::DisconnectEvent>()
            .collect::<Vec<_>>(),
        vec![peer]
    );
    assert_eq!(server.handler().left, vec![peer]);
}

#[test]
fn server_kick_returns_client_to_menu() {
    let hub = LocalHub::default();
    let mut server = start_server(&hub, schema(), ServerConfig::default());
    let mut client = new_client(&hub, schema());
    assert!(connect(&mut server, &mut client, &hub));
    client.receive();

    let mut menu = MenuStateManager::new();
    let mut game = GameStateManager::new();
    menu.set(MenuState::Game);
    game.set(GameState::InRound);

    server.disconnect(PeerIndex::new(0));
    exchange(&mut server, &mut [&mut client], 1);

    if client.receive().has::<client::DisconnectEvent>() {
        reset_on_connection_lost(&mut menu, &mut game);
    }
    assert!(client.is_disconnected());
    assert!(menu.is(MenuState::Root));
    assert!(game.is(GameState::InMenu));
}

#[test]
fn clients_can_reconnect_after_disconnecting() {
    let hub = LocalHub::default();
    let mut server = start_server(&hub, schema(), ServerConfig::default());
    let mut client = new_client(&hub, schema());
    assert!(connect(&mut server, &mut client, &hub));
    let first_session = client.session_id();

    client.disconnect();
    exchange(&mut server, &mut [&mut client], 1);
    assert_eq!(server.peers_count(), 0);

    assert!(connect(&mut server, &mut client, &hub));
    assert_eq!(server.peers_count(), 1);
    assert_ne!(client.session_id(), first_session);
}
