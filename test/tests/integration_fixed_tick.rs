/// Integration tests for the server's fixed simulation tick

use std::time::Duration;

use snapwire_server::{ServerConfig, TickEvent};
use snapwire_shared::{LocalHub, RoleContext, RoleError, Role, SimClock};
use snapwire_test::{schema, start_server, FRAME};

#[test]
fn chunking_of_wall_time_does_not_change_sim_time() {
    let coarse_hub = LocalHub::default();
    let fine_hub = LocalHub::default();
    let mut coarse = start_server(&coarse_hub, schema(), ServerConfig::default());
    let mut fine = start_server(&fine_hub, schema(), ServerConfig::default());

    coarse.update(1.0 / 60.0);
    for _ in 0..6 {
        fine.update(1.0 / 360.0);
    }

    assert_eq!(coarse.tick(), 1);
    assert_eq!(fine.tick(), 1);
    assert_eq!(coarse.sim_time().to_bits(), fine.sim_time().to_bits());
    assert_eq!(coarse.sim_time(), coarse.clock().interval());
}

#[test]
fn partial_frames_only_accumulate() {
    let hub = LocalHub::default();
    let mut server = start_server(&hub, schema(), ServerConfig::default());
    server.update(FRAME / 2.0);
    assert_eq!(server.tick(), 0);
    assert!(!server.receive().has::<TickEvent>());
    server.update(FRAME / 2.0);
    assert_eq!(server.receive().read::<TickEvent>().collect::<Vec<_>>(), vec![1]);
}

#[test]
fn long_frame_runs_every_missed_tick() {
    let hub = LocalHub::default();
    let mut server = start_server(
        &hub,
        schema(),
        ServerConfig {
            tick_interval: Duration::from_millis(50),
            ..Default::default()
        },
    );
    server.update(0.26);
    assert_eq!(server.receive().read::<TickEvent>().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    assert!((server.clock().remainder() - 0.01).abs() < 1e-9);
}

#[test]
fn only_the_server_context_commits_ticks() {
    let mut clock = SimClock::new(FRAME);
    clock.accumulate(FRAME);
    assert_eq!(
        clock.try_advance(&RoleContext::client_main()),
        Err(RoleError::NotAuthoritative {
            operation: "SimClock::try_advance",
            role: Role::ClientMain,
        })
    );
    assert_eq!(clock.tick(), 0);
    assert_eq!(clock.try_advance(&RoleContext::server()), Ok(true));
}
