/// Integration tests for the game and menu phase managers, including the
/// rules a client applies when the host broadcasts its phases.

use std::sync::{Arc, Mutex};

use snapwire_shared::{
    apply_host_phases, reset_on_connection_lost, GameState, GameStateManager, MenuState,
    MenuStateManager, StateError,
};

#[test]
fn repeated_set_does_not_grow_history() {
    let mut game = GameStateManager::new();
    game.set(GameState::Lobby);
    let depth = game.history_len();
    game.set(GameState::Lobby);
    assert_eq!(game.history_len(), depth);
}

#[test]
fn go_back_walks_history_in_reverse() {
    let mut game = GameStateManager::new();
    game.set(GameState::Lobby);
    game.clear_history();

    game.set(GameState::InRound);
    game.set(GameState::Planning);
    assert_eq!(game.go_back(), Ok(GameState::InRound));
    assert!(game.is(GameState::InRound));
    assert_eq!(game.go_back(), Ok(GameState::Lobby));
    assert!(game.is(GameState::Lobby));
    assert_eq!(
        game.go_back(),
        Err(StateError::HistoryUnderflow {
            current: "Lobby".to_string()
        })
    );
    assert!(game.is(GameState::Lobby));
}

#[test]
fn pause_round_trip() {
    let mut game = GameStateManager::new();
    game.set(GameState::InRound);
    assert_eq!(game.toggle_pause(), Ok(GameState::Paused));
    assert!(game.is_paused_in(GameState::InRound));
    assert!(game.should_prev_update());
    assert!(!game.should_update());
    assert_eq!(game.toggle_pause(), Ok(GameState::InRound));
    assert!(game.should_update());
}

#[test]
fn change_callbacks_see_new_and_old() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let mut menu = MenuStateManager::new();
    menu.on_change(move |new, old| sink.lock().unwrap().push((new, old)));

    menu.set(MenuState::Network);
    menu.set(MenuState::Network);
    menu.set(MenuState::Game);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (MenuState::Network, MenuState::Root),
            (MenuState::Game, MenuState::Network)
        ]
    );
}

#[test]
fn client_follows_host_into_game_only_from_network() {
    let mut menu = MenuStateManager::new();
    let mut game = GameStateManager::new();

    apply_host_phases(&mut menu, &mut game, MenuState::Game, GameState::Lobby);
    assert!(menu.is(MenuState::Root));
    assert!(game.is(GameState::Lobby));

    menu.set(MenuState::Network);
    apply_host_phases(&mut menu, &mut game, MenuState::Game, GameState::InRound);
    assert!(menu.in_game());
    assert!(game.in_round());

    game.toggle_pause().unwrap();
    apply_host_phases(&mut menu, &mut game, MenuState::Game, GameState::Planning);
    assert!(game.is_paused());

    reset_on_connection_lost(&mut menu, &mut game);
    assert!(menu.is(MenuState::Root));
    assert!(game.is(GameState::InMenu));
    assert_eq!(menu.history_len(), 0);
    assert_eq!(game.history_len(), 0);
}

#[test]
fn oscillation_is_detected() {
    let mut game = GameStateManager::new();
    game.set(GameState::InRound);
    game.set(GameState::Planning);
    assert!(!game.oscillating());
    game.set(GameState::InRound);
    game.set(GameState::Planning);
    assert!(game.oscillating());
}
