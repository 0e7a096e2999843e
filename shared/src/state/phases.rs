use log::{debug, info};

use crate::{GameState, GameStateManager, MenuState, MenuStateManager};

/// Follows a host's broadcast phases on a client.
///
/// The menu only follows `Network -> Game`, so a client browsing settings is
/// never yanked into the game. The game phase follows the host unless the
/// client has paused locally.
pub fn apply_host_phases(
    menu: &mut MenuStateManager,
    game: &mut GameStateManager,
    host_menu: MenuState,
    host_game: GameState,
) {
    if menu.is(MenuState::Network) && host_menu == MenuState::Game {
        menu.set(host_menu);
    }
    if game.is_not(GameState::Paused) {
        game.set(host_game);
    } else {
        debug!("Locally paused, ignoring host phase {}", host_game);
    }
}

pub fn reset_on_connection_lost(menu: &mut MenuStateManager, game: &mut GameStateManager) {
    info!("Lost connection to host, returning to {}", MenuState::Root);
    menu.reset();
    game.reset();
}
