pub mod error;
pub mod game_state;
pub mod menu_state;
pub mod phases;
pub mod state_manager;
