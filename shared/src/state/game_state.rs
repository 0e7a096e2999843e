use std::fmt;

use snapwire_serde::{ByteReader, ByteWriter, ConstByteLength, Serde, SerdeErr};

use crate::{StateError, StateManager};

/// Round / game phase. Discriminants are wire values and never change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GameState {
    #[default]
    InMenu,
    Lobby,
    InRound,
    Planning,
    Paused,
    ModelTest,
    LoadSaveRoom,
}

impl GameState {
    pub fn to_u8(self) -> u8 {
        match self {
            Self::InMenu => 0,
            Self::Lobby => 1,
            Self::InRound => 2,
            Self::Planning => 3,
            Self::Paused => 4,
            Self::ModelTest => 7,
            Self::LoadSaveRoom => 8,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::InMenu),
            1 => Some(Self::Lobby),
            2 => Some(Self::InRound),
            3 => Some(Self::Planning),
            4 => Some(Self::Paused),
            7 => Some(Self::ModelTest),
            8 => Some(Self::LoadSaveRoom),
            _ => None,
        }
    }

    /// Whether the simulation runs in this phase
    pub fn is_update_state(self) -> bool {
        !matches!(self, Self::Paused | Self::InMenu)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Game::{:?}", self)
    }
}

impl Serde for GameState {
    fn ser(&self, writer: &mut ByteWriter) {
        self.to_u8().ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let tag = u8::de(reader)?;
        Self::from_u8(tag).ok_or(SerdeErr::InvalidTag {
            type_name: "GameState",
            tag: u32::from(tag),
        })
    }

    fn byte_length(&self) -> usize {
        1
    }
}

impl ConstByteLength for GameState {
    fn const_byte_length() -> usize {
        1
    }
}

/// Game phase manager, defaulting to [`GameState::InMenu`]
pub struct GameStateManager {
    inner: StateManager<GameState>,
}

impl Default for GameStateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStateManager {
    pub fn new() -> Self {
        Self {
            inner: StateManager::new(GameState::InMenu),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.inner.is(GameState::Paused)
    }

    pub fn is_paused_in(&self, state: GameState) -> bool {
        self.is_paused() && self.inner.previous() == Some(state)
    }

    pub fn in_round(&self) -> bool {
        self.inner.is(GameState::InRound)
    }

    pub fn is_lobby_like(&self) -> bool {
        self.inner.is(GameState::Lobby)
    }

    pub fn should_update(&self) -> bool {
        self.inner.read().is_update_state()
    }

    /// Paused over a phase that updates, so what is underneath should still draw
    pub fn should_prev_update(&self) -> bool {
        self.is_paused()
            && self
                .inner
                .previous()
                .map(GameState::is_update_state)
                .unwrap_or(false)
    }

    /// Pauses, or returns to the paused-over phase
    pub fn toggle_pause(&mut self) -> Result<GameState, StateError> {
        if self.is_paused() {
            return self.inner.go_back();
        }
        self.inner.set(GameState::Paused);
        Ok(self.inner.read())
    }
}

impl std::ops::Deref for GameStateManager {
    type Target = StateManager<GameState>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl std::ops::DerefMut for GameStateManager {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
