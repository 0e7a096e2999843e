use std::fmt;

use snapwire_serde::{ByteReader, ByteWriter, ConstByteLength, Serde, SerdeErr};

use crate::StateManager;

/// Top-level menu flow
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MenuState {
    #[default]
    Root,
    About,
    Network,
    Settings,
    Game,
}

impl MenuState {
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Root => 0,
            Self::About => 1,
            Self::Network => 2,
            Self::Settings => 3,
            Self::Game => 4,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Root),
            1 => Some(Self::About),
            2 => Some(Self::Network),
            3 => Some(Self::Settings),
            4 => Some(Self::Game),
            _ => None,
        }
    }
}

impl fmt::Display for MenuState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Menu::{:?}", self)
    }
}

impl Serde for MenuState {
    fn ser(&self, writer: &mut ByteWriter) {
        self.to_u8().ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let tag = u8::de(reader)?;
        Self::from_u8(tag).ok_or(SerdeErr::InvalidTag {
            type_name: "MenuState",
            tag: u32::from(tag),
        })
    }

    fn byte_length(&self) -> usize {
        1
    }
}

impl ConstByteLength for MenuState {
    fn const_byte_length() -> usize {
        1
    }
}

/// Menu flow manager, defaulting to [`MenuState::Root`]
pub struct MenuStateManager {
    inner: StateManager<MenuState>,
}

impl Default for MenuStateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuStateManager {
    pub fn new() -> Self {
        Self {
            inner: StateManager::new(MenuState::Root),
        }
    }

    pub fn in_game(&self) -> bool {
        self.inner.is(MenuState::Game)
    }

    pub fn is_in_menu(&self) -> bool {
        self.inner.is_not(MenuState::Game)
    }
}

impl std::ops::Deref for MenuStateManager {
    type Target = StateManager<MenuState>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl std::ops::DerefMut for MenuStateManager {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
