use crate::Channel;

/// Wire discriminant of every message. Values are append-only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Hello,
    Welcome,
    Reject,
    Ping,
    Test,
    Announcement,
    GameState,
    PlayerJoin,
    PlayerLeave,
    PlayerLocation,
    EntitySnapshot,
    EntityUpdate,
    WorldChunk,
}

impl MessageKind {
    pub const ALL: [MessageKind; 13] = [
        MessageKind::Hello,
        MessageKind::Welcome,
        MessageKind::Reject,
        MessageKind::Ping,
        MessageKind::Test,
        MessageKind::Announcement,
        MessageKind::GameState,
        MessageKind::PlayerJoin,
        MessageKind::PlayerLeave,
        MessageKind::PlayerLocation,
        MessageKind::EntitySnapshot,
        MessageKind::EntityUpdate,
        MessageKind::WorldChunk,
    ];

    pub fn as_u16(self) -> u16 {
        match self {
            MessageKind::Hello => 0,
            MessageKind::Welcome => 1,
            MessageKind::Reject => 2,
            MessageKind::Ping => 3,
            MessageKind::Test => 4,
            MessageKind::Announcement => 5,
            MessageKind::GameState => 6,
            MessageKind::PlayerJoin => 7,
            MessageKind::PlayerLeave => 8,
            MessageKind::PlayerLocation => 9,
            MessageKind::EntitySnapshot => 10,
            MessageKind::EntityUpdate => 11,
            MessageKind::WorldChunk => 12,
        }
    }

    pub fn from_u16(value: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_u16() == value)
    }

    /// Channel policy: frequent, loss-tolerant kinds ride the unreliable
    /// channel; everything order-dependent is reliable.
    pub fn channel(self) -> Channel {
        match self {
            MessageKind::Ping | MessageKind::PlayerLocation | MessageKind::EntityUpdate => {
                Channel::Unreliable
            }
            _ => Channel::Reliable,
        }
    }
}
