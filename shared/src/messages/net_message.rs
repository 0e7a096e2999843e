use snapwire_serde::{ByteReader, ByteWriter, Serde, SerdeErr};

use crate::{
    Channel, GameState, MenuState, MessageError, MessageKind, PeerIndex, SessionId,
    SnapshotRecord, WorldChunk,
};

/// Severity of a text announcement shown to players
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnnouncementKind {
    #[default]
    Message,
    Warning,
    Error,
}

impl Serde for AnnouncementKind {
    fn ser(&self, writer: &mut ByteWriter) {
        let tag: u8 = match self {
            AnnouncementKind::Message => 0,
            AnnouncementKind::Warning => 1,
            AnnouncementKind::Error => 2,
        };
        tag.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        match u8::de(reader)? {
            0 => Ok(AnnouncementKind::Message),
            1 => Ok(AnnouncementKind::Warning),
            2 => Ok(AnnouncementKind::Error),
            tag => Err(SerdeErr::InvalidTag {
                type_name: "AnnouncementKind",
                tag: u32::from(tag),
            }),
        }
    }

    fn byte_length(&self) -> usize {
        1
    }
}

/// Every message the sync core exchanges.
///
/// A frame is `[kind u16][body]` and must be consumed exactly.
#[derive(Clone, Debug, PartialEq)]
pub enum NetMessage {
    Hello {
        fingerprint: u64,
        session_id: SessionId,
    },
    Welcome {
        peer: PeerIndex,
        fingerprint: u64,
    },
    Reject {
        expected: u64,
        found: u64,
    },
    Ping {
        ping: i64,
        pong: i64,
    },
    Test {
        data: i32,
    },
    Announcement {
        message: String,
        kind: AnnouncementKind,
    },
    GameState {
        menu: MenuState,
        game: GameState,
    },
    PlayerJoin {
        all_peers: Vec<PeerIndex>,
        peer: PeerIndex,
        fingerprint: u64,
        is_you: bool,
        username: String,
    },
    PlayerLeave {
        all_peers: Vec<PeerIndex>,
        peer: PeerIndex,
    },
    PlayerLocation {
        peer: PeerIndex,
        location: [f32; 3],
        facing: f32,
        username: String,
    },
    EntitySnapshot(SnapshotRecord),
    EntityUpdate(SnapshotRecord),
    WorldChunk(WorldChunk),
}

impl NetMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            NetMessage::Hello { .. } => MessageKind::Hello,
            NetMessage::Welcome { .. } => MessageKind::Welcome,
            NetMessage::Reject { .. } => MessageKind::Reject,
            NetMessage::Ping { .. } => MessageKind::Ping,
            NetMessage::Test { .. } => MessageKind::Test,
            NetMessage::Announcement { .. } => MessageKind::Announcement,
            NetMessage::GameState { .. } => MessageKind::GameState,
            NetMessage::PlayerJoin { .. } => MessageKind::PlayerJoin,
            NetMessage::PlayerLeave { .. } => MessageKind::PlayerLeave,
            NetMessage::PlayerLocation { .. } => MessageKind::PlayerLocation,
            NetMessage::EntitySnapshot(_) => MessageKind::EntitySnapshot,
            NetMessage::EntityUpdate(_) => MessageKind::EntityUpdate,
            NetMessage::WorldChunk(_) => MessageKind::WorldChunk,
        }
    }

    pub fn channel(&self) -> Channel {
        self.kind().channel()
    }

    /// Appends the full frame to `writer`
    pub fn write(&self, writer: &mut ByteWriter) {
        self.kind().as_u16().ser(writer);
        match self {
            NetMessage::Hello {
                fingerprint,
                session_id,
            } => {
                fingerprint.ser(writer);
                session_id.ser(writer);
            }
            NetMessage::Welcome { peer, fingerprint } => {
                peer.ser(writer);
                fingerprint.ser(writer);
            }
            NetMessage::Reject { expected, found } => {
                expected.ser(writer);
                found.ser(writer);
            }
            NetMessage::Ping { ping, pong } => {
                ping.ser(writer);
                pong.ser(writer);
            }
            NetMessage::Test { data } => {
                data.ser(writer);
            }
            NetMessage::Announcement { message, kind } => {
                message.ser(writer);
                kind.ser(writer);
            }
            NetMessage::GameState { menu, game } => {
                menu.ser(writer);
                game.ser(writer);
            }
            NetMessage::PlayerJoin {
                all_peers,
                peer,
                fingerprint,
                is_you,
                username,
            } => {
                all_peers.ser(writer);
                peer.ser(writer);
                fingerprint.ser(writer);
                is_you.ser(writer);
                username.ser(writer);
            }
            NetMessage::PlayerLeave { all_peers, peer } => {
                all_peers.ser(writer);
                peer.ser(writer);
            }
            NetMessage::PlayerLocation {
                peer,
                location,
                facing,
                username,
            } => {
                peer.ser(writer);
                location.ser(writer);
                facing.ser(writer);
                username.ser(writer);
            }
            NetMessage::EntitySnapshot(record) | NetMessage::EntityUpdate(record) => {
                record.ser(writer);
            }
            NetMessage::WorldChunk(chunk) => {
                chunk.ser(writer);
            }
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        self.write(&mut writer);
        writer.to_bytes()
    }

    /// Reads the kind first so an unknown discriminant is reported as such,
    /// never as a malformed body.
    pub fn read(frame: &[u8]) -> Result<Self, MessageError> {
        let mut reader = ByteReader::new(frame);
        let raw_kind =
            u16::de(&mut reader).map_err(|_| MessageError::Truncated { len: frame.len() })?;
        let Some(kind) = MessageKind::from_u16(raw_kind) else {
            return Err(MessageError::UnknownKind(raw_kind));
        };
        Self::read_body(kind, &mut reader)
            .and_then(|message| reader.finish().map(|_| message))
            .map_err(|source| MessageError::Malformed { kind, source })
    }

    fn read_body(kind: MessageKind, reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let message = match kind {
            MessageKind::Hello => NetMessage::Hello {
                fingerprint: u64::de(reader)?,
                session_id: SessionId::de(reader)?,
            },
            MessageKind::Welcome => NetMessage::Welcome {
                peer: PeerIndex::de(reader)?,
                fingerprint: u64::de(reader)?,
            },
            MessageKind::Reject => NetMessage::Reject {
                expected: u64::de(reader)?,
                found: u64::de(reader)?,
            },
            MessageKind::Ping => NetMessage::Ping {
                ping: i64::de(reader)?,
                pong: i64::de(reader)?,
            },
            MessageKind::Test => NetMessage::Test {
                data: i32::de(reader)?,
            },
            MessageKind::Announcement => NetMessage::Announcement {
                message: String::de(reader)?,
                kind: AnnouncementKind::de(reader)?,
            },
            MessageKind::GameState => NetMessage::GameState {
                menu: MenuState::de(reader)?,
                game: GameState::de(reader)?,
            },
            MessageKind::PlayerJoin => NetMessage::PlayerJoin {
                all_peers: Vec::<PeerIndex>::de(reader)?,
                peer: PeerIndex::de(reader)?,
                fingerprint: u64::de(reader)?,
                is_you: bool::de(reader)?,
                username: String::de(reader)?,
            },
            MessageKind::PlayerLeave => NetMessage::PlayerLeave {
                all_peers: Vec::<PeerIndex>::de(reader)?,
                peer: PeerIndex::de(reader)?,
            },
            MessageKind::PlayerLocation => NetMessage::PlayerLocation {
                peer: PeerIndex::de(reader)?,
                location: <[f32; 3]>::de(reader)?,
                facing: f32::de(reader)?,
                username: String::de(reader)?,
            },
            MessageKind::EntitySnapshot => NetMessage::EntitySnapshot(SnapshotRecord::de(reader)?),
            MessageKind::EntityUpdate => NetMessage::EntityUpdate(SnapshotRecord::de(reader)?),
            MessageKind::WorldChunk => NetMessage::WorldChunk(WorldChunk::de(reader)?),
        };
        Ok(message)
    }
}
