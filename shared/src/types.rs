use std::fmt;

use snapwire_serde::{ByteReader, ByteWriter, ConstByteLength, Serde, SerdeErr};

/// Count of fixed simulation steps since the server started
pub type Tick = u64;

/// Random 64-bit identifier a client picks for each connect attempt
pub type SessionId = u64;

/// Small integer slot a server assigns to each connected client
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerIndex(u16);

impl PeerIndex {
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    pub fn as_usize(&self) -> usize {
        usize::from(self.0)
    }

    pub(crate) fn from_usize(index: usize) -> Option<Self> {
        u16::try_from(index).ok().map(Self)
    }
}

impl fmt::Display for PeerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer {}", self.0)
    }
}

impl Serde for PeerIndex {
    fn ser(&self, writer: &mut ByteWriter) {
        self.0.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self(u16::de(reader)?))
    }

    fn byte_length(&self) -> usize {
        2
    }
}

impl ConstByteLength for PeerIndex {
    fn const_byte_length() -> usize {
        2
    }
}
