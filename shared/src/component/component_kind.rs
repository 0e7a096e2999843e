use std::fmt;

use snapwire_serde::{ByteReader, ByteWriter, ConstByteLength, Serde, SerdeErr};

/// Stable numeric identifier of a snapshot-eligible component type.
///
/// Identifiers are handed out in registration order starting at 1. Zero is
/// reserved as `INVALID` and never appears in a transmitted record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentKind(u16);

impl ComponentKind {
    pub const INVALID: ComponentKind = ComponentKind(0);

    pub const fn from_u16(value: u16) -> Self {
        Self(value)
    }

    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    pub const fn is_valid(&self) -> bool {
        self.0 != 0
    }

    /// Position of this kind in the ordered schema table
    pub(crate) fn table_index(&self) -> Option<usize> {
        if self.is_valid() {
            Some(usize::from(self.0) - 1)
        } else {
            None
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl Serde for ComponentKind {
    fn ser(&self, writer: &mut ByteWriter) {
        self.0.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let value = u16::de(reader)?;
        if value == 0 {
            return Err(SerdeErr::InvalidTag {
                type_name: "ComponentKind",
                tag: 0,
            });
        }
        Ok(Self(value))
    }

    fn byte_length(&self) -> usize {
        2
    }
}

impl ConstByteLength for ComponentKind {
    fn const_byte_length() -> usize {
        2
    }
}
