use snapwire_serde::{ByteReader, ByteWriter, Serde, SerdeErr, MAX_PREFIXED_LEN};

use crate::{ComponentKind, EntityHandle};

/// One encoded component inside a [`SnapshotRecord`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentPayload {
    pub kind: ComponentKind,
    pub bytes: Vec<u8>,
}

impl ComponentPayload {
    pub fn new(kind: ComponentKind, bytes: Vec<u8>) -> Self {
        Self { kind, bytes }
    }
}

/// Serialized form of one entity: its identity plus (kind, payload) pairs
/// in canonical schema order.
///
/// Wire layout: `[slot u32][generation u32][count u16]` followed by `count`
/// entries of `[kind u16][len u32][bytes]`. Kind 0 never appears.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SnapshotRecord {
    pub entity: EntityHandle,
    pub components: Vec<ComponentPayload>,
}

impl SnapshotRecord {
    pub fn new(entity: EntityHandle) -> Self {
        Self {
            entity,
            components: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        self.components.iter().map(|payload| payload.kind)
    }

    pub fn payload(&self, kind: ComponentKind) -> Option<&[u8]> {
        self.components
            .iter()
            .find(|payload| payload.kind == kind)
            .map(|payload| payload.bytes.as_slice())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(self.byte_length());
        self.ser(&mut writer);
        writer.to_bytes()
    }

    /// Parses a record that must span all of `bytes`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SerdeErr> {
        let mut reader = ByteReader::new(bytes);
        let record = Self::de(&mut reader)?;
        reader.finish()?;
        Ok(record)
    }
}

impl Serde for SnapshotRecord {
    fn ser(&self, writer: &mut ByteWriter) {
        self.entity.ser(writer);
        // the codec never builds more entries than the schema has ids
        let count = u16::try_from(self.components.len()).unwrap_or(u16::MAX);
        count.ser(writer);
        for payload in self.components.iter().take(usize::from(count)) {
            payload.kind.ser(writer);
            // the codec refuses payloads above MAX_PREFIXED_LEN, which fits in a u32
            debug_assert!(payload.bytes.len() <= MAX_PREFIXED_LEN as usize);
            let len = u32::try_from(payload.bytes.len()).unwrap_or(u32::MAX);
            len.ser(writer);
            writer.write_bytes(&payload.bytes);
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let entity = EntityHandle::de(reader)?;
        let count = u16::de(reader)?;
        let mut components = Vec::with_capacity(usize::from(count).min(reader.remaining() / 6));
        for _ in 0..count {
            let kind = ComponentKind::de(reader)?;
            let len = reader.read_len_prefix(1)?;
            let bytes = reader.read_bytes(len)?.to_vec();
            components.push(ComponentPayload { kind, bytes });
        }
        Ok(Self { entity, components })
    }

    fn byte_length(&self) -> usize {
        8 + 2
            + self
                .components
                .iter()
                .map(|payload| 2 + 4 + payload.bytes.len())
                .sum::<usize>()
    }
}
