use snapwire_serde::{ByteReader, ByteWriter, Serde};

use crate::{ComponentKinds, EntityView, SnapshotCodec, SnapshotError, SnapshotRecord};

pub const ARCHIVE_MAGIC: [u8; 4] = *b"SNAP";
pub const ARCHIVE_VERSION: u32 = 1;

// smallest possible record: handle + count
const MIN_RECORD_LEN: usize = 10;

/// A persisted set of snapshot records (a save file).
///
/// Layout: `[magic "SNAP"][version u32][fingerprint u64][count u32]` then
/// `count` entries of `[len u32][record]`. The fingerprint is checked before
/// any record is parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotArchive {
    fingerprint: u64,
    records: Vec<SnapshotRecord>,
}

impl SnapshotArchive {
    pub fn new(fingerprint: u64) -> Self {
        Self {
            fingerprint,
            records: Vec::new(),
        }
    }

    /// Encodes every entity with `codec` into a new archive
    pub fn capture<'e, E, I>(codec: &SnapshotCodec, entities: I) -> Result<Self, SnapshotError>
    where
        E: EntityView + ?Sized + 'e,
        I: IntoIterator<Item = &'e E>,
    {
        let mut archive = Self::new(codec.fingerprint());
        for entity in entities {
            archive.records.push(codec.encode(entity)?);
        }
        Ok(archive)
    }

    pub fn push(&mut self, record: SnapshotRecord) {
        self.records.push(record);
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn records(&self) -> &[SnapshotRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<SnapshotRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        writer.write_bytes(&ARCHIVE_MAGIC);
        ARCHIVE_VERSION.ser(&mut writer);
        self.fingerprint.ser(&mut writer);
        (self.records.len() as u32).ser(&mut writer);
        for record in &self.records {
            (record.byte_length() as u32).ser(&mut writer);
            record.ser(&mut writer);
        }
        writer.to_bytes()
    }

    /// Reads an archive written by a build with the same schema as `kinds`
    pub fn from_bytes(bytes: &[u8], kinds: &ComponentKinds) -> Result<Self, SnapshotError> {
        let mut reader = ByteReader::new(bytes);

        let magic = reader.read_array::<4>()?;
        if magic != ARCHIVE_MAGIC {
            return Err(SnapshotError::BadMagic { found: magic });
        }
        let version = u32::de(&mut reader)?;
        if version != ARCHIVE_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: version,
                supported: ARCHIVE_VERSION,
            });
        }
        let fingerprint = u64::de(&mut reader)?;
        kinds.verify(fingerprint)?;

        let count = reader.read_len_prefix(4 + MIN_RECORD_LEN)?;
        let mut records = Vec::with_capacity(count);
        for _ in 0..count {
            let len = reader.read_len_prefix(1)?;
            let mut record_reader = reader.sub_reader(len)?;
            let record = SnapshotRecord::de(&mut record_reader)?;
            record_reader.finish()?;
            records.push(record);
        }
        reader.finish()?;

        Ok(Self {
            fingerprint,
            records,
        })
    }
}
