use thiserror::Error;

use snapwire_serde::SerdeErr;

use crate::{ComponentError, ComponentKind, EntityHandle, SchemaError};

/// Errors raised while encoding, decoding or persisting snapshots
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// The record or archive bytes are structurally invalid
    #[error("Malformed snapshot data: {0}")]
    Malformed(#[from] SerdeErr),

    /// A payload for a locally known kind failed to decode
    #[error("Payload for component {kind} (`{name}`) on entity {entity} failed to decode: {source}. The record was not applied")]
    PayloadInvalid {
        entity: EntityHandle,
        kind: ComponentKind,
        name: &'static str,
        source: SerdeErr,
    },

    /// The same kind appears twice in one record
    #[error("Component {kind} appears more than once in the snapshot of entity {entity}")]
    DuplicateKind {
        entity: EntityHandle,
        kind: ComponentKind,
    },

    /// The record holds more components than the count prefix can express
    #[error("Entity {entity} carries {count} snapshot components, more than a record can hold")]
    TooManyComponents { entity: EntityHandle, count: usize },

    /// A component encoded to more bytes than a length prefix may announce
    #[error("Component {kind} on entity {entity} encoded to {len} bytes, over the {max} byte payload limit")]
    PayloadTooLarge {
        entity: EntityHandle,
        kind: ComponentKind,
        len: usize,
        max: u32,
    },

    #[error(transparent)]
    Component(#[from] ComponentError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The archive header does not carry the expected magic bytes
    #[error("Not a snapshot archive: bad magic bytes {found:?}")]
    BadMagic { found: [u8; 4] },

    /// The archive was written by an unknown container version
    #[error("Unsupported snapshot archive version {found}, this build reads version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// Errors raised while reassembling a chunked world transfer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("Received a chunk for world transfer {snapshot_id}, which was never started")]
    UnknownTransfer { snapshot_id: u32 },

    #[error("World transfer {snapshot_id} was started twice")]
    AlreadyStarted { snapshot_id: u32 },

    #[error("Chunk at offset {offset} with {len} bytes overflows world transfer {snapshot_id} of {total_size} bytes")]
    OutOfRange {
        snapshot_id: u32,
        offset: u32,
        len: usize,
        total_size: u32,
    },

    #[error("Chunk at offset {offset} with {len} bytes overlaps data already received for world transfer {snapshot_id}")]
    Overlap {
        snapshot_id: u32,
        offset: u32,
        len: usize,
    },

    #[error("World transfer {snapshot_id} ended with {received} of {total_size} bytes received")]
    Incomplete {
        snapshot_id: u32,
        received: u32,
        total_size: u32,
    },

    #[error("World transfer of {total_size} bytes exceeds the limit of {max} bytes")]
    TooLarge { total_size: u32, max: u32 },
}
