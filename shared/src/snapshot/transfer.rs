use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};

use snapwire_serde::{ByteReader, ByteWriter, Serde, SerdeErr};

use crate::TransferError;

/// Default payload size of one world chunk
pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

/// Upper bound on a reassembled world
pub const MAX_WORLD_SIZE: u32 = 32 * 1024 * 1024;

/// One piece of a chunked world transfer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorldChunk {
    Begin { snapshot_id: u32, total_size: u32 },
    Chunk { snapshot_id: u32, offset: u32, data: Vec<u8> },
    End { snapshot_id: u32 },
}

impl WorldChunk {
    pub fn snapshot_id(&self) -> u32 {
        match self {
            Self::Begin { snapshot_id, .. }
            | Self::Chunk { snapshot_id, .. }
            | Self::End { snapshot_id } => *snapshot_id,
        }
    }
}

impl Serde for WorldChunk {
    fn ser(&self, writer: &mut ByteWriter) {
        match self {
            Self::Begin {
                snapshot_id,
                total_size,
            } => {
                0u8.ser(writer);
                snapshot_id.ser(writer);
                total_size.ser(writer);
            }
            Self::Chunk {
                snapshot_id,
                offset,
                data,
            } => {
                1u8.ser(writer);
                snapshot_id.ser(writer);
                offset.ser(writer);
                data.ser(writer);
            }
            Self::End { snapshot_id } => {
                2u8.ser(writer);
                snapshot_id.ser(writer);
            }
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        match u8::de(reader)? {
            0 => Ok(Self::Begin {
                snapshot_id: u32::de(reader)?,
                total_size: u32::de(reader)?,
            }),
            1 => Ok(Self::Chunk {
                snapshot_id: u32::de(reader)?,
                offset: u32::de(reader)?,
                data: Vec::<u8>::de(reader)?,
            }),
            2 => Ok(Self::End {
                snapshot_id: u32::de(reader)?,
            }),
            tag => Err(SerdeErr::InvalidTag {
                type_name: "WorldChunk",
                tag: u32::from(tag),
            }),
        }
    }

    fn byte_length(&self) -> usize {
        match self {
            Self::Begin { .. } => 1 + 4 + 4,
            Self::Chunk { data, .. } => 1 + 4 + 4 + data.byte_length(),
            Self::End { .. } => 1 + 4,
        }
    }
}

/// Splits `bytes` into a `Begin`, one `Chunk` per `chunk_size` bytes and an
/// `End`. A zero chunk size falls back to [`DEFAULT_CHUNK_SIZE`].
pub fn split_world(
    snapshot_id: u32,
    bytes: &[u8],
    chunk_size: usize,
) -> Result<Vec<WorldChunk>, TransferError> {
    let too_large = TransferError::TooLarge {
        total_size: u32::try_from(bytes.len()).unwrap_or(u32::MAX),
        max: MAX_WORLD_SIZE,
    };
    let total_size = u32::try_from(bytes.len())
        .ok()
        .filter(|size| *size <= MAX_WORLD_SIZE)
        .ok_or_else(|| too_large.clone())?;
    let chunk_size = if chunk_size == 0 {
        DEFAULT_CHUNK_SIZE
    } else {
        chunk_size
    };

    let mut chunks = Vec::with_capacity(bytes.len() / chunk_size + 3);
    chunks.push(WorldChunk::Begin {
        snapshot_id,
        total_size,
    });
    for (index, data) in bytes.chunks(chunk_size).enumerate() {
        let offset = u32::try_from(index * chunk_size).map_err(|_| too_large.clone())?;
        chunks.push(WorldChunk::Chunk {
            snapshot_id,
            offset,
            data: data.to_vec(),
        });
    }
    chunks.push(WorldChunk::End { snapshot_id });
    Ok(chunks)
}

/// Transfers reassembled at the same time. Starting one more evicts the
/// oldest.
pub const MAX_PENDING_TRANSFERS: usize = 4;

struct PendingWorld {
    total_size: u32,
    started: u64,
    // keyed by offset, ranges never overlap
    pieces: BTreeMap<u32, Vec<u8>>,
    received: u32,
}

impl PendingWorld {
    fn overlaps(&self, start: u32, end: u32) -> bool {
        let before = self
            .pieces
            .range(..=start)
            .next_back()
            .map(|(offset, data)| u64::from(*offset) + data.len() as u64 > u64::from(start))
            .unwrap_or(false);
        let after = self
            .pieces
            .range(start..)
            .next()
            .map(|(offset, _)| *offset < end)
            .unwrap_or(false);
        before || after
    }

    fn into_bytes(self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.total_size as usize);
        for data in self.pieces.into_values() {
            buffer.extend_from_slice(&data);
        }
        buffer
    }
}

/// Reassembles chunked world transfers, keyed by snapshot id.
///
/// Memory grows with the bytes actually received, never with the size a
/// `Begin` announces.
#[derive(Default)]
pub struct ChunkAssembler {
    pending: HashMap<u32, PendingWorld>,
    next_started: u64,
}

impl ChunkAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_progress(&self) -> usize {
        self.pending.len()
    }

    /// Feeds one chunk. Returns the complete world bytes on `End`.
    ///
    /// Any error discards the transfer it belongs to.
    pub fn receive(&mut self, chunk: WorldChunk) -> Result<Option<Vec<u8>>, TransferError> {
        match chunk {
            WorldChunk::Begin {
                snapshot_id,
                total_size,
            } => {
                if total_size > MAX_WORLD_SIZE {
                    return Err(TransferError::TooLarge {
                        total_size,
                        max: MAX_WORLD_SIZE,
                    });
                }
                if self.pending.remove(&snapshot_id).is_some() {
                    return Err(TransferError::AlreadyStarted { snapshot_id });
                }
                if self.pending.len() >= MAX_PENDING_TRANSFERS {
                    self.evict_oldest();
                }
                debug!("World transfer {} started: {} bytes", snapshot_id, total_size);
                let started = self.next_started;
                self.next_started += 1;
                self.pending.insert(
                    snapshot_id,
                    PendingWorld {
                        total_size,
                        started,
                        pieces: BTreeMap::new(),
                        received: 0,
                    },
                );
                Ok(None)
            }
            WorldChunk::Chunk {
                snapshot_id,
                offset,
                data,
            } => {
                let Some(pending) = self.pending.get_mut(&snapshot_id) else {
                    return Err(TransferError::UnknownTransfer { snapshot_id });
                };
                let total_size = pending.total_size;
                let end = u32::try_from(data.len())
                    .ok()
                    .and_then(|len| offset.checked_add(len))
                    .filter(|end| *end <= total_size);
                let Some(end) = end else {
                    self.pending.remove(&snapshot_id);
                    return Err(TransferError::OutOfRange {
                        snapshot_id,
                        offset,
                        len: data.len(),
                        total_size,
                    });
                };
                if data.is_empty() {
                    return Ok(None);
                }
                if pending.overlaps(offset, end) {
                    self.pending.remove(&snapshot_id);
                    return Err(TransferError::Overlap {
                        snapshot_id,
                        offset,
                        len: data.len(),
                    });
                }
                pending.received += end - offset;
                pending.pieces.insert(offset, data);
                Ok(None)
            }
            WorldChunk::End { snapshot_id } => {
                let Some(pending) = self.pending.remove(&snapshot_id) else {
                    return Err(TransferError::UnknownTransfer { snapshot_id });
                };
                // pieces are in range and disjoint, so a full count means full coverage
                if pending.received != pending.total_size {
                    return Err(TransferError::Incomplete {
                        snapshot_id,
                        received: pending.received,
                        total_size: pending.total_size,
                    });
                }
                debug!("World transfer {} complete", snapshot_id);
                Ok(Some(pending.into_bytes()))
            }
        }
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .pending
            .iter()
            .min_by_key(|(_, pending)| pending.started)
            .map(|(id, _)| *id);
        if let Some(id) = oldest {
            warn!(
                "Dropping unfinished world transfer {}: more than {} in progress",
                id, MAX_PENDING_TRANSFERS
            );
            self.pending.remove(&id);
        }
    }
}
