use std::{
    any::{Any, TypeId},
    collections::HashSet,
    sync::Arc,
};

use log::{debug, warn};

use snapwire_serde::{ByteReader, ByteWriter, MAX_PREFIXED_LEN};

use crate::{
    ComponentKind, ComponentKinds, ComponentPayload, EntityHandle, EntityMut, EntityView,
    Replicate, SnapshotError, SnapshotRecord,
};

/// A component value decoded from a record, not yet applied
pub struct DecodedComponent {
    kind: ComponentKind,
    name: &'static str,
    type_id: TypeId,
    value: Box<dyn Any + Send>,
}

impl DecodedComponent {
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn downcast_ref<C: Replicate>(&self) -> Option<&C> {
        self.value.downcast_ref::<C>()
    }
}

/// Every component a record will write, decoded in full before anything is
/// applied to the target entity.
pub struct MutationPlan {
    pub entity: EntityHandle,
    pub components: Vec<DecodedComponent>,
    /// Kinds present in the record but missing from the local schema
    pub skipped: Vec<ComponentKind>,
}

impl MutationPlan {
    pub fn apply<E: EntityMut + ?Sized>(self, target: &mut E) -> DecodeReport {
        let mut applied = Vec::with_capacity(self.components.len());
        for component in self.components {
            applied.push(component.kind);
            target.insert_component_boxed(component.type_id, component.value);
        }
        DecodeReport {
            entity: self.entity,
            applied,
            skipped: self.skipped,
        }
    }
}

/// Outcome of a successful decode
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeReport {
    pub entity: EntityHandle,
    pub applied: Vec<ComponentKind>,
    pub skipped: Vec<ComponentKind>,
}

/// Encodes entities into [`SnapshotRecord`]s and applies records back onto
/// entities, dispatching through the schema table.
pub struct SnapshotCodec {
    kinds: Arc<ComponentKinds>,
    reported_unknown: HashSet<ComponentKind>,
}

impl SnapshotCodec {
    pub fn new(kinds: Arc<ComponentKinds>) -> Self {
        Self {
            kinds,
            reported_unknown: HashSet::new(),
        }
    }

    pub fn kinds(&self) -> &ComponentKinds {
        &self.kinds
    }

    pub fn fingerprint(&self) -> u64 {
        self.kinds.fingerprint()
    }

    /// Number of distinct unknown kinds seen so far
    pub fn unknown_kinds_seen(&self) -> usize {
        self.reported_unknown.len()
    }

    /// Emits one pair per schema component the entity carries, in schema
    /// order. An entity with none of them yields an empty record.
    pub fn encode<E: EntityView + ?Sized>(&self, entity: &E) -> Result<SnapshotRecord, SnapshotError> {
        let mut record = SnapshotRecord::new(entity.handle());
        let mut writer = ByteWriter::new();

        for entry in self.kinds.iter() {
            let Some(component) = entity.component_by_type(entry.type_id()) else {
                continue;
            };
            entry
                .codec()
                .write(entry.kind(), entry.name(), component, &mut writer)?;
            let bytes = std::mem::take(&mut writer).to_bytes();
            if bytes.len() > MAX_PREFIXED_LEN as usize {
                return Err(SnapshotError::PayloadTooLarge {
                    entity: record.entity,
                    kind: entry.kind(),
                    len: bytes.len(),
                    max: MAX_PREFIXED_LEN,
                });
            }
            record.components.push(ComponentPayload::new(entry.kind(), bytes));
        }

        if record.components.len() > usize::from(u16::MAX) {
            return Err(SnapshotError::TooManyComponents {
                entity: record.entity,
                count: record.components.len(),
            });
        }

        Ok(record)
    }

    pub fn encode_bytes<E: EntityView + ?Sized>(&self, entity: &E) -> Result<Vec<u8>, SnapshotError> {
        Ok(self.encode(entity)?.to_bytes())
    }

    /// Decodes every known payload of `record`. Unknown kinds are skipped and
    /// reported once per kind. A malformed known payload fails the whole plan.
    pub fn plan(&mut self, record: &SnapshotRecord) -> Result<MutationPlan, SnapshotError> {
        let mut seen = HashSet::with_capacity(record.components.len());
        let mut components = Vec::with_capacity(record.components.len());
        let mut skipped = Vec::new();

        for payload in &record.components {
            if !seen.insert(payload.kind) {
                return Err(SnapshotError::DuplicateKind {
                    entity: record.entity,
                    kind: payload.kind,
                });
            }

            let Some(entry) = self.kinds.entry(payload.kind) else {
                if self.reported_unknown.insert(payload.kind) {
                    warn!(
                        "Skipping component kind {} unknown to the local schema (entity {}). Further occurrences will not be logged",
                        payload.kind, record.entity
                    );
                } else {
                    debug!("Skipping unknown component kind {}", payload.kind);
                }
                skipped.push(payload.kind);
                continue;
            };

            let mut reader = ByteReader::new(&payload.bytes);
            let value = entry
                .codec()
                .read(&mut reader)
                .and_then(|value| reader.finish().map(|_| value))
                .map_err(|source| SnapshotError::PayloadInvalid {
                    entity: record.entity,
                    kind: entry.kind(),
                    name: entry.name(),
                    source,
                })?;

            components.push(DecodedComponent {
                kind: entry.kind(),
                name: entry.name(),
                type_id: entry.type_id(),
                value,
            });
        }

        Ok(MutationPlan {
            entity: record.entity,
            components,
            skipped,
        })
    }

    /// Creates or overwrites each known component on `target`. Either the
    /// whole record applies or the entity is left untouched.
    pub fn decode<E: EntityMut + ?Sized>(
        &mut self,
        record: &SnapshotRecord,
        target: &mut E,
    ) -> Result<DecodeReport, SnapshotError> {
        let plan = self.plan(record)?;
        Ok(plan.apply(target))
    }

    pub fn decode_bytes<E: EntityMut + ?Sized>(
        &mut self,
        bytes: &[u8],
        target: &mut E,
    ) -> Result<DecodeReport, SnapshotError> {
        let record = SnapshotRecord::from_bytes(bytes)?;
        self.decode(&record, target)
    }
}
