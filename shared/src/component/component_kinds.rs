use std::{
    any::{Any, TypeId},
    collections::HashMap,
    marker::PhantomData,
};

use log::warn;

use snapwire_serde::{ByteReader, ByteWriter, SerdeErr};

use crate::component::{
    component_kind::ComponentKind,
    error::{ComponentError, SchemaError},
    fingerprint::schema_fingerprint,
    replicate::Replicate,
};

/// Type-erased encode/decode for one registered component type
pub(crate) trait ComponentCodec: Send + Sync {
    fn write(
        &self,
        kind: ComponentKind,
        name: &'static str,
        component: &dyn Any,
        writer: &mut ByteWriter,
    ) -> Result<(), ComponentError>;

    fn read(&self, reader: &mut ByteReader) -> Result<Box<dyn Any + Send>, SerdeErr>;
}

struct ReplicateCodec<C: Replicate> {
    phantom: PhantomData<fn() -> C>,
}

impl<C: Replicate> ComponentCodec for ReplicateCodec<C> {
    fn write(
        &self,
        kind: ComponentKind,
        name: &'static str,
        component: &dyn Any,
        writer: &mut ByteWriter,
    ) -> Result<(), ComponentError> {
        let Some(component) = component.downcast_ref::<C>() else {
            return Err(ComponentError::TypeMismatch { kind, name });
        };
        component.ser(writer);
        Ok(())
    }

    fn read(&self, reader: &mut ByteReader) -> Result<Box<dyn Any + Send>, SerdeErr> {
        let component = C::de(reader)?;
        Ok(Box::new(component))
    }
}

/// One row of the schema table
pub struct ComponentEntry {
    kind: ComponentKind,
    name: &'static str,
    type_id: TypeId,
    codec: Box<dyn ComponentCodec>,
}

impl ComponentEntry {
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub(crate) fn codec(&self) -> &dyn ComponentCodec {
        self.codec.as_ref()
    }
}

/// The ordered, append-only list of snapshot-eligible components.
///
/// A single table drives id assignment, the fingerprint and codec dispatch.
pub struct ComponentKinds {
    entries: Vec<ComponentEntry>,
    type_to_kind: HashMap<TypeId, ComponentKind>,
    fingerprint: u64,
    locked: bool,
}

impl Default for ComponentKinds {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentKinds {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            type_to_kind: HashMap::new(),
            fingerprint: schema_fingerprint(&[]),
            locked: false,
        }
    }

    /// Appends `C` to the tail of the schema. Panics on duplicates or when
    /// locked, see [`ComponentKinds::try_add_component`].
    pub fn add_component<C: Replicate>(&mut self) -> &mut Self {
        if let Err(err) = self.try_add_component::<C>() {
            panic!("{}", err);
        }
        self
    }

    pub fn try_add_component<C: Replicate>(&mut self) -> Result<ComponentKind, SchemaError> {
        if self.locked {
            return Err(SchemaError::Locked);
        }

        let type_id = TypeId::of::<C>();
        if self.type_to_kind.contains_key(&type_id)
            || self.entries.iter().any(|entry| entry.name == C::NAME)
        {
            return Err(SchemaError::DuplicateComponent { name: C::NAME });
        }

        let count = self.entries.len();
        let Ok(next_id) = u16::try_from(count + 1) else {
            return Err(SchemaError::Exhausted { count });
        };
        let kind = ComponentKind::from_u16(next_id);

        self.entries.push(ComponentEntry {
            kind,
            name: C::NAME,
            type_id,
            codec: Box::new(ReplicateCodec::<C> {
                phantom: PhantomData,
            }),
        });
        self.type_to_kind.insert(type_id, kind);
        self.fingerprint = schema_fingerprint(&self.names());

        Ok(kind)
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Component names in canonical order
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.name).collect()
    }

    /// Entries in canonical order
    pub fn iter(&self) -> impl Iterator<Item = &ComponentEntry> {
        self.entries.iter()
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Refuses to interoperate with a peer or file built from another list
    pub fn verify(&self, expected: u64) -> Result<(), SchemaError> {
        if expected == self.fingerprint {
            Ok(())
        } else {
            warn!(
                "Schema fingerprint mismatch: local {:#018x}, remote {:#018x}",
                self.fingerprint, expected
            );
            Err(SchemaError::FormatIncompatible {
                expected: self.fingerprint,
                found: expected,
            })
        }
    }

    pub fn kind_of<C: Replicate>(&self) -> Option<ComponentKind> {
        self.type_to_kind.get(&TypeId::of::<C>()).copied()
    }

    pub fn kind_for_type_id(&self, type_id: &TypeId) -> Option<ComponentKind> {
        self.type_to_kind.get(type_id).copied()
    }

    pub fn entry(&self, kind: ComponentKind) -> Option<&ComponentEntry> {
        self.entries.get(kind.table_index()?)
    }

    pub fn kind_to_name(&self, kind: ComponentKind) -> Option<&'static str> {
        self.entry(kind).map(|entry| entry.name)
    }
}
