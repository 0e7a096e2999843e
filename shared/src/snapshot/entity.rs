use std::{
    any::{Any, TypeId},
    fmt,
};

use snapwire_serde::{ByteReader, ByteWriter, ConstByteLength, Serde, SerdeErr};

/// Logical identity of an entity: storage slot plus a generation counter
/// so a recycled slot is never confused with its previous occupant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle {
    pub slot: u32,
    pub generation: u32,
}

impl EntityHandle {
    pub const fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.slot, self.generation)
    }
}

impl Serde for EntityHandle {
    fn ser(&self, writer: &mut ByteWriter) {
        self.slot.ser(writer);
        self.generation.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let slot = u32::de(reader)?;
        let generation = u32::de(reader)?;
        Ok(Self { slot, generation })
    }

    fn byte_length(&self) -> usize {
        Self::const_byte_length()
    }
}

impl ConstByteLength for EntityHandle {
    fn const_byte_length() -> usize {
        8
    }
}

/// Read access the codec needs from the host's entity storage
pub trait EntityView {
    fn handle(&self) -> EntityHandle;

    /// The component stored under `type_id`, if the entity carries one
    fn component_by_type(&self, type_id: TypeId) -> Option<&dyn Any>;
}

/// Write access used when applying a decoded record
pub trait EntityMut: EntityView {
    /// Inserts or overwrites the component stored under `type_id`
    fn insert_component_boxed(&mut self, type_id: TypeId, component: Box<dyn Any + Send>);
}
