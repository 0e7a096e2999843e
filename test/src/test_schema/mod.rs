//! Components used across the integration tests, shaped like the ones a
//! game built on snapwire would register.

use snapwire_shared::{
    ByteReader, ByteWriter, ComponentKinds, IngredientSet, Replicate, Serde, SerdeErr,
};

#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    pub position: [f32; 3],
    pub facing: f32,
}

impl Transform {
    pub fn new(x: f32, y: f32, z: f32, facing: f32) -> Self {
        Self {
            position: [x, y, z],
            facing,
        }
    }
}

impl Serde for Transform {
    fn ser(&self, writer: &mut ByteWriter) {
        self.position.ser(writer);
        self.facing.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            position: <[f32; 3]>::de(reader)?,
            facing: f32::de(reader)?,
        })
    }

    fn byte_length(&self) -> usize {
        self.position.byte_length() + self.facing.byte_length()
    }
}

impl Replicate for Transform {
    const NAME: &'static str = "Transform";
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HasName {
    pub name: String,
}

impl HasName {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Serde for HasName {
    fn ser(&self, writer: &mut ByteWriter) {
        self.name.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            name: String::de(reader)?,
        })
    }

    fn byte_length(&self) -> usize {
        self.name.byte_length()
    }
}

impl Replicate for HasName {
    const NAME: &'static str = "HasName";
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HasSubtype {
    pub index: i32,
}

impl Serde for HasSubtype {
    fn ser(&self, writer: &mut ByteWriter) {
        self.index.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            index: i32::de(reader)?,
        })
    }

    fn byte_length(&self) -> usize {
        self.index.byte_length()
    }
}

impl Replicate for HasSubtype {
    const NAME: &'static str = "HasSubtype";
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IsDrink {
    pub ingredients: IngredientSet,
    pub underlying: Option<String>,
}

impl Serde for IsDrink {
    fn ser(&self, writer: &mut ByteWriter) {
        self.ingredients.ser(writer);
        self.underlying.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            ingredients: IngredientSet::de(reader)?,
            underlying: Option::<String>::de(reader)?,
        })
    }

    fn byte_length(&self) -> usize {
        self.ingredients.byte_length() + self.underlying.byte_length()
    }
}

impl Replicate for IsDrink {
    const NAME: &'static str = "IsDrink";
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanHoldItem {
    pub held: Option<u32>,
    pub filter_locked: bool,
}

impl Serde for CanHoldItem {
    fn ser(&self, writer: &mut ByteWriter) {
        self.held.ser(writer);
        self.filter_locked.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            held: Option::<u32>::de(reader)?,
            filter_locked: bool::de(reader)?,
        })
    }

    fn byte_length(&self) -> usize {
        self.held.byte_length() + self.filter_locked.byte_length()
    }
}

impl Replicate for CanHoldItem {
    const NAME: &'static str = "CanHoldItem";
}

/// Registration order every test build agrees on
pub const SCHEMA_NAMES: [&str; 5] = [
    Transform::NAME,
    HasName::NAME,
    HasSubtype::NAME,
    IsDrink::NAME,
    CanHoldItem::NAME,
];

pub fn schema() -> ComponentKinds {
    let mut kinds = ComponentKinds::new();
    kinds
        .add_component::<Transform>()
        .add_component::<HasName>()
        .add_component::<HasSubtype>()
        .add_component::<IsDrink>()
        .add_component::<CanHoldItem>();
    kinds.lock();
    kinds
}

/// An older build that has not learned about `CanHoldItem` yet
pub fn older_schema() -> ComponentKinds {
    let mut kinds = ComponentKinds::new();
    kinds
        .add_component::<Transform>()
        .add_component::<HasName>()
        .add_component::<HasSubtype>()
        .add_component::<IsDrink>();
    kinds.lock();
    kinds
}
