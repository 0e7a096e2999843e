use std::fmt;

use snapwire_serde::{ByteReader, ByteWriter, ConstByteLength, Serde, SerdeErr};

/// Ingredient membership of a drink, one bit per ingredient index
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IngredientSet(u64);

impl IngredientSet {
    pub const EMPTY: IngredientSet = IngredientSet(0);

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u64 {
        self.0
    }

    pub fn with(mut self, index: u8) -> Self {
        self.insert(index);
        self
    }

    /// Indices past 63 are ignored
    pub fn insert(&mut self, index: u8) {
        if let Some(bit) = 1u64.checked_shl(u32::from(index)) {
            self.0 |= bit;
        }
    }

    pub fn contains(&self, index: u8) -> bool {
        1u64.checked_shl(u32::from(index))
            .map(|bit| self.0 & bit != 0)
            .unwrap_or(false)
    }

    pub fn len(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for IngredientSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for index in 0..64u8 {
            if self.contains(index) {
                if !first {
                    write!(f, ", ")?;
                }
                write!(f, "{}", index)?;
                first = false;
            }
        }
        write!(f, "}}")
    }
}

impl Serde for IngredientSet {
    fn ser(&self, writer: &mut ByteWriter) {
        self.0.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self(u64::de(reader)?))
    }

    fn byte_length(&self) -> usize {
        8
    }
}

impl ConstByteLength for IngredientSet {
    fn const_byte_length() -> usize {
        8
    }
}
