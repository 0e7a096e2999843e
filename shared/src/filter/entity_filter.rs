use bitflags::bitflags;
use log::debug;

use snapwire_serde::{ByteReader, ByteWriter, Serde, SerdeErr};

use crate::{FilterError, FilterTarget, IngredientSet};

bitflags! {
    /// Which data a filter compares against
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FilterDatumType: u32 {
        const NAME = 1 << 0;
        const SUBTYPE = 1 << 1;
        const INGREDIENTS = 1 << 2;
    }
}

impl FilterDatumType {
    fn label(&self) -> &'static str {
        if *self == Self::NAME {
            "Name"
        } else if *self == Self::SUBTYPE {
            "Subtype"
        } else if *self == Self::INGREDIENTS {
            "Ingredients"
        } else {
            "Empty"
        }
    }
}

/// How much of a filter the caller wants honoured
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RespectFilter {
    All,
    ReqOnly,
    Ignore,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterStrength {
    #[default]
    Suggestion,
    Requirement,
}

/// A partially specified predicate over entity attributes.
///
/// A datum takes part in matching only when it is both enabled in the mask
/// and holds a value. Subtype values are non-negative: `-1` reads as "no
/// subtype" and leaves the slot unset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntityFilter {
    strength: FilterStrength,
    flags: FilterDatumType,
    name: Option<String>,
    subtype: Option<i32>,
    ingredients: Option<IngredientSet>,
}

impl EntityFilter {
    pub fn new(strength: FilterStrength, flags: FilterDatumType) -> Self {
        Self {
            strength,
            flags,
            ..Default::default()
        }
    }

    pub fn strength(&self) -> FilterStrength {
        self.strength
    }

    pub fn flags(&self) -> FilterDatumType {
        self.flags
    }

    pub fn set_enabled_flags(&mut self, flags: FilterDatumType) -> &mut Self {
        self.flags = flags;
        self
    }

    pub fn set_filter_strength(&mut self, strength: FilterStrength) -> &mut Self {
        self.strength = strength;
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    pub fn set_subtype(&mut self, subtype: i32) -> &mut Self {
        self.subtype = (subtype >= 0).then_some(subtype);
        self
    }

    pub fn set_ingredients(&mut self, ingredients: IngredientSet) -> &mut Self {
        self.ingredients = Some(ingredients);
        self
    }

    /// Empties every value slot. The enabled mask is kept.
    pub fn clear(&mut self) {
        self.name = None;
        self.subtype = None;
        self.ingredients = None;
    }

    pub fn any_flags(&self) -> bool {
        !self.flags.is_empty()
    }

    pub fn no_flags(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn filter_enabled(&self, datum: FilterDatumType) -> bool {
        !datum.is_empty() && self.flags.contains(datum)
    }

    pub fn filter_has_value(&self, datum: FilterDatumType) -> bool {
        !datum.is_empty()
            && datum.iter().all(|single| {
                if single == FilterDatumType::NAME {
                    self.name.is_some()
                } else if single == FilterDatumType::SUBTYPE {
                    self.subtype.is_some()
                } else if single == FilterDatumType::INGREDIENTS {
                    self.ingredients.is_some()
                } else {
                    false
                }
            })
    }

    pub fn filter_enabled_and_set(&self, datum: FilterDatumType) -> bool {
        self.filter_enabled(datum) && self.filter_has_value(datum)
    }

    /// True once every enabled datum holds a value
    pub fn filter_is_set(&self) -> bool {
        self.flags
            .iter()
            .all(|datum| self.filter_has_value(datum))
    }

    pub fn describe_value(&self, datum: FilterDatumType) -> String {
        if datum == FilterDatumType::NAME {
            match &self.name {
                Some(name) => name.clone(),
                None => "no name".to_string(),
            }
        } else if datum == FilterDatumType::SUBTYPE {
            self.subtype.unwrap_or(-1).to_string()
        } else if datum == FilterDatumType::INGREDIENTS {
            match &self.ingredients {
                Some(ingredients) => ingredients.to_string(),
                None => "no ingredient filter".to_string(),
            }
        } else {
            "unset".to_string()
        }
    }

    /// Copies the entity's current values into every enabled slot, building
    /// a "match anything like this one" filter.
    pub fn set_filter_with_entity<T: FilterTarget + ?Sized>(
        &mut self,
        entity: &T,
    ) -> Result<&mut Self, FilterError> {
        if self.filter_enabled(FilterDatumType::NAME) {
            let name = read_name(entity)?.to_string();
            self.name = Some(name);
        }
        if self.filter_enabled(FilterDatumType::SUBTYPE) {
            let subtype = read_subtype(entity);
            self.set_subtype(subtype);
        }
        if self.filter_enabled(FilterDatumType::INGREDIENTS) {
            self.ingredients = Some(read_ingredients(entity));
        }
        Ok(self)
    }

    /// Evaluates every enabled datum that holds a value and requires all of
    /// them to pass.
    pub fn try_matches<T: FilterTarget + ?Sized>(
        &self,
        entity: &T,
        respect: RespectFilter,
    ) -> Result<bool, FilterError> {
        match (respect, self.strength) {
            (RespectFilter::Ignore, _) => return Ok(true),
            (RespectFilter::ReqOnly, FilterStrength::Suggestion) => return Ok(true),
            _ => {}
        }

        let mut pass = true;
        for datum in FilterDatumType::all().iter() {
            if self.filter_enabled_and_set(datum) {
                let datum_pass = self.match_specific_filter(datum, entity)?;
                pass = pass && datum_pass;
            }
        }
        Ok(pass)
    }

    /// Like [`EntityFilter::try_matches`] but a misconfigured filter panics
    /// in debug builds and is logged and treated as a non-match in release.
    pub fn matches<T: FilterTarget + ?Sized>(&self, entity: &T, respect: RespectFilter) -> bool {
        match self.try_matches(entity, respect) {
            Ok(pass) => pass,
            Err(err) => misconfigured_filter(err),
        }
    }

    fn match_specific_filter<T: FilterTarget + ?Sized>(
        &self,
        datum: FilterDatumType,
        entity: &T,
    ) -> Result<bool, FilterError> {
        if datum == FilterDatumType::NAME {
            let name = read_name(entity)?;
            Ok(self.name.as_deref() == Some(name))
        } else if datum == FilterDatumType::SUBTYPE {
            Ok(self.subtype == Some(read_subtype(entity)))
        } else if datum == FilterDatumType::INGREDIENTS {
            Ok(self.ingredients == Some(read_ingredients(entity)))
        } else {
            debug!("Filter datum {} has no matcher", datum.label());
            Ok(false)
        }
    }
}

cfg_if::cfg_if! {
    if #[cfg(debug_assertions)] {
        fn misconfigured_filter(err: FilterError) -> bool {
            panic!("{}", err);
        }
    } else {
        fn misconfigured_filter(err: FilterError) -> bool {
            log::error!("{}", err);
            false
        }
    }
}

fn read_name<T: FilterTarget + ?Sized>(entity: &T) -> Result<&str, FilterError> {
    entity
        .display_name()
        .ok_or_else(|| FilterError::UnsupportedDatumForEntity {
            datum: FilterDatumType::NAME.label(),
            entity: entity.describe(),
        })
}

fn read_subtype<T: FilterTarget + ?Sized>(entity: &T) -> i32 {
    entity.subtype_index().unwrap_or(-1)
}

fn read_ingredients<T: FilterTarget + ?Sized>(entity: &T) -> IngredientSet {
    entity.ingredients().unwrap_or(IngredientSet::EMPTY)
}

impl Serde for FilterStrength {
    fn ser(&self, writer: &mut ByteWriter) {
        let tag: u8 = match self {
            Self::Suggestion => 0,
            Self::Requirement => 1,
        };
        tag.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        match u8::de(reader)? {
            0 => Ok(Self::Suggestion),
            1 => Ok(Self::Requirement),
            tag => Err(SerdeErr::InvalidTag {
                type_name: "FilterStrength",
                tag: u32::from(tag),
            }),
        }
    }

    fn byte_length(&self) -> usize {
        1
    }
}

impl Serde for EntityFilter {
    fn ser(&self, writer: &mut ByteWriter) {
        self.flags.bits().ser(writer);
        self.strength.ser(writer);
        self.name.ser(writer);
        self.subtype.ser(writer);
        self.ingredients.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let bits = u32::de(reader)?;
        let flags = FilterDatumType::from_bits(bits).ok_or(SerdeErr::InvalidTag {
            type_name: "FilterDatumType",
            tag: bits,
        })?;
        let strength = FilterStrength::de(reader)?;
        let name = Option::<String>::de(reader)?;
        let subtype = Option::<i32>::de(reader)?.filter(|subtype| *subtype >= 0);
        let ingredients = Option::<IngredientSet>::de(reader)?;
        Ok(Self {
            strength,
            flags,
            name,
            subtype,
            ingredients,
        })
    }

    fn byte_length(&self) -> usize {
        4 + 1
            + self.name.byte_length()
            + self.subtype.byte_length()
            + self.ingredients.byte_length()
    }
}
