use thiserror::Error;

use crate::ComponentKind;

/// Errors raised while building or checking the component schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two builds (or a build and a save file) disagree on the component list
    #[error("Incompatible snapshot format: expected schema fingerprint {expected:#018x}, found {found:#018x}. Both sides must run a build with the same component list")]
    FormatIncompatible { expected: u64, found: u64 },

    /// A component type or name was registered twice
    #[error("Component `{name}` is already registered in the schema. Each component may only be appended once")]
    DuplicateComponent { name: &'static str },

    /// The schema has been locked and can no longer grow
    #[error("Component schema is locked. Register all components before handing the schema to a codec or adapter")]
    Locked,

    /// The id space is exhausted
    #[error("Component schema is full: no identifier left after {count} components")]
    Exhausted { count: usize },
}

/// Errors raised while writing a component through the type-erased table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComponentError {
    /// The entity returned a value whose type does not match the schema entry
    #[error("Component {kind} (`{name}`) returned by the entity does not have the registered type")]
    TypeMismatch { kind: ComponentKind, name: &'static str },
}
