use std::any::Any;

use snapwire_serde::Serde;

/// A component type that is eligible for snapshots.
///
/// `NAME` is part of the schema fingerprint. Renaming a component is a
/// wire-format break exactly like reordering one.
pub trait Replicate: Serde + Any + Send + Sync {
    const NAME: &'static str;
}
