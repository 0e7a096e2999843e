//! Fixtures shared by the snapwire integration tests: a component schema,
//! an in-memory entity world and helpers that wire a server and clients
//! together over a [`LocalHub`](snapwire_shared::LocalHub).

pub mod helpers;
pub mod test_schema;
pub mod test_world;

pub use helpers::*;
pub use test_schema::{
    older_schema, schema, CanHoldItem, HasName, HasSubtype, IsDrink, Transform, SCHEMA_NAMES,
};
pub use test_world::{TestEntity, TestWorld};
