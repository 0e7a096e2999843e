pub mod entity_filter;
pub mod error;
pub mod ingredients;
pub mod target;
