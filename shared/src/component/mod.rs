pub mod component_kind;
pub mod component_kinds;
pub mod error;
pub mod fingerprint;
pub mod replicate;
