//! # Snapwire Serde
//! Byte-level serialization shared by every snapwire crate. Numbers are
//! fixed-width little-endian, text and collections are length-prefixed, so
//! the encoding never depends on the host's locale, pointer width or layout.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod byte_reader;
mod byte_writer;
mod error;
mod impls;
mod serde;

pub use byte_reader::ByteReader;
pub use byte_writer::ByteWriter;
pub use error::SerdeErr;
pub use serde::{ConstByteLength, Serde};

/// Upper bound on any single length prefix. Anything larger is treated as a
/// corrupted stream rather than an allocation request.
pub const MAX_PREFIXED_LEN: u32 = 64 * 1024 * 1024;
