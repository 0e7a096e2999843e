pub mod archive;
pub mod codec;
pub mod entity;
pub mod error;
pub mod record;
pub mod transfer;
