pub mod channel;
pub mod error;
pub mod message_kind;
pub mod net_message;
