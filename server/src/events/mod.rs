mod server_events;

pub use server_events::{
    ConnectEvent, DisconnectEvent, ErrorEvent, MessageEvent, ServerEvent, ServerEvents, TickEvent,
};
