pub mod client_state;
pub mod ping_stats;
