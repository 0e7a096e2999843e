#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClientState {
    Disconnected,
    /// Connect request issued, waiting for the transport to accept it
    Connecting,
    Connected,
}
