use crate::ConfigError;

/// The two channels every session carries
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Reliable,
    Unreliable,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::Reliable, Channel::Unreliable];

    pub fn index(self) -> usize {
        match self {
            Channel::Reliable => 0,
            Channel::Unreliable => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelMode {
    ReliableOrdered,
    UnreliableUnordered,
}

impl ChannelMode {
    pub fn is_reliable(&self) -> bool {
        matches!(self, ChannelMode::ReliableOrdered)
    }
}

/// Per-session channel layout, fixed once a session starts
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionConfig {
    channels: Vec<ChannelMode>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            channels: vec![ChannelMode::ReliableOrdered, ChannelMode::UnreliableUnordered],
        }
    }
}

impl ConnectionConfig {
    pub fn new(channels: Vec<ChannelMode>) -> Self {
        Self { channels }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn mode(&self, channel: Channel) -> Option<ChannelMode> {
        self.channels.get(channel.index()).copied()
    }

    /// Index 0 must be reliable-ordered and index 1 unreliable-unordered
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channels == ConnectionConfig::default().channels {
            Ok(())
        } else {
            Err(ConfigError::ChannelLayout {
                found: self.channels.clone(),
            })
        }
    }
}
