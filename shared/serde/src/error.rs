use thiserror::Error;

/// Errors that can occur while reading bytes back into values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The reader ran out of input
    #[error("Unexpected end of input: needed {needed} bytes but only {remaining} remain")]
    UnexpectedEnd { needed: usize, remaining: usize },

    /// A length prefix claims more data than the input holds
    #[error("Length prefix {len} exceeds the {remaining} bytes remaining in the input")]
    LengthExceedsInput { len: usize, remaining: usize },

    /// A length prefix is above the hard cap
    #[error("Length prefix {len} exceeds the maximum of {max}")]
    LengthLimit { len: u32, max: u32 },

    /// A bool byte was neither 0 nor 1
    #[error("Invalid bool byte {0:#04x}, expected 0x00 or 0x01")]
    InvalidBool(u8),

    /// An enum/option tag was not recognized
    #[error("Invalid tag {tag} while reading {type_name}")]
    InvalidTag { type_name: &'static str, tag: u32 },

    /// String bytes were not valid UTF-8
    #[error("String payload is not valid UTF-8")]
    InvalidUtf8,

    /// A bounded reader was not fully consumed
    #[error("{remaining} trailing bytes left unread in a bounded payload")]
    TrailingBytes { remaining: usize },
}
