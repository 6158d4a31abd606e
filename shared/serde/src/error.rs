use thiserror::Error;

/// Errors that can occur while reading serialized replica data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The reader ran out of bytes
    #[error("Unexpected end of buffer: needed {needed} byte(s), {remaining} remaining")]
    UnexpectedEnd { needed: usize, remaining: usize },

    /// A variable-length integer used more bytes than a u64 can hold
    #[error("Variable-length integer overflows 64 bits")]
    VarintOverflow,

    /// A length prefix does not fit in memory on this platform
    #[error("Length prefix {length} is too large")]
    LengthOverflow { length: u64 },

    /// A String payload was not valid UTF-8
    #[error("String payload is not valid UTF-8")]
    InvalidUtf8,

    /// Input remained after a complete value was read
    #[error("{remaining} byte(s) left after the value")]
    TrailingBytes { remaining: usize },

    /// A tagged value carried an unknown tag
    #[error("Unknown tag {tag} for {type_name}")]
    InvalidTag { type_name: &'static str, tag: u8 },
}
