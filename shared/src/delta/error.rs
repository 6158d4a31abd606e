use thiserror::Error;

use replica_serde::SerdeErr;

/// Errors that can occur when applying a delta
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeltaError {
    /// The delta was computed against a different snapshot than the one supplied
    #[error(
        "Delta baseline mismatch: expected {expected_len} bytes with checksum {expected_checksum:#010x}, got {actual_len} bytes with checksum {actual_checksum:#010x}"
    )]
    BaselineMismatch {
        expected_len: usize,
        actual_len: usize,
        expected_checksum: u32,
        actual_checksum: u32,
    },

    /// A copy op reaches outside the baseline
    #[error("Copy of {length} byte(s) at {cursor}{relative:+} is outside a baseline of {from_len} bytes")]
    CopyOutOfRange {
        cursor: usize,
        relative: i64,
        length: usize,
        from_len: usize,
    },

    /// The ops produce more bytes than the header announced
    #[error("Delta produces {actual} bytes, header announced {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Bytes remain after the announced output was produced
    #[error("Delta has {remaining} trailing byte(s)")]
    TrailingBytes { remaining: usize },

    /// An op of length zero, which no encoder emits
    #[error("Empty delta op at byte {position}")]
    EmptyOp { position: usize },

    /// A delta arrived before any full snapshot established a baseline
    #[error("Received a delta without a baseline")]
    MissingBaseline,

    /// The delta could not be parsed
    #[error("Malformed delta: {0}")]
    Malformed(#[from] SerdeErr),
}
