// Domain error types
use thiserror::Error;

/// Failures while building the in-memory series. Both are fatal at load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("time series store has no points")]
    EmptyStore,

    #[error("timestamps decrease at index {index}: {current_ms} follows {previous_ms}")]
    UnsortedInput {
        index: usize,
        previous_ms: i64,
        current_ms: i64,
    },
}

/// Rejected decimation tier tables
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("decimation policy needs at least one tier")]
    NoTiers,

    #[error("tier at {min_duration_ms}ms has a zero stride")]
    ZeroStride { min_duration_ms: i64 },

    #[error("tier threshold {min_duration_ms}ms is negative")]
    NegativeThreshold { min_duration_ms: i64 },

    #[error("two tiers share the threshold {min_duration_ms}ms")]
    DuplicateThreshold { min_duration_ms: i64 },

    #[error(
        "stride {shorter_stride} at {shorter_ms}ms exceeds stride {longer_stride} at {longer_ms}ms"
    )]
    NonMonotonic {
        shorter_ms: i64,
        shorter_stride: usize,
        longer_ms: i64,
        longer_stride: usize,
    },
}
