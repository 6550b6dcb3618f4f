//! Configuration errors for simulation runs.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DstError {
    #[error("seed must be a non-zero u64, got {0:?}")]
    InvalidSeed(String),

    #[error("DST_ITERATIONS must be a positive u64, got {0:?}")]
    InvalidIterations(String),

    #[error("workload weights must not all be zero")]
    NoOperationWeights,

    #[error("workload must contain at least one operation")]
    EmptyWorkload,
}
