// ============================================================================
// src/error.rs – caller-facing precondition failures
// ============================================================================

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KdfError {
    #[error("iteration count must be at least 1")]
    ZeroIterations,

    #[error("derived key length must be at least 1 byte")]
    ZeroKeyLength,

    #[error("salt is {len} bytes; the single-block fast path allows at most {max}")]
    SaltTooLong { len: usize, max: usize },

    #[error("derived key length {len} exceeds the PBKDF2 limit of {max} bytes")]
    KeyTooLong { len: usize, max: u64 },
}

pub type Result<T> = std::result::Result<T, KdfError>;
