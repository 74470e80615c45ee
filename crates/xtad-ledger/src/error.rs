//! Error types for ledger operations.

use thiserror::Error;

/// Errors that can occur while adjusting or scanning reference counts.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("store error: {0}")]
    Store(#[from] xtad_store::StoreError),

    /// A per-identifier lock was poisoned by a panicking holder.
    #[error("lock poisoned for {0}")]
    LockPoisoned(String),
}

/// Convenience type alias for ledger operations.
pub type LedgerResult<T> = std::result::Result<T, LedgerError>;
