use thiserror::Error;

/// Errors from duplication.
///
/// Side-file copy failures never surface here; they are logged.
#[derive(Debug, Error)]
pub enum CopyError {
    #[error("store error: {0}")]
    Store(#[from] xtad_store::StoreError),
}

pub type CopyResult<T> = Result<T, CopyError>;
