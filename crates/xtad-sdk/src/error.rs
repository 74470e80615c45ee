use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] xtad_store::StoreError),

    #[error("ledger error: {0}")]
    Ledger(#[from] xtad_ledger::LedgerError),

    #[error("duplication error: {0}")]
    Copy(#[from] xtad_copy::CopyError),
}

impl SdkError {
    /// `true` when the underlying cause is a missing object or record.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Store(e) => e.is_not_found(),
            Self::Ledger(xtad_ledger::LedgerError::Store(e)) => e.is_not_found(),
            Self::Copy(xtad_copy::CopyError::Store(e)) => e.is_not_found(),
            _ => false,
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
