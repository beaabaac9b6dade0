use thiserror::Error;

use stockledger_core::DomainError;

use crate::store::StoreError;

/// Failure of a ledger or directory operation.
///
/// Business-rule failures come through as [`DomainError`] untouched so callers
/// can branch on the kind; everything else is infrastructure.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LedgerError {
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            LedgerError::Domain(err) => Some(err),
            LedgerError::Store(_) => None,
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
