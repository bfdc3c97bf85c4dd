use thiserror::Error;

/// Failures raised by ingestion and aggregation.
///
/// `Validation` and `Conflict` carry the exact message returned to the
/// caller; `Store` wraps whatever the storage backend reported.
#[derive(Debug, Error)]
pub enum TreasuryError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("storage failure: {0}")]
    Store(#[from] anyhow::Error),
}

impl TreasuryError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

pub type TreasuryResult<T> = Result<T, TreasuryError>;
