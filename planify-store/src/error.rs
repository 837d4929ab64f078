use thiserror::Error;

/// Store-level failures.
///
/// Nothing here aborts the session: a missed lookup is a signal the caller
/// can ignore, and a storage failure leaves the in-memory collection
/// usable.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no appointment with id {0}")]
    NotFound(String),
    #[error("storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
