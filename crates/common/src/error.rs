use starkstate_crypto::{Felt, FeltError};
use thiserror::Error;

/// Error kinds from spec.md §7. `StoreIo` wraps the underlying KV failure;
/// everything else is a typed variant so callers can match on it instead of
/// string-sniffing an `anyhow::Error`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("node or key not found in the store")]
    NotFound,
    #[error("corrupted persisted entry: {0}")]
    InvalidValue(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("computed root {computed} does not match expected root {expected}")]
    RootMismatch { expected: Felt, computed: Felt },
    #[error("storage I/O error")]
    StoreIo(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<FeltError> for Error {
    fn from(e: FeltError) -> Self {
        Error::InvalidInput(e.to_string())
    }
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Error::StoreIo(e)
    }
}
