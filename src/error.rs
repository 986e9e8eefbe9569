use mongodb::error::Error as DbError;
use thiserror::Error;

use crate::model::passport::SERIES_LENGTH;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The raw input was missing or entirely whitespace. Rejected before any
    /// processing; never classified as a roll outcome.
    #[error("No passport series was supplied")]
    EmptyInput,
    /// The canonical series failed the fixed-length check. Retrying with the
    /// same input cannot succeed, so this is never retried.
    #[error("Passport series `{0}` is invalid: expected exactly {SERIES_LENGTH} characters")]
    InvalidFormat(String),
    /// The roll store could not be reached or read. The only infrastructure
    /// error; must stay distinguishable from an absent roll entry.
    #[error("Failed to read the remote-voting roll: {0}")]
    StoreUnavailable(#[from] DbError),
}

impl Error {
    /// True iff this is a rejection of the caller's input rather than an
    /// infrastructure failure.
    pub fn is_rejection(&self) -> bool {
        match self {
            Self::EmptyInput | Self::InvalidFormat(_) => true,
            Self::StoreUnavailable(_) => false,
        }
    }
}
