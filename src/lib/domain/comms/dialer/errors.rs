//! Dialer errors

use thiserror::Error;

/// Dialer errors
#[derive(Debug, Error)]
pub enum DialError {
    /// The calling API answered with a non-success status.
    #[error("calling API responded with status {0}")]
    Api(u16),

    /// The calling API could not be reached.
    #[error(transparent)]
    UnknownError(anyhow::Error),
}

impl From<anyhow::Error> for DialError {
    fn from(err: anyhow::Error) -> Self {
        DialError::UnknownError(err)
    }
}
