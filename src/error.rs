use thiserror::Error;

use hifitime::Duration;

/// Errors that may rise while driving updates.
/// Sentence level errors never show up here: they
/// are absorbed by the engine, see [crate::sentence::Discard].
#[derive(Error, Debug)]
pub enum Error {
    /// Transport I/O error
    #[error("i/o error: {0}")]
    IoError(#[from] std::io::Error),
    /// Updates must be started first
    #[error("updates are not active")]
    NotActive,
    /// Replay timer interval must be strictly positive
    #[error("invalid replay interval: {0}")]
    InvalidInterval(Duration),
}
