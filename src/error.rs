//! Crate-level error type

use crate::broadcast::BroadcastError;

/// Result alias using the crate error type
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for streamsync operations
#[derive(Debug, Clone)]
pub enum Error {
    /// Broadcast scheduler error
    Broadcast(BroadcastError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Broadcast(e) => write!(f, "Broadcast error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Broadcast(e) => Some(e),
        }
    }
}

impl From<BroadcastError> for Error {
    fn from(e: BroadcastError) -> Self {
        Error::Broadcast(e)
    }
}
