//! Broadcast error types

use super::session::SessionId;

/// Error type for broadcast scheduler operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastError {
    /// The same connection registered twice without unregistering
    AlreadyRegistered(SessionId),
}

impl std::fmt::Display for BroadcastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BroadcastError::AlreadyRegistered(id) => {
                write!(f, "Session already registered: {}", id)
            }
        }
    }
}

impl std::error::Error for BroadcastError {}
