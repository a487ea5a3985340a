//! Externally-fed clock source

use std::sync::Mutex;

use crate::protocol::StreamPosition;

use super::ClockSource;

/// A clock source fed an authoritative position from outside
///
/// Useful when an origin server or a controlling process owns playback time
/// and this process only mirrors it. Reads return `None` until the first
/// `set`, then return the last fed value; `set` ignores regressions so a
/// late-arriving stale update cannot move the stream backwards. Use `reset`
/// for an intentional restart.
#[derive(Debug, Default)]
pub struct ManualClock {
    position: Mutex<Option<StreamPosition>>,
}

impl ManualClock {
    /// Create a clock with no position yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a new authoritative position
    ///
    /// Values below the current position are ignored (monotonicity).
    pub fn set(&self, position: StreamPosition) {
        let mut current = self.position.lock().unwrap_or_else(|e| e.into_inner());
        match *current {
            Some(existing) if position < existing => {
                tracing::debug!(
                    current = %existing,
                    rejected = %position,
                    "Ignoring regressing clock update"
                );
            }
            _ => *current = Some(position),
        }
    }

    /// Authoritative reset, allowed to move backwards
    pub fn reset(&self, position: StreamPosition) {
        let mut current = self.position.lock().unwrap_or_else(|e| e.into_inner());
        *current = Some(position);
        tracing::info!(position = %position, "Clock reset");
    }
}

impl ClockSource for ManualClock {
    fn current_position(&self) -> Option<StreamPosition> {
        *self.position.lock().unwrap_or_else(|e| e.into_inner())
    }
}
