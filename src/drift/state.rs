//! Correction modes and hysteresis state
//!
//! Tracks what the controller last decided so that noisy drift estimates
//! near a threshold cannot flip the rate back and forth every tick.

use std::time::Instant;

use crate::protocol::StreamPosition;

/// Correction mode the controller is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionMode {
    /// No message received yet
    None,
    /// Within the soft band; playing at rate 1.0
    Hold,
    /// Behind the target; playing faster to catch up
    RateUp,
    /// Ahead of the target; playing slower to fall back
    RateDown,
    /// Drift exceeded the hard threshold; jumped to the target
    Seek,
}

impl CorrectionMode {
    /// Whether two modes are opposite-direction rate nudges
    pub fn opposes(&self, other: CorrectionMode) -> bool {
        matches!(
            (self, other),
            (CorrectionMode::RateUp, CorrectionMode::RateDown)
                | (CorrectionMode::RateDown, CorrectionMode::RateUp)
        )
    }
}

/// One correction decision, applied exactly once per received message
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Correction {
    /// Re-assert rate 1.0 (the steady state)
    Hold,
    /// Speed up to the given rate
    RateUp(f64),
    /// Slow down to the given rate
    RateDown(f64),
    /// Jump to the position and reset to rate 1.0
    Seek(StreamPosition),
}

impl Correction {
    /// The mode this correction puts the controller in
    pub fn mode(&self) -> CorrectionMode {
        match self {
            Correction::Hold => CorrectionMode::Hold,
            Correction::RateUp(_) => CorrectionMode::RateUp,
            Correction::RateDown(_) => CorrectionMode::RateDown,
            Correction::Seek(_) => CorrectionMode::Seek,
        }
    }
}

/// Client-local hysteresis state
///
/// Owned exclusively by one controller; never shared.
#[derive(Debug, Clone, Copy)]
pub struct DriftState {
    /// Mode of the last honored correction
    pub last_mode: CorrectionMode,
    /// When the mode last changed
    pub last_transition_at: Option<Instant>,
}

impl DriftState {
    /// Initial state: no correction has ever run
    pub fn new() -> Self {
        Self {
            last_mode: CorrectionMode::None,
            last_transition_at: None,
        }
    }

    /// Record an honored correction
    ///
    /// The transition timestamp only moves when the mode actually changes, so
    /// dwell is measured from mode entry, not from the latest message.
    pub fn note(&mut self, mode: CorrectionMode, now: Instant) {
        if self.last_mode != mode {
            self.last_mode = mode;
            self.last_transition_at = Some(now);
        }
    }

    /// Whether `mode` is an opposite-direction flip still inside the dwell
    pub fn flips_within(&self, mode: CorrectionMode, now: Instant, dwell: std::time::Duration) -> bool {
        if !mode.opposes(self.last_mode) {
            return false;
        }

        match self.last_transition_at {
            Some(at) => now.duration_since(at) < dwell,
            None => false,
        }
    }
}

impl Default for DriftState {
    fn default() -> Self {
        Self::new()
    }
}
