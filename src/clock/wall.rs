//! Wall-clock-driven position counter

use std::sync::Mutex;
use std::time::Instant;

use crate::protocol::StreamPosition;

use super::ClockSource;

#[derive(Debug)]
struct WallClockState {
    /// Position at the last anchor point
    base: f64,
    /// When `base` was anchored
    anchored_at: Instant,
    /// While paused, position holds at `base`
    paused: bool,
}

/// A ticking wall-clock-driven clock source
///
/// The position advances in real time from a starting offset. Pausing freezes
/// it; `reset` is the one operation allowed to move it backwards (authoritative
/// stream restart). If a stream duration is known the position saturates there.
#[derive(Debug)]
pub struct WallClock {
    state: Mutex<WallClockState>,
    duration: Option<StreamPosition>,
}

impl WallClock {
    /// Create a clock starting at stream position zero
    pub fn new() -> Self {
        Self::starting_at(StreamPosition::ZERO)
    }

    /// Create a clock starting at the given position
    pub fn starting_at(position: StreamPosition) -> Self {
        Self {
            state: Mutex::new(WallClockState {
                base: position.as_secs(),
                anchored_at: Instant::now(),
                paused: false,
            }),
            duration: None,
        }
    }

    /// Set a known stream duration; positions clamp to it
    pub fn with_duration(mut self, duration: StreamPosition) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Freeze the position at its current value
    pub fn pause(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if !state.paused {
            state.base += state.anchored_at.elapsed().as_secs_f64();
            state.anchored_at = Instant::now();
            state.paused = true;
            tracing::info!(position = state.base, "Clock paused");
        }
    }

    /// Resume advancing from the current position
    pub fn resume(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.paused {
            state.anchored_at = Instant::now();
            state.paused = false;
            tracing::info!(position = state.base, "Clock resumed");
        }
    }

    /// Authoritative reset to an arbitrary position
    ///
    /// This is the only way the clock moves backwards (e.g. stream restart).
    pub fn reset(&self, position: StreamPosition) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.base = position.as_secs();
        state.anchored_at = Instant::now();
        tracing::info!(position = %position, "Clock reset");
    }

    fn position_now(&self) -> StreamPosition {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let secs = if state.paused {
            state.base
        } else {
            state.base + state.anchored_at.elapsed().as_secs_f64()
        };

        let position = StreamPosition::from_secs(secs);
        match self.duration {
            Some(duration) => position.clamp_to(duration),
            None => position,
        }
    }
}

impl ClockSource for WallClock {
    fn current_position(&self) -> Option<StreamPosition> {
        Some(self.position_now())
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}
