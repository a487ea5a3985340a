//! Authoritative playback clock
//!
//! The clock owns the notion of "where the stream should be right now". It is
//! an injected capability: the broadcast scheduler takes an `Arc<dyn
//! ClockSource>` at construction and samples it once per tick, so the same
//! scheduler works against a wall-clock counter, an externally-fed position,
//! or a test fixture.

pub mod manual;
pub mod wall;

pub use manual::ManualClock;
pub use wall::WallClock;

use crate::protocol::StreamPosition;

/// Source of the authoritative playback position
///
/// `current_position` must be side-effect free and callable at any time.
/// Returned positions never regress except through an explicit authoritative
/// reset (stream restart). When no authoritative position has ever been
/// established the source returns `None` and callers skip work; once a
/// position exists, reads return the last known value even when stale —
/// staleness is the caller's problem to detect.
pub trait ClockSource: Send + Sync {
    /// The target playback position right now, if one is known
    fn current_position(&self) -> Option<StreamPosition>;
}
