//! Client-side drift correction
//!
//! The algorithmic core of the protocol: given the broadcast target position
//! and the local playback position, decide how to correct — leave the rate
//! alone, nudge it, or hard-seek — while suppressing oscillation near the
//! thresholds.
//!
//! The decision policy is an explicit mode state machine rather than nested
//! branches, so the hysteresis rule and each edge case test independently:
//!
//! ```text
//!   |drift| > hard ─────────────────────► Seek   (never suppressed)
//!   drift  >  soft ─────────────────────► RateUp
//!   drift  < -soft ─────────────────────► RateDown
//!   otherwise ──────────────────────────► Hold   (rate re-asserted to 1.0)
//!
//!   RateUp ◄─╫─► RateDown within the dwell window ⇒ Hold for that tick
//! ```

pub mod actuator;
pub mod config;
pub mod controller;
pub mod state;

pub use actuator::PlaybackActuator;
pub use config::ControllerConfig;
pub use controller::DriftController;
pub use state::{Correction, CorrectionMode, DriftState};
