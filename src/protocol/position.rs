//! Stream position type
//!
//! A playback offset from stream start, in seconds.

use serde::{Deserialize, Serialize};

/// Playback offset from stream start, in seconds
///
/// Construction clamps negative values to zero; positions compare and print
/// as plain seconds. Clamp against a known stream duration with
/// [`StreamPosition::clamp_to`] before using a position as a seek target.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamPosition(f64);

impl StreamPosition {
    /// Position zero (stream start)
    pub const ZERO: StreamPosition = StreamPosition(0.0);

    /// Create a position from seconds
    ///
    /// Negative and non-finite inputs clamp to zero.
    pub fn from_secs(secs: f64) -> Self {
        if secs.is_finite() && secs > 0.0 {
            Self(secs)
        } else {
            Self(0.0)
        }
    }

    /// Position as seconds
    pub fn as_secs(&self) -> f64 {
        self.0
    }

    /// Clamp the position to a known stream duration
    pub fn clamp_to(&self, duration: StreamPosition) -> Self {
        if self.0 > duration.0 {
            duration
        } else {
            *self
        }
    }

    /// Signed drift of `local` relative to this position (target - local)
    ///
    /// Positive drift means the local player is behind the target.
    pub fn drift_from(&self, local: f64) -> f64 {
        self.0 - local
    }
}

impl std::fmt::Display for StreamPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_clamps_to_zero() {
        assert_eq!(StreamPosition::from_secs(-1.5).as_secs(), 0.0);
        assert_eq!(StreamPosition::from_secs(f64::NAN).as_secs(), 0.0);
        assert_eq!(StreamPosition::from_secs(f64::NEG_INFINITY).as_secs(), 0.0);
    }

    #[test]
    fn test_clamp_to_duration() {
        let duration = StreamPosition::from_secs(120.0);

        let inside = StreamPosition::from_secs(60.0);
        assert_eq!(inside.clamp_to(duration).as_secs(), 60.0);

        let beyond = StreamPosition::from_secs(150.0);
        assert_eq!(beyond.clamp_to(duration).as_secs(), 120.0);
    }

    #[test]
    fn test_drift_sign() {
        let target = StreamPosition::from_secs(10.0);

        // Local behind target: positive drift
        assert!(target.drift_from(9.5) > 0.0);
        // Local ahead of target: negative drift
        assert!(target.drift_from(10.5) < 0.0);
    }
}
