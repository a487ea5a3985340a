//! Playback actuator seam
//!
//! The media pipeline itself is an external collaborator; the controller only
//! needs a position readout, a settable rate, and a seek.

/// Interface to the actual media playback pipeline
///
/// All three operations are assumed synchronous and idempotent from the
/// controller's point of view.
pub trait PlaybackActuator {
    /// Current local playback position in seconds
    fn position(&self) -> f64;

    /// Set the playback rate multiplier (1.0 = normal speed)
    fn set_rate(&mut self, rate: f64);

    /// Jump playback to the given position in seconds
    fn seek(&mut self, position: f64);
}

/// In-memory actuator for tests and demos
///
/// Tracks position and rate without any real media pipeline behind it.
#[derive(Debug, Clone)]
pub struct FakeActuator {
    position: f64,
    rate: f64,
    seeks: u64,
}

impl FakeActuator {
    /// Create an actuator at the given position, rate 1.0
    pub fn at(position: f64) -> Self {
        Self {
            position,
            rate: 1.0,
            seeks: 0,
        }
    }

    /// Current rate
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Number of seeks performed
    pub fn seek_count(&self) -> u64 {
        self.seeks
    }

    /// Advance playback, honoring the current rate
    pub fn advance(&mut self, secs: f64) {
        self.position += secs * self.rate;
    }
}

impl PlaybackActuator for FakeActuator {
    fn position(&self) -> f64 {
        self.position
    }

    fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    fn seek(&mut self, position: f64) {
        self.position = position;
        self.seeks += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fake_actuator_advances_at_rate() {
        let mut actuator = FakeActuator::at(10.0);
        actuator.set_rate(1.05);
        actuator.advance(2.0);

        assert!((actuator.position() - 12.1).abs() < 1e-9);
    }

    #[test]
    fn test_fake_actuator_seek() {
        let mut actuator = FakeActuator::at(0.0);
        actuator.seek(30.0);

        assert_eq!(actuator.position(), 30.0);
        assert_eq!(actuator.seek_count(), 1);
    }
}
