//! Drift controller implementation
//!
//! Runs once per received sync message: compare the broadcast target against
//! the local playback position and decide the correction.

use std::time::Instant;

use crate::protocol::StreamPosition;

use super::actuator::PlaybackActuator;
use super::config::ControllerConfig;
use super::state::{Correction, CorrectionMode, DriftState};

/// Per-client drift correction controller
///
/// Purely reactive: it only acts when fed a message, and recomputes drift
/// fresh each time. Duplicate or reordered messages cannot corrupt it — the
/// only carried state is the hysteresis mode.
#[derive(Debug)]
pub struct DriftController {
    config: ControllerConfig,
    state: DriftState,
}

impl DriftController {
    /// Create a controller with default thresholds
    pub fn new() -> Self {
        Self::with_config(ControllerConfig::default())
    }

    /// Create a controller with custom configuration
    pub fn with_config(config: ControllerConfig) -> Self {
        Self {
            config,
            state: DriftState::new(),
        }
    }

    /// Get the controller configuration
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Current hysteresis state
    pub fn state(&self) -> &DriftState {
        &self.state
    }

    /// Decide the correction for one received target position
    ///
    /// Policy, first match wins:
    /// 1. `|drift| > hard_threshold` → Seek (rate correction would take too
    ///    long; a visible jump beats a long stretch of wrong-speed playback)
    /// 2. `drift > soft_threshold` → RateUp
    /// 3. `drift < -soft_threshold` → RateDown
    /// 4. otherwise → Hold, re-asserting rate 1.0
    ///
    /// A direct RateUp/RateDown flip inside the dwell window degrades to Hold
    /// without touching the recorded mode, so the flip engages once the dwell
    /// has elapsed. Seek is never suppressed.
    pub fn decide(&mut self, target: StreamPosition, local: f64, now: Instant) -> Correction {
        let target = match self.config.stream_duration {
            Some(duration) => target.clamp_to(duration),
            None => target,
        };

        let drift = target.drift_from(local);

        if drift.abs() > self.config.hard_threshold {
            self.state.note(CorrectionMode::Seek, now);
            tracing::debug!(drift = drift, position = %target, "Drift past hard threshold, seeking");
            return Correction::Seek(target);
        }

        let correction = if drift > self.config.soft_threshold {
            Correction::RateUp(1.0 + self.nudge(drift))
        } else if drift < -self.config.soft_threshold {
            Correction::RateDown(1.0 - self.nudge(drift))
        } else {
            Correction::Hold
        };

        if self.state.flips_within(correction.mode(), now, self.config.dwell) {
            // Opposite-direction nudge inside the dwell window: hold this
            // tick, leave the recorded mode alone
            tracing::debug!(drift = drift, "Rate flip suppressed by hysteresis");
            return Correction::Hold;
        }

        self.state.note(correction.mode(), now);
        correction
    }

    /// Rate deviation for a drift magnitude, clamped to the threshold band
    fn nudge(&self, drift: f64) -> f64 {
        let magnitude = drift
            .abs()
            .clamp(self.config.soft_threshold, self.config.hard_threshold);
        self.config.rate_gain * magnitude
    }

    /// Decide and apply in one step
    ///
    /// Reads the local position from the actuator, decides, and performs
    /// exactly one actuation. Hold re-asserts rate 1.0 so a stale nudge never
    /// persists if updates stop arriving; Seek jumps and resets the rate.
    pub fn correct<A: PlaybackActuator>(
        &mut self,
        target: StreamPosition,
        actuator: &mut A,
    ) -> Correction {
        let local = actuator.position();
        let correction = self.decide(target, local, Instant::now());

        match correction {
            Correction::Hold => actuator.set_rate(1.0),
            Correction::RateUp(rate) | Correction::RateDown(rate) => actuator.set_rate(rate),
            Correction::Seek(position) => {
                actuator.seek(position.as_secs());
                actuator.set_rate(1.0);
            }
        }

        correction
    }
}

impl Default for DriftController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drift::actuator::FakeActuator;
    use std::time::Duration;

    fn pos(secs: f64) -> StreamPosition {
        StreamPosition::from_secs(secs)
    }

    #[test]
    fn test_hold_band_is_exact() {
        let mut controller = DriftController::new();
        let now = Instant::now();

        // Drift exactly at the soft threshold still holds
        for local in [10.0, 9.95, 10.05, 9.9, 10.1] {
            let correction = controller.decide(pos(10.0), local, now);
            assert_eq!(correction, Correction::Hold, "local={}", local);
        }
    }

    #[test]
    fn test_rate_up_monotonic_and_bounded() {
        let now = Instant::now();
        let config = ControllerConfig::default();
        let max_rate = 1.0 + config.rate_gain * config.hard_threshold;

        let mut previous = 1.0;
        for drift in [0.15, 0.2, 0.3, 0.4, 0.5] {
            let mut controller = DriftController::new();
            match controller.decide(pos(10.0), 10.0 - drift, now) {
                Correction::RateUp(rate) => {
                    assert!(rate > previous, "rate not increasing at drift={}", drift);
                    assert!(rate <= max_rate + 1e-12);
                    previous = rate;
                }
                other => panic!("expected RateUp at drift={}, got {:?}", drift, other),
            }
        }
    }

    #[test]
    fn test_rate_down_symmetric() {
        let mut controller = DriftController::new();
        let correction = controller.decide(pos(10.0), 10.3, Instant::now());

        match correction {
            Correction::RateDown(rate) => assert!((rate - 0.97).abs() < 1e-9),
            other => panic!("expected RateDown, got {:?}", other),
        }
    }

    #[test]
    fn test_seek_past_hard_threshold() {
        let mut controller = DriftController::new();
        let correction = controller.decide(pos(10.0), 8.0, Instant::now());

        assert_eq!(correction, Correction::Seek(pos(10.0)));
        assert_eq!(controller.state().last_mode, CorrectionMode::Seek);
    }

    #[test]
    fn test_post_seek_drift_is_zero() {
        let mut controller = DriftController::new();
        let mut actuator = FakeActuator::at(8.0);

        let correction = controller.correct(pos(10.0), &mut actuator);
        assert!(matches!(correction, Correction::Seek(_)));
        assert_eq!(actuator.position(), 10.0);
        assert_eq!(actuator.rate(), 1.0);

        // Same target again: drift is now zero, controller holds
        let next = controller.correct(pos(10.0), &mut actuator);
        assert_eq!(next, Correction::Hold);
    }

    #[test]
    fn test_scenario_hold() {
        let mut controller = DriftController::new();
        let mut actuator = FakeActuator::at(10.05);

        let correction = controller.correct(pos(10.0), &mut actuator);
        assert_eq!(correction, Correction::Hold);
        assert_eq!(actuator.rate(), 1.0);
    }

    #[test]
    fn test_scenario_rate_up() {
        let mut controller = DriftController::new();
        let mut actuator = FakeActuator::at(9.7);

        // drift = 0.3, k = 0.1 → rate 1.03
        match controller.correct(pos(10.0), &mut actuator) {
            Correction::RateUp(rate) => assert!((rate - 1.03).abs() < 1e-9),
            other => panic!("expected RateUp, got {:?}", other),
        }
        assert!((actuator.rate() - 1.03).abs() < 1e-9);
    }

    #[test]
    fn test_scenario_seek() {
        let mut controller = DriftController::new();
        let mut actuator = FakeActuator::at(8.0);

        let correction = controller.correct(pos(10.0), &mut actuator);
        assert_eq!(correction, Correction::Seek(pos(10.0)));
        assert_eq!(actuator.seek_count(), 1);
    }

    #[test]
    fn test_hysteresis_suppresses_flip() {
        let mut controller = DriftController::new();
        let t0 = Instant::now();

        // First message: behind by 0.25 → RateUp
        let first = controller.decide(pos(10.0), 9.75, t0);
        assert!(matches!(first, Correction::RateUp(_)));

        // Next message, opposite-sign drift within the dwell → Hold
        let second = controller.decide(pos(10.05), 10.2, t0 + Duration::from_secs(1));
        assert_eq!(second, Correction::Hold);
        // Recorded mode is untouched by the suppressed tick
        assert_eq!(controller.state().last_mode, CorrectionMode::RateUp);
    }

    #[test]
    fn test_flip_engages_after_dwell() {
        let mut controller =
            DriftController::with_config(ControllerConfig::default().dwell(Duration::from_secs(1)));
        let t0 = Instant::now();

        assert!(matches!(
            controller.decide(pos(10.0), 9.75, t0),
            Correction::RateUp(_)
        ));

        // Past the dwell window the opposite nudge is honored
        let later = controller.decide(pos(10.0), 10.25, t0 + Duration::from_secs(2));
        assert!(matches!(later, Correction::RateDown(_)));
    }

    #[test]
    fn test_seek_never_suppressed() {
        let mut controller = DriftController::new();
        let t0 = Instant::now();

        assert!(matches!(
            controller.decide(pos(10.0), 9.75, t0),
            Correction::RateUp(_)
        ));

        // Large opposite drift immediately after: seek anyway
        let correction = controller.decide(pos(10.0), 11.0, t0 + Duration::from_millis(100));
        assert!(matches!(correction, Correction::Seek(_)));

        // And leaving Seek for a nudge is not suppressed either
        let after = controller.decide(pos(10.0), 9.7, t0 + Duration::from_millis(200));
        assert!(matches!(after, Correction::RateUp(_)));
    }

    #[test]
    fn test_duplicate_message_idempotent() {
        let mut controller = DriftController::new();
        let t0 = Instant::now();

        let first = controller.decide(pos(10.0), 9.7, t0);
        let second = controller.decide(pos(10.0), 9.7, t0 + Duration::from_millis(10));

        assert_eq!(first, second);
        assert_eq!(controller.state().last_mode, CorrectionMode::RateUp);
    }

    #[test]
    fn test_target_clamped_to_duration() {
        let mut controller = DriftController::with_config(
            ControllerConfig::default().stream_duration(pos(100.0)),
        );
        let mut actuator = FakeActuator::at(100.0);

        // Target beyond content end clamps before drift is computed
        let correction = controller.correct(pos(250.0), &mut actuator);
        assert_eq!(correction, Correction::Hold);
        assert_eq!(actuator.seek_count(), 0);

        // Even a seek-sized overshoot lands at the duration, never past it
        actuator.seek(90.0);
        let correction = controller.correct(pos(250.0), &mut actuator);
        assert_eq!(correction, Correction::Seek(pos(100.0)));
        assert_eq!(actuator.position(), 100.0);
    }

    #[test]
    fn test_hold_reasserts_unit_rate() {
        let mut controller = DriftController::new();
        let mut actuator = FakeActuator::at(9.7);

        controller.correct(pos(10.0), &mut actuator);
        assert!(actuator.rate() > 1.0);

        // Drift back inside the soft band: rate must normalize, not linger
        actuator.seek(10.0);
        controller.correct(pos(10.0), &mut actuator);
        assert_eq!(actuator.rate(), 1.0);
    }
}
