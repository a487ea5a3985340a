//! Drift controller configuration

use std::time::Duration;

use crate::protocol::StreamPosition;

/// Drift magnitude above which a hard seek is issued
pub const DEFAULT_HARD_THRESHOLD: f64 = 0.5;

/// Drift magnitude below which no correction is applied
pub const DEFAULT_SOFT_THRESHOLD: f64 = 0.1;

/// Rate gain; yields a ±0.05 max rate deviation at the default hard threshold
pub const DEFAULT_RATE_GAIN: f64 = 0.1;

/// Drift controller configuration options
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Drift magnitude above which the controller seeks instead of nudging
    pub hard_threshold: f64,

    /// Drift magnitude below which playback holds at rate 1.0
    pub soft_threshold: f64,

    /// Rate gain: rate deviates by `gain * clamp(|drift|, soft, hard)`
    pub rate_gain: f64,

    /// Minimum dwell before a direct RateUp/RateDown flip is honored
    ///
    /// Reference value is one broadcast interval.
    pub dwell: Duration,

    /// Known stream duration; target positions clamp to it before drift
    /// is computed, so the controller never seeks past content end
    pub stream_duration: Option<StreamPosition>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            hard_threshold: DEFAULT_HARD_THRESHOLD,
            soft_threshold: DEFAULT_SOFT_THRESHOLD,
            rate_gain: DEFAULT_RATE_GAIN,
            dwell: Duration::from_secs(5),
            stream_duration: None,
        }
    }
}

impl ControllerConfig {
    /// Set the hard threshold (floored at the soft threshold)
    pub fn hard_threshold(mut self, secs: f64) -> Self {
        self.hard_threshold = secs.max(self.soft_threshold);
        self
    }

    /// Set the soft threshold (capped at the hard threshold)
    pub fn soft_threshold(mut self, secs: f64) -> Self {
        self.soft_threshold = secs.max(0.0).min(self.hard_threshold);
        self
    }

    /// Set the rate gain
    pub fn rate_gain(mut self, gain: f64) -> Self {
        self.rate_gain = gain.max(0.0);
        self
    }

    /// Set the hysteresis dwell
    pub fn dwell(mut self, dwell: Duration) -> Self {
        self.dwell = dwell;
        self
    }

    /// Set the known stream duration
    pub fn stream_duration(mut self, duration: StreamPosition) -> Self {
        self.stream_duration = Some(duration);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ControllerConfig::default();

        assert_eq!(config.hard_threshold, 0.5);
        assert_eq!(config.soft_threshold, 0.1);
        assert_eq!(config.rate_gain, 0.1);
        assert_eq!(config.dwell, Duration::from_secs(5));
        assert!(config.stream_duration.is_none());
    }

    #[test]
    fn test_thresholds_keep_ordering() {
        // Soft can never exceed hard
        let config = ControllerConfig::default().soft_threshold(2.0);
        assert_eq!(config.soft_threshold, config.hard_threshold);

        // Hard can never drop below soft
        let config = ControllerConfig::default().hard_threshold(0.05);
        assert_eq!(config.hard_threshold, config.soft_threshold);
    }

    #[test]
    fn test_builder_chaining() {
        let config = ControllerConfig::default()
            .hard_threshold(1.0)
            .soft_threshold(0.2)
            .rate_gain(0.05)
            .dwell(Duration::from_secs(2))
            .stream_duration(StreamPosition::from_secs(600.0));

        assert_eq!(config.hard_threshold, 1.0);
        assert_eq!(config.soft_threshold, 0.2);
        assert_eq!(config.rate_gain, 0.05);
        assert_eq!(config.dwell, Duration::from_secs(2));
        assert_eq!(config.stream_duration.unwrap().as_secs(), 600.0);
    }
}
