//! Broadcast scheduler configuration

use std::time::Duration;

use crate::protocol::StreamPosition;

/// Default interval between sync broadcasts
pub const DEFAULT_BROADCAST_INTERVAL: Duration = Duration::from_secs(5);

/// Default per-session delivery channel capacity
pub const DEFAULT_SEND_CAPACITY: usize = 16;

/// Broadcast scheduler configuration options
///
/// The interval is the main tuning knob: shorter intervals bound drift more
/// tightly at the cost of message volume.
#[derive(Debug, Clone)]
pub struct BroadcastConfig {
    /// Interval between sync broadcasts
    pub interval: Duration,

    /// How long the clock may fail to advance before ticks are skipped
    ///
    /// Broadcasting a frozen position as if authoritative would hold every
    /// client at a stale point; past this grace the scheduler goes quiet
    /// instead.
    pub stall_grace: Duration,

    /// Capacity of each session's delivery channel
    pub send_capacity: usize,

    /// Known stream duration, if any; broadcast positions clamp to it
    pub stream_duration: Option<StreamPosition>,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_BROADCAST_INTERVAL,
            stall_grace: DEFAULT_BROADCAST_INTERVAL * 2,
            send_capacity: DEFAULT_SEND_CAPACITY,
            stream_duration: None,
        }
    }
}

impl BroadcastConfig {
    /// Set the broadcast interval
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the clock stall grace period
    pub fn stall_grace(mut self, grace: Duration) -> Self {
        self.stall_grace = grace;
        self
    }

    /// Set the per-session delivery channel capacity (minimum 1)
    pub fn send_capacity(mut self, capacity: usize) -> Self {
        self.send_capacity = capacity.max(1);
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
        let config = BroadcastConfig::default();

        assert_eq!(config.interval, Duration::from_secs(5));
        assert_eq!(config.stall_grace, Duration::from_secs(10));
        assert_eq!(config.send_capacity, DEFAULT_SEND_CAPACITY);
        assert!(config.stream_duration.is_none());
    }

    #[test]
    fn test_builder_chaining() {
        let config = BroadcastConfig::default()
            .interval(Duration::from_millis(500))
            .stall_grace(Duration::from_secs(3))
            .send_capacity(4)
            .stream_duration(StreamPosition::from_secs(3600.0));

        assert_eq!(config.interval, Duration::from_millis(500));
        assert_eq!(config.stall_grace, Duration::from_secs(3));
        assert_eq!(config.send_capacity, 4);
        assert_eq!(config.stream_duration.unwrap().as_secs(), 3600.0);
    }

    #[test]
    fn test_send_capacity_floor() {
        let config = BroadcastConfig::default().send_capacity(0);
        assert_eq!(config.send_capacity, 1);
    }
}
