//! Statistics for the sync broadcast and correction loops
//!
//! Plain relaxed atomics; snapshots are taken field-by-field and are not
//! required to be mutually consistent.

use std::sync::atomic::{AtomicU64, Ordering};

/// Broadcast-side counters
#[derive(Debug, Default)]
pub struct SchedulerStats {
    ticks: AtomicU64,
    skipped_ticks: AtomicU64,
    messages_sent: AtomicU64,
    send_failures: AtomicU64,
    sessions_removed: AtomicU64,
}

impl SchedulerStats {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_skipped_tick(&self) {
        self.skipped_ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_message_sent(&self) {
        self.messages_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_send_failure(&self) {
        self.send_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_session_removed(&self) {
        self.sessions_removed.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time snapshot
    pub fn snapshot(&self) -> SchedulerStatsSnapshot {
        SchedulerStatsSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            skipped_ticks: self.skipped_ticks.load(Ordering::Relaxed),
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
            sessions_removed: self.sessions_removed.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of broadcast-side counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStatsSnapshot {
    /// Ticks that broadcast a message
    pub ticks: u64,
    /// Ticks skipped (overlap, no clock position, or stall)
    pub skipped_ticks: u64,
    /// Messages successfully handed to session channels
    pub messages_sent: u64,
    /// Failed delivery attempts (closed or full channels)
    pub send_failures: u64,
    /// Sessions removed after a failed send
    pub sessions_removed: u64,
}

/// Client-side counters
#[derive(Debug, Default)]
pub struct ClientStats {
    messages_received: AtomicU64,
    malformed_messages: AtomicU64,
    holds: AtomicU64,
    rate_ups: AtomicU64,
    rate_downs: AtomicU64,
    seeks: AtomicU64,
}

impl ClientStats {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_malformed(&self) {
        self.malformed_messages.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_hold(&self) {
        self.holds.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rate_up(&self) {
        self.rate_ups.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rate_down(&self) {
        self.rate_downs.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_seek(&self) {
        self.seeks.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time snapshot
    pub fn snapshot(&self) -> ClientStatsSnapshot {
        ClientStatsSnapshot {
            messages_received: self.messages_received.load(Ordering::Relaxed),
            malformed_messages: self.malformed_messages.load(Ordering::Relaxed),
            holds: self.holds.load(Ordering::Relaxed),
            rate_ups: self.rate_ups.load(Ordering::Relaxed),
            rate_downs: self.rate_downs.load(Ordering::Relaxed),
            seeks: self.seeks.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of client-side counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientStatsSnapshot {
    /// Well-formed sync messages handled
    pub messages_received: u64,
    /// Payloads dropped as malformed
    pub malformed_messages: u64,
    /// Hold decisions
    pub holds: u64,
    /// RateUp decisions
    pub rate_ups: u64,
    /// RateDown decisions
    pub rate_downs: u64,
    /// Seek decisions
    pub seeks: u64,
}
