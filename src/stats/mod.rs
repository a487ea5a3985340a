//! Counters for the broadcast and client loops

pub mod metrics;

pub use metrics::{ClientStats, ClientStatsSnapshot, SchedulerStats, SchedulerStatsSnapshot};
