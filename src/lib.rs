//! Synchronized playback coordination
//!
//! Keeps many independently-connected viewers of the same logical stream at
//! the same playback position, within human-perceptible (sub-second)
//! alignment. Two halves:
//!
//! - **Broadcast side**: a [`BroadcastScheduler`] samples an authoritative
//!   [`clock::ClockSource`] on a fixed interval and pushes the position to
//!   every registered session, fire-and-forget.
//! - **Client side**: a [`DriftController`] (wrapped by [`SyncClient`])
//!   compares each received position against local playback and either holds
//!   the rate, nudges it, or hard-seeks, with hysteresis against oscillation.
//!
//! ```text
//! ClockSource → BroadcastScheduler → (transport) → DriftController → PlaybackActuator
//! ```
//!
//! The media pipeline and the transport's connection mechanics stay outside:
//! the pipeline is reached only through the [`drift::PlaybackActuator`] trait,
//! and the transport only has to move `Bytes` payloads into each client's
//! channel, in order.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use streamsync::clock::WallClock;
//! use streamsync::BroadcastScheduler;
//!
//! # async fn example() -> streamsync::Result<()> {
//! let clock = Arc::new(WallClock::new());
//! let scheduler = Arc::new(BroadcastScheduler::new(clock));
//!
//! // One session per connected viewer; the transport adapter
//! // forwards everything from `rx` to the viewer's connection.
//! let mut rx = scheduler.open_session(1).await?;
//!
//! let _task = scheduler.spawn();
//! # Ok(())
//! # }
//! ```

pub mod broadcast;
pub mod client;
pub mod clock;
pub mod drift;
pub mod error;
pub mod protocol;
pub mod stats;

pub use broadcast::{BroadcastConfig, BroadcastError, BroadcastScheduler, SessionHandle, SessionId};
pub use client::SyncClient;
pub use drift::{Correction, ControllerConfig, DriftController};
pub use error::{Error, Result};
pub use protocol::{StreamPosition, SyncMessage};
