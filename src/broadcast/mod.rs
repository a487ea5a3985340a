//! Broadcast scheduler for sync fan-out
//!
//! The scheduler owns the set of subscribed sessions and, on a fixed
//! interval, samples the clock once and fans the resulting sync message out
//! to every registered session.
//!
//! # Architecture
//!
//! ```text
//!      Arc<dyn ClockSource>
//!              │ sample once per tick
//!              ▼
//!   ┌────────────────────────────┐
//!   │ BroadcastScheduler         │
//!   │   sessions: RwLock<HashMap │
//!   │     SessionId → Session>   │
//!   └─────────────┬──────────────┘
//!                 │ one encoded SyncMessage per tick
//!       ┌─────────┼─────────┐
//!       ▼         ▼         ▼
//!   [session]  [session]  [session]     mpsc::Sender<Bytes> each
//! ```
//!
//! Delivery is push-only and best-effort per session: a dead session is
//! removed on its first failed send, and never blocks delivery to the others.
//! The sync payload is encoded once per tick; `Bytes` reference counting makes
//! the per-session clone cheap.

pub mod config;
pub mod error;
pub mod scheduler;
pub mod session;

pub use config::BroadcastConfig;
pub use error::BroadcastError;
pub use scheduler::BroadcastScheduler;
pub use session::{ClientSession, SessionHandle, SessionId};
