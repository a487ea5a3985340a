//! Sync protocol data model and wire codec
//!
//! This module defines the value types shared by the broadcast and client
//! halves of the protocol:
//! - `StreamPosition`: playback offset from stream start, in seconds
//! - `SyncMessage`: the single wire message, JSON-encoded
//!
//! The wire format is deliberately permissive on receive: unknown fields are
//! ignored and a missing or malformed position decodes to nothing rather than
//! an error, so one bad payload can never take down a client's receive loop.

pub mod message;
pub mod position;

pub use message::SyncMessage;
pub use position::StreamPosition;
