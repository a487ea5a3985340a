//! Client session tracking
//!
//! A session is one subscribed endpoint: the transport-connection identity
//! plus a send-capable handle for pushing sync payloads to it.

use std::time::Instant;

use bytes::Bytes;
use tokio::sync::mpsc;

use crate::protocol::StreamPosition;

/// Transport-connection identity of a subscribed endpoint
pub type SessionId = u64;

/// Why a delivery attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum DeliveryError {
    /// The receiving side is gone; the session is dead
    Closed,
    /// The channel is full; the subscriber is falling behind
    Full,
}

/// Send-capable handle for one session
///
/// Wraps the sending half of the session's delivery channel. The transport
/// adapter owns the receiving half and writes whatever it reads from it to
/// the actual connection.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Bytes>,
}

impl SessionHandle {
    /// Create a delivery channel, returning the handle and the receiver
    ///
    /// The receiver goes to the transport adapter; dropping it marks the
    /// session dead, which the scheduler detects on the next send.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Bytes>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Non-blocking best-effort send
    pub(super) fn deliver(&self, payload: Bytes) -> Result<(), DeliveryError> {
        self.tx.try_send(payload).map_err(|e| match e {
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
            mpsc::error::TrySendError::Full(_) => DeliveryError::Full,
        })
    }
}

/// State tracked per subscribed endpoint
///
/// Owned exclusively by the scheduler; created on register, destroyed on
/// unregister or on the first failed send.
#[derive(Debug)]
pub struct ClientSession {
    /// Transport-connection identity
    pub id: SessionId,

    /// When the session registered
    pub registered_at: Instant,

    /// Last position the client acknowledged, if it reports any
    ///
    /// Observability only; the protocol never waits on acknowledgments.
    pub last_ack_position: Option<StreamPosition>,

    /// Delivery handle
    pub(super) handle: SessionHandle,
}

impl ClientSession {
    /// Create a session for a newly subscribed endpoint
    pub(super) fn new(id: SessionId, handle: SessionHandle) -> Self {
        Self {
            id,
            registered_at: Instant::now(),
            last_ack_position: None,
            handle,
        }
    }

    /// How long the session has been subscribed
    pub fn age(&self) -> std::time::Duration {
        self.registered_at.elapsed()
    }
}
