//! Client-side sync receive loop
//!
//! Glue between the transport and the drift controller: raw payloads come in
//! over an mpsc channel (fed by whatever transport adapter owns the actual
//! connection), each well-formed sync message drives exactly one correction
//! on the playback actuator, and malformed payloads are dropped without
//! touching controller state.

use bytes::Bytes;
use tokio::sync::mpsc;

use crate::drift::{Correction, DriftController, PlaybackActuator};
use crate::protocol::SyncMessage;
use crate::stats::ClientStats;

/// One viewer's sync client
///
/// Owns the drift controller, the actuator, and the receiving half of the
/// transport channel. Message handling is strictly sequential: the controller
/// sees messages in arrival order, one at a time.
pub struct SyncClient<A: PlaybackActuator> {
    controller: DriftController,
    actuator: A,
    rx: mpsc::Receiver<Bytes>,
    stats: ClientStats,
}

impl<A: PlaybackActuator> SyncClient<A> {
    /// Create a client with a default controller
    pub fn new(actuator: A, rx: mpsc::Receiver<Bytes>) -> Self {
        Self::with_controller(DriftController::new(), actuator, rx)
    }

    /// Create a client with a custom controller
    pub fn with_controller(
        controller: DriftController,
        actuator: A,
        rx: mpsc::Receiver<Bytes>,
    ) -> Self {
        Self {
            controller,
            actuator,
            rx,
            stats: ClientStats::new(),
        }
    }

    /// Get the client counters
    pub fn stats(&self) -> &ClientStats {
        &self.stats
    }

    /// Get the actuator
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    /// Get the drift controller
    pub fn controller(&self) -> &DriftController {
        &self.controller
    }

    /// Handle one raw transport payload
    ///
    /// Returns the applied correction, or `None` when the payload was
    /// malformed and dropped.
    pub fn step(&mut self, payload: &[u8]) -> Option<Correction> {
        let message = match SyncMessage::decode(payload) {
            Some(message) => message,
            None => {
                self.stats.record_malformed();
                return None;
            }
        };

        self.stats.record_received();

        let correction = self.controller.correct(message.position, &mut self.actuator);
        match correction {
            Correction::Hold => self.stats.record_hold(),
            Correction::RateUp(_) => self.stats.record_rate_up(),
            Correction::RateDown(_) => self.stats.record_rate_down(),
            Correction::Seek(_) => self.stats.record_seek(),
        }

        tracing::debug!(
            position = %message.position,
            age_ms = message.age_ms(crate::protocol::message::epoch_millis()),
            correction = ?correction,
            "Sync message handled"
        );

        Some(correction)
    }

    /// Run the receive loop until the transport side closes
    ///
    /// Consumes the client and hands the actuator back so a caller can keep
    /// driving playback after the sync stream ends. Dropping the sending half
    /// of the channel is the cancellation signal; nothing else is held.
    pub async fn run(mut self) -> A {
        while let Some(payload) = self.rx.recv().await {
            self.step(&payload);
        }

        tracing::info!(
            stats = ?self.stats.snapshot(),
            "Sync stream closed, receive loop done"
        );
        self.actuator
    }
}
