//! Sync wire message
//!
//! The one message shape this protocol puts on the wire:
//!
//! ```text
//! { "type": "sync", "position": <float seconds>, "emittedAt": <epoch ms> }
//! ```

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::position::StreamPosition;

/// Wire tag for sync messages
const SYNC_KIND: &str = "sync";

/// A broadcast sync message
///
/// Immutable once constructed. `emitted_at` lets a receiver estimate how long
/// the message spent in flight; the drift controller does not use it — the
/// position is treated as "now" at receipt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncMessage {
    /// Authoritative playback position at emission time
    pub position: StreamPosition,
    /// Emission time, milliseconds since the Unix epoch
    pub emitted_at: u64,
}

/// Serialized form, permissive on decode
#[derive(Serialize, Deserialize)]
struct WireSyncMessage {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    position: Option<f64>,
    #[serde(rename = "emittedAt", default)]
    emitted_at: u64,
}

impl SyncMessage {
    /// Create a message stamped with the current wall-clock time
    pub fn new(position: StreamPosition) -> Self {
        Self {
            position,
            emitted_at: epoch_millis(),
        }
    }

    /// Create a message with an explicit emission timestamp
    pub fn with_emitted_at(position: StreamPosition, emitted_at: u64) -> Self {
        Self {
            position,
            emitted_at,
        }
    }

    /// Encode to the JSON wire form
    pub fn encode(&self) -> Bytes {
        let wire = WireSyncMessage {
            kind: SYNC_KIND.to_string(),
            position: Some(self.position.as_secs()),
            emitted_at: self.emitted_at,
        };

        // A flat struct of primitives cannot fail to serialize
        let json = serde_json::to_vec(&wire).unwrap_or_default();
        Bytes::from(json)
    }

    /// Decode from the wire, tolerating junk
    ///
    /// Returns `None` for anything that is not a well-formed sync message:
    /// invalid JSON, wrong `type`, missing or non-finite or negative
    /// `position`. Unknown fields are ignored. Callers treat `None` as a
    /// no-op, never a fault.
    pub fn decode(payload: &[u8]) -> Option<Self> {
        let wire: WireSyncMessage = match serde_json::from_slice(payload) {
            Ok(wire) => wire,
            Err(e) => {
                tracing::debug!(error = %e, "Dropping unparseable sync payload");
                return None;
            }
        };

        if wire.kind != SYNC_KIND {
            tracing::debug!(kind = %wire.kind, "Dropping message of unknown type");
            return None;
        }

        match wire.position {
            Some(secs) if secs.is_finite() && secs >= 0.0 => Some(Self {
                position: StreamPosition::from_secs(secs),
                emitted_at: wire.emitted_at,
            }),
            other => {
                tracing::debug!(position = ?other, "Dropping sync message with bad position");
                None
            }
        }
    }

    /// Estimated in-flight age in milliseconds, for observability only
    ///
    /// Saturates at zero when clocks disagree and the message appears to come
    /// from the future.
    pub fn age_ms(&self, now_epoch_ms: u64) -> u64 {
        now_epoch_ms.saturating_sub(self.emitted_at)
    }
}

/// Current wall-clock time as milliseconds since the Unix epoch
pub(crate) fn epoch_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        let msg = SyncMessage::with_emitted_at(StreamPosition::from_secs(12.5), 1_700_000_000_000);
        let bytes = msg.encode();

        let decoded = SyncMessage::decode(&bytes).unwrap();
        assert_eq!(decoded.position.as_secs(), 12.5);
        assert_eq!(decoded.emitted_at, 1_700_000_000_000);
    }

    #[test]
    fn test_wire_shape() {
        let msg = SyncMessage::with_emitted_at(StreamPosition::from_secs(3.0), 42);
        let json: serde_json::Value = serde_json::from_slice(&msg.encode()).unwrap();

        assert_eq!(json["type"], "sync");
        assert_eq!(json["position"], 3.0);
        assert_eq!(json["emittedAt"], 42);
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let payload = br#"{"type":"sync","position":7.0,"emittedAt":1,"serverId":"a","extra":[1,2]}"#;
        let decoded = SyncMessage::decode(payload).unwrap();
        assert_eq!(decoded.position.as_secs(), 7.0);
    }

    #[test]
    fn test_decode_rejects_bad_position() {
        // Missing position
        assert!(SyncMessage::decode(br#"{"type":"sync","emittedAt":1}"#).is_none());
        // Wrong type for position
        assert!(SyncMessage::decode(br#"{"type":"sync","position":"soon"}"#).is_none());
        // Negative position
        assert!(SyncMessage::decode(br#"{"type":"sync","position":-1.0}"#).is_none());
    }

    #[test]
    fn test_decode_rejects_wrong_kind_and_junk() {
        assert!(SyncMessage::decode(br#"{"type":"chat","position":1.0}"#).is_none());
        assert!(SyncMessage::decode(b"not json at all").is_none());
        assert!(SyncMessage::decode(b"").is_none());
    }

    #[test]
    fn test_missing_emitted_at_defaults() {
        let decoded = SyncMessage::decode(br#"{"type":"sync","position":1.0}"#).unwrap();
        assert_eq!(decoded.emitted_at, 0);
    }

    #[test]
    fn test_age_saturates() {
        let msg = SyncMessage::with_emitted_at(StreamPosition::ZERO, 1000);
        assert_eq!(msg.age_ms(1500), 500);
        // Message "from the future" reports zero age
        assert_eq!(msg.age_ms(500), 0);
    }
}
