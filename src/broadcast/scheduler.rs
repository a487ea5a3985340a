//! Broadcast scheduler implementation
//!
//! The coordinating half of the protocol: maintains the subscribed session
//! set and pushes the authoritative position to every session on a fixed
//! interval.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use tokio::sync::{mpsc, Mutex, RwLock};

use crate::clock::ClockSource;
use crate::protocol::{StreamPosition, SyncMessage};
use crate::stats::SchedulerStats;

use super::config::BroadcastConfig;
use super::error::BroadcastError;
use super::session::{ClientSession, DeliveryError, SessionHandle, SessionId};

/// Clock progression tracking, updated at most once per tick
///
/// Lives behind the tick mutex, which also guarantees ticks never overlap:
/// a tick that fires while the previous one is still delivering is skipped
/// rather than queued.
#[derive(Debug, Default)]
struct TickState {
    /// Highest position sampled so far
    last_position: Option<StreamPosition>,
    /// When the position last advanced
    last_advance: Option<Instant>,
}

/// Periodic sync broadcaster
///
/// Thread-safe via `RwLock` over the session map; `tick` takes a read
/// snapshot for delivery so registration never blocks behind slow I/O.
pub struct BroadcastScheduler {
    /// Authoritative position source, sampled once per tick
    clock: Arc<dyn ClockSource>,

    /// Map of connection identity to session
    sessions: RwLock<HashMap<SessionId, ClientSession>>,

    /// Tick serialization guard and clock progression tracking
    tick_state: Mutex<TickState>,

    /// Configuration
    config: BroadcastConfig,

    /// Counters
    stats: SchedulerStats,
}

impl BroadcastScheduler {
    /// Create a scheduler with default configuration
    pub fn new(clock: Arc<dyn ClockSource>) -> Self {
        Self::with_config(clock, BroadcastConfig::default())
    }

    /// Create a scheduler with custom configuration
    pub fn with_config(clock: Arc<dyn ClockSource>, config: BroadcastConfig) -> Self {
        Self {
            clock,
            sessions: RwLock::new(HashMap::new()),
            tick_state: Mutex::new(TickState::default()),
            config,
            stats: SchedulerStats::new(),
        }
    }

    /// Get the scheduler configuration
    pub fn config(&self) -> &BroadcastConfig {
        &self.config
    }

    /// Get the scheduler counters
    pub fn stats(&self) -> &SchedulerStats {
        &self.stats
    }

    /// Register a subscribed endpoint
    ///
    /// Keyed by transport-connection identity. Registering the same
    /// connection twice without unregistering is rejected.
    pub async fn register(
        &self,
        id: SessionId,
        handle: SessionHandle,
    ) -> Result<SessionId, BroadcastError> {
        let mut sessions = self.sessions.write().await;

        if sessions.contains_key(&id) {
            return Err(BroadcastError::AlreadyRegistered(id));
        }

        sessions.insert(id, ClientSession::new(id, handle));

        tracing::info!(
            session_id = id,
            sessions = sessions.len(),
            "Session registered"
        );

        Ok(id)
    }

    /// Build a delivery channel and register it in one step
    ///
    /// Convenience for transport adapters: the channel is sized from the
    /// configured `send_capacity`, and the returned receiver is the adapter's
    /// end — dropping it marks the session dead. Use [`register`] instead
    /// when the handle comes from elsewhere.
    ///
    /// [`register`]: BroadcastScheduler::register
    pub async fn open_session(
        &self,
        id: SessionId,
    ) -> Result<mpsc::Receiver<Bytes>, BroadcastError> {
        let (handle, rx) = SessionHandle::channel(self.config.send_capacity);
        self.register(id, handle).await?;
        Ok(rx)
    }

    /// Remove a subscribed endpoint
    ///
    /// A no-op when the id is already absent: disconnect races with send
    /// failures are expected, not faults.
    pub async fn unregister(&self, id: SessionId) {
        let mut sessions = self.sessions.write().await;

        if sessions.remove(&id).is_some() {
            tracing::info!(
                session_id = id,
                sessions = sessions.len(),
                "Session unregistered"
            );
        }
    }

    /// Record a position acknowledgment from a client
    ///
    /// Observability only; the broadcast loop never waits on acks.
    pub async fn record_ack(&self, id: SessionId, position: StreamPosition) {
        let mut sessions = self.sessions.write().await;

        if let Some(session) = sessions.get_mut(&id) {
            session.last_ack_position = Some(position);
        }
    }

    /// Last acknowledged position for a session, if any
    pub async fn last_ack(&self, id: SessionId) -> Option<StreamPosition> {
        self.sessions.read().await.get(&id)?.last_ack_position
    }

    /// Number of currently subscribed sessions
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Run one broadcast tick
    ///
    /// Samples the clock once, encodes one sync message, and delivers it to a
    /// point-in-time snapshot of the session set. Sessions whose delivery
    /// channel has closed are removed; a full channel only drops that tick's
    /// message for that session. The tick is skipped entirely when a previous
    /// tick is still running, when the clock has no position, or when the
    /// clock has stalled past the configured grace.
    pub async fn tick(&self) {
        // Overlap guard: skip rather than queue behind a slow tick
        let mut tick_state = match self.tick_state.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                self.stats.record_skipped_tick();
                tracing::warn!("Previous tick still in flight, skipping");
                return;
            }
        };

        let position = match self.clock.current_position() {
            Some(position) => position,
            None => {
                self.stats.record_skipped_tick();
                tracing::warn!("Clock has no position yet, skipping tick");
                return;
            }
        };

        if !self.clock_advanced(&mut tick_state, position) {
            self.stats.record_skipped_tick();
            return;
        }

        let position = match self.config.stream_duration {
            Some(duration) => position.clamp_to(duration),
            None => position,
        };

        self.stats.record_tick();

        let payload = SyncMessage::new(position).encode();

        // Snapshot under the read lock, deliver without it. Sessions added
        // after the snapshot catch the next tick; removed ones fail softly.
        let targets: Vec<(SessionId, SessionHandle)> = {
            let sessions = self.sessions.read().await;
            sessions
                .values()
                .map(|s| (s.id, s.handle.clone()))
                .collect()
        };

        let mut dead = Vec::new();
        for (id, handle) in targets {
            match handle.deliver(payload.clone()) {
                Ok(()) => self.stats.record_message_sent(),
                Err(DeliveryError::Closed) => {
                    self.stats.record_send_failure();
                    dead.push(id);
                }
                Err(DeliveryError::Full) => {
                    // Slow subscriber: drop this tick's message for it rather
                    // than queue without bound. It stays registered.
                    self.stats.record_send_failure();
                    tracing::debug!(session_id = id, "Session channel full, message dropped");
                }
            }
        }

        if !dead.is_empty() {
            let mut sessions = self.sessions.write().await;
            for id in dead {
                if sessions.remove(&id).is_some() {
                    self.stats.record_session_removed();
                    tracing::info!(session_id = id, "Session removed after failed send");
                }
            }
        }

        tracing::debug!(position = %position, "Sync broadcast");
    }

    /// Track clock progression; false means the tick must be skipped
    fn clock_advanced(&self, tick_state: &mut TickState, position: StreamPosition) -> bool {
        let now = Instant::now();

        let advanced = match tick_state.last_position {
            Some(last) => position > last,
            None => true,
        };

        if advanced {
            tick_state.last_position = Some(position);
            tick_state.last_advance = Some(now);
            return true;
        }

        // Non-advancing reads are tolerated within the grace period (paused
        // stream, coarse upstream updates), then treated as a stall.
        let stalled_for = tick_state
            .last_advance
            .map(|at| now.duration_since(at))
            .unwrap_or_default();

        if stalled_for > self.config.stall_grace {
            tracing::warn!(
                position = %position,
                stalled_secs = stalled_for.as_secs_f64(),
                "Clock stalled past grace period, skipping tick"
            );
            false
        } else {
            true
        }
    }

    /// Spawn the periodic broadcast task
    ///
    /// Returns a handle that can be used to abort the task. Missed timer
    /// ticks are skipped, not bursted.
    pub fn spawn(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let scheduler = Arc::clone(self);
        let interval = scheduler.config.interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                scheduler.tick().await;
            }
        })
    }
}
