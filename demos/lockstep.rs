//! In-process sync demo: one broadcast scheduler, two simulated viewers
//!
//! Run with: cargo run --example lockstep
//!
//! A wall clock drives the authoritative position. Two fake players start
//! offset from it — one slightly behind (rate nudge territory), one far ahead
//! (seek territory) — and converge over a few fast broadcast ticks. Watch the
//! positions pull together in the printed lines.

use std::sync::Arc;
use std::time::Duration;

use streamsync::clock::{ClockSource, WallClock};
use streamsync::drift::actuator::FakeActuator;
use streamsync::drift::PlaybackActuator;
use streamsync::{
    BroadcastConfig, BroadcastScheduler, DriftController, StreamPosition, SyncMessage,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("streamsync=debug".parse()?)
                .add_directive("lockstep=info".parse()?),
        )
        .init();

    let clock = Arc::new(WallClock::starting_at(StreamPosition::from_secs(60.0)));

    // Fast ticks so the demo converges in a couple of seconds
    let config = BroadcastConfig::default().interval(Duration::from_millis(250));
    let scheduler = Arc::new(BroadcastScheduler::with_config(clock.clone(), config));

    // Viewer 1 runs 0.3s behind: close enough for rate nudges
    let rx1 = scheduler.open_session(1).await?;
    let viewer1 = tokio::spawn(run_viewer("viewer-1", FakeActuator::at(59.7), rx1));

    // Viewer 2 is 5s ahead: the first sync message forces a seek
    let rx2 = scheduler.open_session(2).await?;
    let viewer2 = tokio::spawn(run_viewer("viewer-2", FakeActuator::at(65.0), rx2));

    let broadcast_task = scheduler.spawn();

    tokio::time::sleep(Duration::from_secs(3)).await;

    broadcast_task.abort();
    scheduler.unregister(1).await;
    scheduler.unregister(2).await;

    let a1 = viewer1.await?;
    let a2 = viewer2.await?;

    let target = clock.current_position().unwrap().as_secs();
    println!();
    println!("final target position : {:8.3}s", target);
    println!(
        "viewer-1 position     : {:8.3}s  (off by {:+.3}s, {} seeks)",
        a1.position(),
        a1.position() - target,
        a1.seek_count()
    );
    println!(
        "viewer-2 position     : {:8.3}s  (off by {:+.3}s, {} seeks)",
        a2.position(),
        a2.position() - target,
        a2.seek_count()
    );
    println!("scheduler stats       : {:?}", scheduler.stats().snapshot());

    Ok(())
}

/// Drive one simulated viewer: playback advances between sync messages at
/// whatever rate the controller last set.
async fn run_viewer(
    name: &'static str,
    mut actuator: FakeActuator,
    mut rx: tokio::sync::mpsc::Receiver<bytes::Bytes>,
) -> FakeActuator {
    let mut controller = DriftController::new();
    let mut last = tokio::time::Instant::now();

    while let Some(payload) = rx.recv().await {
        // Simulate playback progress since the last message
        actuator.advance(last.elapsed().as_secs_f64());
        last = tokio::time::Instant::now();

        let Some(message) = SyncMessage::decode(&payload) else {
            continue;
        };
        let correction = controller.correct(message.position, &mut actuator);

        println!(
            "{name}: position={:8.3}s rate={:.3} correction={:?}",
            actuator.position(),
            actuator.rate(),
            correction
        );
    }

    actuator
}
