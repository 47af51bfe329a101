//! Cross-thread timer handle and the frame loop that drives it.
//!
//! The engine sits behind a mutex. Whoever holds the lock owns the write:
//! the frame loop while a countdown runs, the logic thread for commands.
//! After every write the handle publishes a [`TimerSnapshot`] on a `watch`
//! channel for the display and forwards the emitted events over an `mpsc`
//! channel to the logic thread.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::duration::TimerDuration;
use super::engine::{TimerEngine, TimerPhase, TimerSnapshot};
use crate::events::TimerEvent;

/// Roughly one display refresh at 60 Hz.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

struct Inner {
    engine: Mutex<TimerEngine>,
    snapshots: watch::Sender<TimerSnapshot>,
    running: watch::Sender<bool>,
    events: mpsc::UnboundedSender<TimerEvent>,
}

/// Cheaply clonable handle to one session's timer.
#[derive(Clone)]
pub struct SharedTimer {
    inner: Arc<Inner>,
}

impl SharedTimer {
    /// Create an idle timer and the receiving end of its event stream.
    pub fn new(duration: TimerDuration) -> (Self, mpsc::UnboundedReceiver<TimerEvent>) {
        let engine = TimerEngine::new(duration);
        let (snapshots, _) = watch::channel(engine.snapshot());
        let (running, _) = watch::channel(false);
        let (events, rx) = mpsc::unbounded_channel();
        let timer = Self {
            inner: Arc::new(Inner {
                engine: Mutex::new(engine),
                snapshots,
                running,
                events,
            }),
        };
        (timer, rx)
    }

    /// Run `f` against the engine, then publish the new snapshot and events.
    ///
    /// Publication happens under the engine lock, so readers observe writes
    /// in the order they were made.
    pub fn apply<F>(&self, f: F) -> usize
    where
        F: FnOnce(&mut TimerEngine) -> Vec<TimerEvent>,
    {
        let mut engine = self.lock();
        let events = f(&mut engine);
        self.publish(engine.snapshot(), &events);
        events.len()
    }

    pub fn start(&self) -> usize {
        self.apply(TimerEngine::start)
    }

    pub fn stop(&self) -> usize {
        self.apply(TimerEngine::stop)
    }

    pub fn pause(&self) -> usize {
        self.apply(TimerEngine::pause)
    }

    pub fn resume(&self) -> usize {
        self.apply(TimerEngine::resume)
    }

    pub fn reset(&self) -> usize {
        self.apply(TimerEngine::reset)
    }

    pub fn tap(&self) -> usize {
        self.apply(TimerEngine::tap)
    }

    pub fn advance(&self, elapsed: Duration) -> usize {
        self.apply(|engine| engine.advance(elapsed))
    }

    pub fn set_duration(&self, duration: TimerDuration) {
        self.apply(|engine| {
            engine.set_duration(duration);
            Vec::new()
        });
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.lock().snapshot()
    }

    pub fn phase(&self) -> TimerPhase {
        self.lock().phase()
    }

    /// Display feed. Always holds the latest snapshot.
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.inner.snapshots.subscribe()
    }

    /// True while the frame loop should be invoked.
    pub fn activity(&self) -> watch::Receiver<bool> {
        self.inner.running.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, TimerEngine> {
        self.inner
            .engine
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, snapshot: TimerSnapshot, events: &[TimerEvent]) {
        let running = snapshot.phase == TimerPhase::Running;
        self.inner.snapshots.send_replace(snapshot);
        self.inner.running.send_if_modified(|current| {
            if *current == running {
                return false;
            }
            *current = running;
            true
        });
        for event in events {
            // The session may already be gone during teardown.
            let _ = self.inner.events.send(*event);
        }
    }
}

/// Background task that feeds frame deltas into a [`SharedTimer`].
///
/// The loop parks on the timer's activity flag whenever the phase is not
/// `Running`, so pausing or stopping halts frame delivery entirely.
pub struct FrameDriver {
    handle: JoinHandle<()>,
}

impl FrameDriver {
    /// Spawn the frame loop on the current tokio runtime.
    pub fn spawn(timer: SharedTimer, frame_interval: Duration) -> Self {
        let handle = tokio::spawn(run_frames(timer, frame_interval));
        Self { handle }
    }
}

impl Drop for FrameDriver {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run_frames(timer: SharedTimer, frame_interval: Duration) {
    let mut activity = timer.activity();
    loop {
        if activity.wait_for(|running| *running).await.is_err() {
            return;
        }

        let mut frames = tokio::time::interval(frame_interval);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        frames.tick().await;
        let mut last_frame = Instant::now();

        loop {
            tokio::select! {
                _ = frames.tick() => {
                    let now = Instant::now();
                    timer.advance(now - last_frame);
                    last_frame = now;
                }
                changed = activity.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    // Re-arm from the outer loop so a pause never counts
                    // towards the next frame delta.
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timer(secs: u64) -> (SharedTimer, mpsc::UnboundedReceiver<TimerEvent>) {
        SharedTimer::new(TimerDuration::from_secs(secs).unwrap())
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<TimerEvent>) -> Vec<TimerEvent> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            out.push(event);
        }
        out
    }

    #[test]
    fn commands_publish_snapshot_and_events() {
        let (timer, mut rx) = timer(10);
        let display = timer.subscribe();
        timer.start();
        assert_eq!(display.borrow().phase, TimerPhase::Running);
        assert!(*timer.activity().borrow());

        timer.advance(Duration::from_millis(1_200));
        assert_eq!(display.borrow().remaining_ms, 8_800);

        let events = drain(&mut rx);
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], TimerEvent::Tick { seconds: 9 });
    }

    #[test]
    fn activity_drops_on_pause() {
        let (timer, _rx) = timer(10);
        timer.start();
        timer.pause();
        assert!(!*timer.activity().borrow());
        assert_eq!(timer.phase(), TimerPhase::Paused);
    }

    #[test]
    fn concurrent_writers_publish_in_mutation_order() {
        let (timer, mut rx) = timer(1_000);
        let display = timer.subscribe();
        let activity = timer.activity();

        std::thread::scope(|scope| {
            let frames = timer.clone();
            scope.spawn(move || {
                for _ in 0..5_000 {
                    frames.advance(Duration::from_millis(3));
                }
            });
            for i in 0..2_000 {
                if i % 2 == 0 {
                    timer.start();
                } else {
                    timer.reset();
                }
            }
        });

        // A tick may only follow a transition into Running.
        let mut phase = TimerPhase::Idle;
        for event in drain(&mut rx) {
            match event {
                TimerEvent::StateChanged { from, to } => {
                    assert_eq!(from, phase);
                    phase = to;
                }
                TimerEvent::Tick { .. } => assert_eq!(phase, TimerPhase::Running),
                _ => {}
            }
        }
        assert_eq!(phase, timer.phase());
        assert_eq!(*display.borrow(), timer.snapshot());
        assert_eq!(*activity.borrow(), timer.phase() == TimerPhase::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn driver_counts_down_to_expiry() {
        let (timer, mut rx) = timer(3);
        let _driver = FrameDriver::spawn(timer.clone(), DEFAULT_FRAME_INTERVAL);
        timer.start();

        tokio::time::sleep(Duration::from_secs(4)).await;

        let events = drain(&mut rx);
        let ticks: Vec<u64> = events
            .iter()
            .filter_map(|e| match e {
                TimerEvent::Tick { seconds } => Some(*seconds),
                _ => None,
            })
            .collect();
        assert_eq!(ticks, vec![3, 2, 1, 0]);
        assert_eq!(events.iter().filter(|e| **e == TimerEvent::Expired).count(), 1);
        assert_eq!(timer.phase(), TimerPhase::Expired);
        assert!(!*timer.activity().borrow());
    }

    #[tokio::test(start_paused = true)]
    async fn driver_halts_while_paused() {
        let (timer, mut rx) = timer(10);
        let _driver = FrameDriver::spawn(timer.clone(), DEFAULT_FRAME_INTERVAL);
        timer.start();
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        timer.pause();
        let frozen = timer.snapshot().remaining_ms;
        drain(&mut rx);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(timer.snapshot().remaining_ms, frozen);
        assert!(drain(&mut rx).is_empty());

        timer.resume();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(timer.snapshot().remaining_ms < frozen);
    }
}
