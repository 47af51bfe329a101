//! Turn timer engine.
//!
//! The engine is a frame-driven state machine. It owns no thread and no side
//! effects: the caller feeds it elapsed time once per display frame through
//! [`TimerEngine::advance`] and routes the returned events to listeners.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused | Expired)
//! Paused -> Running
//! Running -> Idle      (stop / reset)
//! Expired -> Idle      (tap / reset)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(TimerDuration::from_secs(30)?);
//! engine.start();
//! // Once per frame:
//! for event in engine.advance(frame_delta) { /* dispatch */ }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::duration::TimerDuration;
use crate::events::TimerEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
    /// Countdown reached zero and is waiting for acknowledgement.
    Expired,
}

/// Per-frame view of the engine handed to the display layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub remaining_ms: u64,
    pub total_ms: u64,
    pub phase: TimerPhase,
    /// `remaining_ms / total_ms`, 1.0 when full and 0.0 when expired.
    pub progress: f64,
}

impl TimerSnapshot {
    /// Whole seconds left, as shown in the timer text.
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_ms.div_ceil(1000)
    }
}

/// Core turn timer.
///
/// Remaining time is tracked at nanosecond resolution so that sub-millisecond
/// frame deltas accumulate without drift.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    total: Duration,
    remaining: Duration,
    phase: TimerPhase,
    /// Last whole-second value reported through a tick event.
    last_tick_second: Option<u64>,
}

impl TimerEngine {
    /// Create an idle engine at full duration.
    pub fn new(duration: TimerDuration) -> Self {
        let total = duration.as_duration();
        Self {
            total,
            remaining: total,
            phase: TimerPhase::Idle,
            last_tick_second: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    pub fn remaining_ms(&self) -> u64 {
        whole_millis(self.remaining)
    }

    pub fn total_ms(&self) -> u64 {
        whole_millis(self.total)
    }

    /// 1.0 .. 0.0 fraction of the turn left. Always derived, never stored.
    pub fn progress(&self) -> f64 {
        let total = self.total.as_secs_f64();
        if total == 0.0 {
            return 0.0;
        }
        (self.remaining.as_secs_f64() / total).clamp(0.0, 1.0)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            remaining_ms: self.remaining_ms(),
            total_ms: self.total_ms(),
            phase: self.phase,
            progress: self.progress(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a fresh countdown from `Idle` or `Expired`.
    pub fn start(&mut self) -> Vec<TimerEvent> {
        match self.phase {
            TimerPhase::Idle | TimerPhase::Expired => {
                self.refill();
                self.transition(TimerPhase::Running).into_iter().collect()
            }
            _ => Vec::new(),
        }
    }

    /// End a running turn early and hand over to the other player.
    pub fn stop(&mut self) -> Vec<TimerEvent> {
        if self.phase != TimerPhase::Running {
            return Vec::new();
        }
        self.refill();
        let mut events: Vec<TimerEvent> = self.transition(TimerPhase::Idle).into_iter().collect();
        events.push(TimerEvent::PlayerSwitch);
        events
    }

    pub fn pause(&mut self) -> Vec<TimerEvent> {
        if self.phase != TimerPhase::Running {
            return Vec::new();
        }
        self.transition(TimerPhase::Paused).into_iter().collect()
    }

    pub fn resume(&mut self) -> Vec<TimerEvent> {
        if self.phase != TimerPhase::Paused {
            return Vec::new();
        }
        self.transition(TimerPhase::Running).into_iter().collect()
    }

    /// Force `Idle` at full duration without a player switch.
    pub fn reset(&mut self) -> Vec<TimerEvent> {
        self.refill();
        self.transition(TimerPhase::Idle).into_iter().collect()
    }

    /// The single-gesture affordance of the timer face.
    ///
    /// Tapping an expired timer acknowledges it: the engine goes back to
    /// `Idle` at full duration and the turn passes, but the next countdown
    /// does not start on its own.
    pub fn tap(&mut self) -> Vec<TimerEvent> {
        match self.phase {
            TimerPhase::Idle => self.start(),
            TimerPhase::Running => self.stop(),
            TimerPhase::Paused => self.resume(),
            TimerPhase::Expired => {
                let mut events = self.reset();
                events.push(TimerEvent::PlayerSwitch);
                events
            }
        }
    }

    /// Change the turn length. An idle timer refills to the new length;
    /// otherwise remaining time is clamped so it never exceeds the total.
    pub fn set_duration(&mut self, duration: TimerDuration) {
        self.total = duration.as_duration();
        if self.phase == TimerPhase::Idle {
            self.refill();
        } else {
            self.remaining = self.remaining.min(self.total);
        }
    }

    /// Per-frame update. A no-op unless running.
    ///
    /// Emits at most one tick per call, so a long stall jumps straight to the
    /// current second instead of replaying the ones it skipped.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<TimerEvent> {
        if self.phase != TimerPhase::Running {
            return Vec::new();
        }

        self.remaining = self.remaining.saturating_sub(elapsed);

        let mut events = Vec::new();
        let second = whole_seconds(self.remaining);
        if self.last_tick_second != Some(second) {
            self.last_tick_second = Some(second);
            events.push(TimerEvent::Tick { seconds: second });
        }

        if self.remaining.is_zero() {
            events.extend(self.transition(TimerPhase::Expired));
            events.push(TimerEvent::Expired);
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn refill(&mut self) {
        self.remaining = self.total;
        self.last_tick_second = None;
    }

    fn transition(&mut self, to: TimerPhase) -> Option<TimerEvent> {
        let from = self.phase;
        if from == to {
            return None;
        }
        self.phase = to;
        tracing::debug!(?from, ?to, remaining_ms = self.remaining_ms(), "timer transition");
        Some(TimerEvent::StateChanged { from, to })
    }
}

fn whole_seconds(remaining: Duration) -> u64 {
    let secs = remaining.as_nanos().div_ceil(1_000_000_000);
    u64::try_from(secs).unwrap_or(u64::MAX)
}

fn whole_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(secs: u64) -> TimerEngine {
        TimerEngine::new(TimerDuration::from_secs(secs).unwrap())
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn start_pause_resume() {
        let mut engine = engine(30);
        assert_eq!(engine.phase(), TimerPhase::Idle);

        assert!(!engine.start().is_empty());
        assert_eq!(engine.phase(), TimerPhase::Running);

        assert!(!engine.pause().is_empty());
        assert_eq!(engine.phase(), TimerPhase::Paused);

        assert!(!engine.resume().is_empty());
        assert_eq!(engine.phase(), TimerPhase::Running);
    }

    #[test]
    fn invalid_transitions_are_noops() {
        let mut engine = engine(30);
        assert!(engine.pause().is_empty());
        assert!(engine.resume().is_empty());
        assert!(engine.stop().is_empty());
        assert!(engine.advance(ms(500)).is_empty());
        assert_eq!(engine.phase(), TimerPhase::Idle);
        assert_eq!(engine.remaining_ms(), 30_000);

        engine.start();
        assert!(engine.start().is_empty());
    }

    #[test]
    fn pause_freezes_remaining_time() {
        let mut engine = engine(10);
        engine.start();
        engine.advance(ms(1_500));
        engine.pause();
        engine.advance(ms(4_000));
        assert_eq!(engine.remaining_ms(), 8_500);

        engine.resume();
        engine.advance(ms(500));
        assert_eq!(engine.remaining_ms(), 8_000);
    }

    #[test]
    fn pause_and_resume_are_idempotent() {
        let mut engine = engine(10);
        engine.start();
        engine.advance(ms(1_000));
        engine.pause();
        let once = engine.snapshot();
        assert!(engine.pause().is_empty());
        assert_eq!(engine.snapshot(), once);

        engine.resume();
        assert!(engine.resume().is_empty());
        assert_eq!(engine.phase(), TimerPhase::Running);
    }

    #[test]
    fn reset_is_silent_and_idempotent() {
        let mut engine = engine(10);
        engine.start();
        engine.advance(ms(3_000));
        let events = engine.reset();
        assert_eq!(
            events,
            vec![TimerEvent::StateChanged {
                from: TimerPhase::Running,
                to: TimerPhase::Idle
            }]
        );
        assert!(engine.reset().is_empty());
        assert_eq!(engine.remaining_ms(), 10_000);
        assert_eq!(engine.progress(), 1.0);
    }

    #[test]
    fn stop_refills_and_switches_player() {
        let mut engine = engine(10);
        engine.start();
        engine.advance(ms(2_000));
        let events = engine.stop();
        assert_eq!(events.last(), Some(&TimerEvent::PlayerSwitch));
        assert_eq!(engine.phase(), TimerPhase::Idle);
        assert_eq!(engine.remaining_ms(), 10_000);
    }

    #[test]
    fn progress_tracks_remaining() {
        let mut engine = engine(30);
        engine.start();
        engine.advance(ms(4_900));
        assert_eq!(engine.remaining_ms(), 25_100);
        assert!((engine.progress() - 25_100.0 / 30_000.0).abs() < 1e-9);
        assert_eq!(engine.phase(), TimerPhase::Running);
    }

    #[test]
    fn tick_fires_once_when_crossing_second_boundary() {
        let mut engine = engine(30);
        engine.start();
        engine.advance(ms(4_900));

        let events = engine.advance(ms(101));
        assert_eq!(engine.remaining_ms(), 24_999);
        assert_eq!(events, vec![TimerEvent::Tick { seconds: 25 }]);

        assert!(engine.advance(ms(10)).is_empty());
    }

    #[test]
    fn ticks_are_complete_and_unique() {
        let mut engine = engine(5);
        engine.start();
        let mut ticks = Vec::new();
        let mut expiries = 0;
        for _ in 0..400 {
            for event in engine.advance(ms(16)) {
                match event {
                    TimerEvent::Tick { seconds } => ticks.push(seconds),
                    TimerEvent::Expired => expiries += 1,
                    _ => {}
                }
            }
        }
        assert_eq!(ticks, vec![5, 4, 3, 2, 1, 0]);
        assert_eq!(expiries, 1);
    }

    #[test]
    fn expiry_sets_zero_progress() {
        let mut engine = engine(5);
        engine.start();
        let events = engine.advance(ms(5_000));
        assert_eq!(engine.phase(), TimerPhase::Expired);
        assert_eq!(engine.remaining_ms(), 0);
        assert_eq!(engine.progress(), 0.0);
        assert!(events.contains(&TimerEvent::Expired));
    }

    #[test]
    fn long_stall_clamps_and_expires_once() {
        let mut engine = engine(30);
        engine.start();
        engine.advance(ms(16));
        let events = engine.advance(Duration::from_secs(600));
        assert_eq!(
            events,
            vec![
                TimerEvent::Tick { seconds: 0 },
                TimerEvent::StateChanged {
                    from: TimerPhase::Running,
                    to: TimerPhase::Expired
                },
                TimerEvent::Expired,
            ]
        );
        assert!(engine.advance(ms(16)).is_empty());
    }

    #[test]
    fn tap_on_expired_switches_without_restarting() {
        let mut engine = engine(5);
        engine.start();
        engine.advance(ms(6_000));
        assert_eq!(engine.phase(), TimerPhase::Expired);

        let events = engine.tap();
        assert_eq!(events.last(), Some(&TimerEvent::PlayerSwitch));
        assert_eq!(engine.phase(), TimerPhase::Idle);
        assert_eq!(engine.remaining_ms(), 5_000);
    }

    #[test]
    fn tap_cycles_through_phases() {
        let mut engine = engine(5);
        engine.tap();
        assert_eq!(engine.phase(), TimerPhase::Running);
        engine.pause();
        engine.tap();
        assert_eq!(engine.phase(), TimerPhase::Running);
        let events = engine.tap();
        assert!(events.contains(&TimerEvent::PlayerSwitch));
        assert_eq!(engine.phase(), TimerPhase::Idle);
    }

    #[test]
    fn start_from_expired_refills() {
        let mut engine = engine(3);
        engine.start();
        engine.advance(ms(3_000));
        engine.start();
        assert_eq!(engine.phase(), TimerPhase::Running);
        assert_eq!(engine.remaining_ms(), 3_000);
        assert_eq!(engine.advance(ms(1)), vec![TimerEvent::Tick { seconds: 3 }]);
    }

    #[test]
    fn set_duration_refills_idle_and_clamps_running() {
        let mut engine = engine(30);
        engine.set_duration(TimerDuration::from_secs(45).unwrap());
        assert_eq!(engine.remaining_ms(), 45_000);

        engine.start();
        engine.advance(ms(5_000));
        engine.set_duration(TimerDuration::from_secs(10).unwrap());
        assert_eq!(engine.remaining_ms(), 10_000);
        assert_eq!(engine.total_ms(), 10_000);
        assert!(engine.progress() <= 1.0);
    }

    #[test]
    fn snapshot_reports_whole_seconds() {
        let mut engine = engine(30);
        engine.start();
        engine.advance(ms(4_900));
        let snap = engine.snapshot();
        assert_eq!(snap.remaining_secs(), 26);
        assert_eq!(snap.phase, TimerPhase::Running);
    }
}
