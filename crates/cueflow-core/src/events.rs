use serde::{Deserialize, Serialize};

use crate::timer::TimerPhase;

/// Discrete output of the timer engine.
///
/// The engine returns these from every command and frame update; the
/// session forwards them to each [`TimerListener`] in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    /// Whole seconds remaining changed (`ceil(remaining_ms / 1000)`).
    Tick { seconds: u64 },
    /// Countdown reached zero. Fires once per countdown.
    Expired,
    StateChanged { from: TimerPhase, to: TimerPhase },
    /// The turn passes to the other player.
    PlayerSwitch,
}

impl TimerEvent {
    /// True when the transition begins a fresh countdown rather than
    /// continuing a paused one.
    pub fn is_fresh_start(&self) -> bool {
        matches!(
            self,
            TimerEvent::StateChanged {
                from,
                to: TimerPhase::Running,
            } if *from != TimerPhase::Paused
        )
    }

    /// True when the transition interrupts or ends the countdown.
    pub fn is_interruption(&self) -> bool {
        matches!(
            self,
            TimerEvent::StateChanged {
                to: TimerPhase::Idle | TimerPhase::Paused,
                ..
            }
        )
    }
}

/// Independent consumer of timer events (audio, haptics, tests).
pub trait TimerListener {
    fn on_timer_event(&mut self, event: &TimerEvent);
}

/// Collects every event it sees. Handy for tests and the CLI transcript.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<TimerEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TimerEvent] {
        &self.events
    }

    pub fn ticks(&self) -> Vec<u64> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TimerEvent::Tick { seconds } => Some(*seconds),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: TimerEvent) -> usize {
        self.events.iter().filter(|e| **e == wanted).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TimerListener for EventLog {
    fn on_timer_event(&mut self, event: &TimerEvent) {
        self.events.push(*event);
    }
}
