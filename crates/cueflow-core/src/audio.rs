//! Timer audio cues.
//!
//! Maps the tick stream to three cues: a looping "ticking" sound for the
//! closing seconds, a short beep per second at the very end, and one long
//! beep on expiry. Audio is an enhancement channel: every playback failure is
//! logged and swallowed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AudioConfig;
use crate::events::{TimerEvent, TimerListener};
use crate::settings::SharedSettings;
use crate::timer::TimerPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Beep,
    ExpireBeep,
    Ticking,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("audio cue {0:?} is not loaded yet")]
    NotReady(Cue),
    #[error("audio backend failed: {0}")]
    Backend(String),
}

/// Playback backend.
pub trait AudioPlayer: Send {
    fn play_once(&mut self, cue: Cue) -> Result<(), AudioError>;
    fn start_loop(&mut self, cue: Cue) -> Result<(), AudioError>;
    fn stop_loop(&mut self, cue: Cue) -> Result<(), AudioError>;
}

/// Backend that plays nothing. Used when no audio device is available.
#[derive(Debug, Default)]
pub struct SilentPlayer;

impl AudioPlayer for SilentPlayer {
    fn play_once(&mut self, _cue: Cue) -> Result<(), AudioError> {
        Ok(())
    }

    fn start_loop(&mut self, _cue: Cue) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop_loop(&mut self, _cue: Cue) -> Result<(), AudioError> {
        Ok(())
    }
}

pub struct TimerAudioCoordinator {
    player: Box<dyn AudioPlayer>,
    settings: SharedSettings,
    thresholds: AudioConfig,
    /// Second that last produced a cue; cleared only when a new countdown
    /// begins, so pause/resume never replays a second.
    last_played_second: Option<u64>,
    ticking: bool,
}

impl TimerAudioCoordinator {
    pub fn new(player: Box<dyn AudioPlayer>, settings: SharedSettings, thresholds: AudioConfig) -> Self {
        Self {
            player,
            settings,
            thresholds,
            last_played_second: None,
            ticking: false,
        }
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    pub fn handle_tick(&mut self, seconds: u64) {
        if !self.settings.sound_enabled() {
            self.stop_ticking();
            return;
        }
        if self.last_played_second == Some(seconds) {
            return;
        }
        self.last_played_second = Some(seconds);

        if seconds == 0 {
            self.play_expire();
            return;
        }

        if seconds <= self.thresholds.ticking_threshold_secs {
            self.start_ticking();
        } else {
            self.stop_ticking();
        }

        if seconds <= self.thresholds.beep_threshold_secs {
            self.play(Cue::Beep);
        }
    }

    /// Expiry may arrive without a zero tick (e.g. listeners attached late);
    /// the cue still plays exactly once per countdown.
    pub fn handle_expired(&mut self) {
        if !self.settings.sound_enabled() {
            self.stop_ticking();
            return;
        }
        if self.last_played_second == Some(0) {
            self.stop_ticking();
            return;
        }
        self.last_played_second = Some(0);
        self.play_expire();
    }

    /// Safe to call repeatedly.
    pub fn stop_ticking(&mut self) {
        if !self.ticking {
            return;
        }
        self.ticking = false;
        if let Err(err) = self.player.stop_loop(Cue::Ticking) {
            tracing::warn!(error = %err, "failed to stop ticking loop");
        }
    }

    /// Forget which seconds already played. Called when a new countdown
    /// begins from full duration.
    pub fn reset(&mut self) {
        self.last_played_second = None;
    }

    /// A paused countdown picked up again. The second already played is not
    /// replayed, but the ticking loop stopped by the pause comes straight back
    /// if that second was inside the ticking window.
    pub fn handle_resume(&mut self) {
        if !self.settings.sound_enabled() {
            return;
        }
        if let Some(seconds) = self.last_played_second {
            if (1..=self.thresholds.ticking_threshold_secs).contains(&seconds) {
                self.start_ticking();
            }
        }
    }

    fn start_ticking(&mut self) {
        if self.ticking {
            return;
        }
        match self.player.start_loop(Cue::Ticking) {
            Ok(()) => self.ticking = true,
            Err(err) => tracing::warn!(error = %err, "failed to start ticking loop"),
        }
    }

    fn play_expire(&mut self) {
        self.stop_ticking();
        self.play(Cue::ExpireBeep);
    }

    fn play(&mut self, cue: Cue) {
        if let Err(err) = self.player.play_once(cue) {
            tracing::warn!(?cue, error = %err, "failed to play cue");
        }
    }
}

impl TimerListener for TimerAudioCoordinator {
    fn on_timer_event(&mut self, event: &TimerEvent) {
        match event {
            TimerEvent::Tick { seconds } => self.handle_tick(*seconds),
            TimerEvent::Expired => self.handle_expired(),
            TimerEvent::StateChanged { from, to } => {
                if event.is_interruption() {
                    self.stop_ticking();
                }
                if *to == TimerPhase::Idle || event.is_fresh_start() {
                    self.reset();
                } else if *from == TimerPhase::Paused && *to == TimerPhase::Running {
                    self.handle_resume();
                }
            }
            TimerEvent::PlayerSwitch => {}
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex, PoisonError};

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Call {
        Play(Cue),
        StartLoop(Cue),
        StopLoop(Cue),
    }

    /// Records backend calls; can be told to report "not ready".
    #[derive(Debug, Clone, Default)]
    pub struct RecordingPlayer {
        pub calls: Arc<Mutex<Vec<Call>>>,
        pub not_ready: Arc<Mutex<bool>>,
    }

    impl RecordingPlayer {
        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
        }

        pub fn count(&self, call: Call) -> usize {
            self.calls().into_iter().filter(|c| *c == call).count()
        }

        pub fn set_not_ready(&self, value: bool) {
            *self.not_ready.lock().unwrap_or_else(PoisonError::into_inner) = value;
        }

        fn record(&mut self, call: Call, cue: Cue) -> Result<(), AudioError> {
            if *self.not_ready.lock().unwrap_or_else(PoisonError::into_inner) {
                return Err(AudioError::NotReady(cue));
            }
            self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(call);
            Ok(())
        }
    }

    impl AudioPlayer for RecordingPlayer {
        fn play_once(&mut self, cue: Cue) -> Result<(), AudioError> {
            self.record(Call::Play(cue), cue)
        }

        fn start_loop(&mut self, cue: Cue) -> Result<(), AudioError> {
            self.record(Call::StartLoop(cue), cue)
        }

        fn stop_loop(&mut self, cue: Cue) -> Result<(), AudioError> {
            self.record(Call::StopLoop(cue), cue)
        }
    }
}
