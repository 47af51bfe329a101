//! Vibration feedback.
//!
//! Runs parallel to the audio cues with its own threshold. Pulses are
//! fire-and-forget: unsupported devices and backend errors are ignored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::HapticsConfig;
use crate::events::{TimerEvent, TimerListener};
use crate::settings::SharedSettings;
use crate::timer::TimerPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HapticPulse {
    Light,
    Medium,
    Heavy,
    Warning,
    Success,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HapticError {
    #[error("haptic engine unavailable")]
    Unavailable,
    #[error("haptic backend failed: {0}")]
    Backend(String),
}

pub trait HapticEngine: Send {
    /// Whether the device can vibrate at all.
    fn is_supported(&self) -> bool;
    fn pulse(&mut self, pulse: HapticPulse) -> Result<(), HapticError>;
}

/// Engine for devices without a vibration motor.
#[derive(Debug, Default)]
pub struct NoHaptics;

impl HapticEngine for NoHaptics {
    fn is_supported(&self) -> bool {
        false
    }

    fn pulse(&mut self, _pulse: HapticPulse) -> Result<(), HapticError> {
        Err(HapticError::Unavailable)
    }
}

pub struct HapticDispatcher {
    engine: Box<dyn HapticEngine>,
    settings: SharedSettings,
    threshold_secs: u64,
    last_pulsed_second: Option<u64>,
}

impl HapticDispatcher {
    pub fn new(engine: Box<dyn HapticEngine>, settings: SharedSettings, config: HapticsConfig) -> Self {
        Self {
            engine,
            settings,
            threshold_secs: config.threshold_secs,
            last_pulsed_second: None,
        }
    }

    /// Fire a pulse if haptics are enabled and the device supports them.
    pub fn fire(&mut self, pulse: HapticPulse) {
        if !self.settings.haptic_enabled() || !self.engine.is_supported() {
            return;
        }
        if let Err(err) = self.engine.pulse(pulse) {
            tracing::debug!(?pulse, error = %err, "haptic pulse dropped");
        }
    }

    pub fn handle_tick(&mut self, seconds: u64) {
        if seconds == 0 || seconds > self.threshold_secs {
            return;
        }
        if self.last_pulsed_second == Some(seconds) {
            return;
        }
        self.last_pulsed_second = Some(seconds);
        self.fire(HapticPulse::Light);
    }
}

impl TimerListener for HapticDispatcher {
    fn on_timer_event(&mut self, event: &TimerEvent) {
        match event {
            TimerEvent::Tick { seconds } => self.handle_tick(*seconds),
            TimerEvent::Expired => self.fire(HapticPulse::Warning),
            TimerEvent::StateChanged { to, .. } => {
                if *to == TimerPhase::Idle || event.is_fresh_start() {
                    self.last_pulsed_second = None;
                }
            }
            TimerEvent::PlayerSwitch => {}
        }
    }
}
