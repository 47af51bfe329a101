use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Turn length presets offered at game setup, in seconds.
pub const TIMER_PRESETS: [u64; 6] = [10, 15, 20, 30, 45, 60];

/// Default turn length in seconds.
pub const DEFAULT_TIMER_SECS: u64 = 30;

/// Longest accepted turn: one day.
pub const MAX_TIMER_SECS: u64 = 86_400;

/// A whole-second turn length in `1..=MAX_TIMER_SECS`.
///
/// Zero is rejected on construction, so a configured engine can always
/// compute `remaining / total`; the upper bound keeps millisecond values
/// well inside `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct TimerDuration(u64);

impl TimerDuration {
    pub fn from_secs(secs: u64) -> Result<Self, ValidationError> {
        if secs == 0 {
            return Err(ValidationError::ZeroDuration(secs));
        }
        if secs > MAX_TIMER_SECS {
            return Err(ValidationError::DurationTooLong {
                secs,
                max: MAX_TIMER_SECS,
            });
        }
        Ok(Self(secs))
    }

    pub fn secs(self) -> u64 {
        self.0
    }

    pub fn as_millis(self) -> u64 {
        self.0 * 1000
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl Default for TimerDuration {
    fn default() -> Self {
        Self(DEFAULT_TIMER_SECS)
    }
}

impl TryFrom<u64> for TimerDuration {
    type Error = ValidationError;

    fn try_from(secs: u64) -> Result<Self, Self::Error> {
        Self::from_secs(secs)
    }
}

impl From<TimerDuration> for u64 {
    fn from(duration: TimerDuration) -> Self {
        duration.0
    }
}

impl fmt::Display for TimerDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_rejected() {
        assert_eq!(
            TimerDuration::from_secs(0),
            Err(ValidationError::ZeroDuration(0))
        );
    }

    #[test]
    fn longer_than_a_day_is_rejected() {
        assert_eq!(TimerDuration::from_secs(MAX_TIMER_SECS).unwrap().secs(), 86_400);
        assert_eq!(
            TimerDuration::from_secs(MAX_TIMER_SECS + 1),
            Err(ValidationError::DurationTooLong {
                secs: 86_401,
                max: MAX_TIMER_SECS,
            })
        );
        assert!(TimerDuration::from_secs(u64::MAX).is_err());
    }

    #[test]
    fn converts_to_millis() {
        let d = TimerDuration::from_secs(30).unwrap();
        assert_eq!(d.as_millis(), 30_000);
        assert_eq!(d.as_duration(), Duration::from_secs(30));
    }

    #[test]
    fn deserialize_validates() {
        assert!(serde_json::from_str::<TimerDuration>("0").is_err());
        assert_eq!(
            serde_json::from_str::<TimerDuration>("45").unwrap().secs(),
            45
        );
    }
}
