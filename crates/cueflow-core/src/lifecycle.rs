//! Foreground/background tracking.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// OS-reported application status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppStatus {
    #[default]
    Active,
    Background,
    /// Transitional state, e.g. an incoming call overlay.
    Inactive,
}

impl AppStatus {
    pub fn is_active(self) -> bool {
        self == AppStatus::Active
    }
}

impl fmt::Display for AppStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppStatus::Active => "active",
            AppStatus::Background => "background",
            AppStatus::Inactive => "inactive",
        };
        f.write_str(s)
    }
}

impl FromStr for AppStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(AppStatus::Active),
            "background" => Ok(AppStatus::Background),
            "inactive" => Ok(AppStatus::Inactive),
            other => Err(ValidationError::InvalidValue {
                field: "app_status".into(),
                message: format!("unknown app status '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleChange {
    /// Left the foreground.
    Backgrounded,
    /// Came back to the foreground.
    Foregrounded,
}

/// Remembers the last status and reports edges between active and not.
#[derive(Debug, Clone, Default)]
pub struct AppLifecycle {
    current: AppStatus,
}

impl AppLifecycle {
    pub fn new(initial: AppStatus) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> AppStatus {
        self.current
    }

    pub fn transition(&mut self, next: AppStatus) -> Option<LifecycleChange> {
        let previous = std::mem::replace(&mut self.current, next);
        match (previous.is_active(), next.is_active()) {
            (true, false) => Some(LifecycleChange::Backgrounded),
            (false, true) => Some(LifecycleChange::Foregrounded),
            _ => None,
        }
    }
}
