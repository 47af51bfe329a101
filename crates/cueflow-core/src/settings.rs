//! User settings slice.
//!
//! Persisted alongside the rivalry history. Components that react to the
//! toggles (audio, haptics) hold a [`SharedSettings`] handle and read it on
//! every event, so a change applies from the next tick onwards.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

/// What the settings screen offers: follow the OS, or a fixed theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeOption {
    Auto,
    Light,
    Dark,
}

impl std::str::FromStr for ThemeOption {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "system" => Ok(ThemeOption::Auto),
            "light" => Ok(ThemeOption::Light),
            "dark" => Ok(ThemeOption::Dark),
            other => Err(ValidationError::InvalidValue {
                field: "theme".into(),
                message: format!("expected auto, light or dark, got '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub theme: ThemeMode,
    #[serde(default = "default_true")]
    pub use_system_theme: bool,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default = "default_true")]
    pub haptic_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Dark,
            use_system_theme: true,
            sound_enabled: true,
            haptic_enabled: true,
        }
    }
}

impl Settings {
    /// Pinning a theme stops following the system theme.
    pub fn set_theme(&mut self, theme: ThemeMode) {
        self.theme = theme;
        self.use_system_theme = false;
    }

    pub fn toggle_theme(&mut self) {
        let next = match self.theme {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        };
        self.set_theme(next);
    }

    pub fn set_use_system_theme(&mut self, enabled: bool) {
        self.use_system_theme = enabled;
    }

    pub fn select_theme_option(&mut self, option: ThemeOption) {
        match option {
            ThemeOption::Auto => self.set_use_system_theme(true),
            ThemeOption::Light => self.set_theme(ThemeMode::Light),
            ThemeOption::Dark => self.set_theme(ThemeMode::Dark),
        }
    }

    pub fn theme_option(&self) -> ThemeOption {
        if self.use_system_theme {
            return ThemeOption::Auto;
        }
        match self.theme {
            ThemeMode::Light => ThemeOption::Light,
            ThemeMode::Dark => ThemeOption::Dark,
        }
    }

    pub fn toggle_sound(&mut self) {
        self.sound_enabled = !self.sound_enabled;
    }

    pub fn toggle_haptic(&mut self) {
        self.haptic_enabled = !self.haptic_enabled;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Shared, thread-safe handle to the settings slice.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<Settings>>,
}

impl SharedSettings {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    pub fn get(&self) -> Settings {
        *self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut Settings) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn sound_enabled(&self) -> bool {
        self.get().sound_enabled
    }

    pub fn haptic_enabled(&self) -> bool {
        self.get().haptic_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_system_with_cues_on() {
        let s = Settings::default();
        assert_eq!(s.theme, ThemeMode::Dark);
        assert!(s.use_system_theme);
        assert!(s.sound_enabled);
        assert!(s.haptic_enabled);
        assert_eq!(s.theme_option(), ThemeOption::Auto);
    }

    #[test]
    fn set_theme_leaves_system_mode() {
        let mut s = Settings::default();
        s.toggle_theme();
        assert_eq!(s.theme, ThemeMode::Light);
        assert!(!s.use_system_theme);
        assert_eq!(s.theme_option(), ThemeOption::Light);

        s.select_theme_option(ThemeOption::Auto);
        assert_eq!(s.theme_option(), ThemeOption::Auto);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["useSystemTheme"], true);
        assert_eq!(json["soundEnabled"], true);
        assert_eq!(json["hapticEnabled"], true);
        assert_eq!(json["theme"], "dark");
    }

    #[test]
    fn missing_fields_take_defaults() {
        let s: Settings = serde_json::from_str(r#"{"theme":"light"}"#).unwrap();
        assert_eq!(s.theme, ThemeMode::Light);
        assert!(s.sound_enabled);
    }

    #[test]
    fn shared_handle_sees_updates() {
        let shared = SharedSettings::default();
        let reader = shared.clone();
        shared.update(Settings::toggle_sound);
        assert!(!reader.sound_enabled());
        shared.update(|s| s.reset());
        assert!(reader.sound_enabled());
    }
}
