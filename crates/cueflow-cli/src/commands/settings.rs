use clap::{Subcommand, ValueEnum};
use cueflow_core::settings::{Settings, ThemeOption};

use super::open_store;

#[derive(Clone, Copy, ValueEnum)]
pub enum Switch {
    On,
    Off,
    Toggle,
}

impl Switch {
    fn apply(self, current: bool) -> bool {
        match self {
            Switch::On => true,
            Switch::Off => false,
            Switch::Toggle => !current,
        }
    }
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print current settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Turn timer sounds on or off
    Sound {
        #[arg(value_enum, default_value = "toggle")]
        state: Switch,
    },
    /// Turn vibration feedback on or off
    Haptic {
        #[arg(value_enum, default_value = "toggle")]
        state: Switch,
    },
    /// Choose a theme: auto (follow system), light or dark
    Theme {
        option: ThemeOption,
    },
    /// Restore default settings
    Reset,
}

fn print_settings(settings: &Settings) {
    println!("Theme:    {:?}", settings.theme_option());
    println!("Sound:    {}", on_off(settings.sound_enabled));
    println!("Haptics:  {}", on_off(settings.haptic_enabled));
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;
    match action {
        SettingsAction::Show { json } => {
            let settings = store.settings().get();
            if json {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            } else {
                print_settings(&settings);
            }
        }
        SettingsAction::Sound { state } => {
            let enabled = store.update_settings(|s| {
                s.sound_enabled = state.apply(s.sound_enabled);
                s.sound_enabled
            })?;
            println!("sound {}", on_off(enabled));
        }
        SettingsAction::Haptic { state } => {
            let enabled = store.update_settings(|s| {
                s.haptic_enabled = state.apply(s.haptic_enabled);
                s.haptic_enabled
            })?;
            println!("haptics {}", on_off(enabled));
        }
        SettingsAction::Theme { option } => {
            store.update_settings(|s| s.select_theme_option(option))?;
            println!("theme set to {option:?}");
        }
        SettingsAction::Reset => {
            store.update_settings(Settings::reset)?;
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
