//! `cueflow config`: tuning values in `config.toml`.
//!
//! Keys are dot paths into the three sections:
//!
//! ```text
//! timer.default_duration_secs   timer.presets   timer.frame_interval_ms
//! audio.ticking_threshold_secs  audio.beep_threshold_secs
//! haptics.threshold_secs
//! ```

use clap::Subcommand;
use cueflow_core::Config;

const SECTIONS: &str = "timer, audio, haptics";

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value (e.g. "timer.default_duration_secs", "audio.beep_threshold_secs")
    Get {
        /// Dot-path key
        key: String,
    },
    /// Change one value; the file is only written if the result is valid
    Set {
        /// Dot-path key
        key: String,
        /// New value; arrays take JSON syntax, e.g. "[15, 30, 45]"
        value: String,
    },
    /// Print the whole configuration as TOML
    List {
        /// Print JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Restore 30s turns and the stock cue thresholds
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load_or_default();
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("unknown key: {key} (sections: {SECTIONS})");
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            tracing::info!(%key, "config updated");
            let stored = config.get(&key).unwrap_or(value);
            println!("{key} = {stored}");
        }
        ConfigAction::List { json } => {
            let config = Config::load_or_default();
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print!("{}", toml::to_string_pretty(&config)?);
            }
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!(
                "config reset: {}s turns, ticking from {}s, beeps from {}s",
                config.timer.default_duration_secs,
                config.audio.ticking_threshold_secs,
                config.audio.beep_threshold_secs
            );
        }
    }
    Ok(())
}
