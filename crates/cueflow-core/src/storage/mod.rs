pub mod config;
pub mod database;
mod kv;

pub use config::Config;
pub use database::Database;
pub use kv::{KeyValueStore, MemoryStore};

use std::path::PathBuf;

/// Returns `~/.config/cueflow[-dev]/` based on CUEFLOW_ENV.
///
/// Set CUEFLOW_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the data directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CUEFLOW_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("cueflow-dev")
    } else {
        base_dir.join("cueflow")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
