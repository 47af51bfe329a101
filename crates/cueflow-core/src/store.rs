//! Persisted application state.
//!
//! Two slices survive restarts: the rivalry history and the user settings.
//! Each is stored as camelCase JSON under its slice name in any
//! [`KeyValueStore`]. Writes happen explicitly after a mutation; there is no
//! background flush.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::confirm::Confirmation;
use crate::error::StorageError;
use crate::rivalry::RivalryStore;
use crate::settings::{Settings, SharedSettings};
use crate::storage::KeyValueStore;

pub const RIVALRY_KEY: &str = "rivalry";
pub const SETTINGS_KEY: &str = "settings";

pub struct AppStore<S: KeyValueStore> {
    kv: S,
    rivalries: RivalryStore,
    settings: SharedSettings,
    pending_delete: Confirmation<String>,
    pending_clear: Confirmation<()>,
}

impl<S: KeyValueStore> AppStore<S> {
    /// Load both slices. Missing slices start from defaults; a slice that
    /// fails to decode is logged and replaced by defaults.
    pub fn open(kv: S) -> Result<Self, StorageError> {
        let rivalries: RivalryStore = load_slice(&kv, RIVALRY_KEY)?;
        let settings: Settings = load_slice(&kv, SETTINGS_KEY)?;
        tracing::debug!(rivalries = rivalries.len(), "app store loaded");
        Ok(Self {
            kv,
            rivalries,
            settings: SharedSettings::new(settings),
            pending_delete: Confirmation::new(),
            pending_clear: Confirmation::new(),
        })
    }

    pub fn rivalries(&self) -> &RivalryStore {
        &self.rivalries
    }

    /// Mutable access; call [`AppStore::save_rivalries`] afterwards.
    pub fn rivalries_mut(&mut self) -> &mut RivalryStore {
        &mut self.rivalries
    }

    pub fn settings(&self) -> &SharedSettings {
        &self.settings
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    pub fn save_rivalries(&mut self) -> Result<(), StorageError> {
        save_slice(&mut self.kv, RIVALRY_KEY, &self.rivalries)
    }

    pub fn save_settings(&mut self) -> Result<(), StorageError> {
        save_slice(&mut self.kv, SETTINGS_KEY, &self.settings.get())
    }

    pub fn save(&mut self) -> Result<(), StorageError> {
        self.save_rivalries()?;
        self.save_settings()
    }

    /// Apply `f` to the settings and persist the result.
    pub fn update_settings<R>(&mut self, f: impl FnOnce(&mut Settings) -> R) -> Result<R, StorageError> {
        let out = self.settings.update(f);
        self.save_settings()?;
        Ok(out)
    }

    pub fn request_delete_rivalry(&mut self, id: &str) {
        self.pending_delete.request(id.to_string());
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.pending().map(String::as_str)
    }

    pub fn cancel_delete_rivalry(&mut self) {
        self.pending_delete.cancel();
    }

    /// Delete the parked rivalry. Returns whether anything was removed.
    pub fn confirm_delete_rivalry(&mut self) -> Result<bool, StorageError> {
        let Some(id) = self.pending_delete.confirm() else {
            return Ok(false);
        };
        let removed = self.rivalries.delete(&id);
        if removed {
            self.save_rivalries()?;
        }
        Ok(removed)
    }

    pub fn request_clear_all(&mut self) {
        self.pending_clear.request(());
    }

    pub fn is_clear_pending(&self) -> bool {
        self.pending_clear.is_pending()
    }

    pub fn cancel_clear_all(&mut self) {
        self.pending_clear.cancel();
    }

    /// Wipe rivalries and settings if a clear was requested.
    pub fn confirm_clear_all(&mut self) -> Result<bool, StorageError> {
        if self.pending_clear.confirm().is_none() {
            return Ok(false);
        }
        self.clear_all_data()?;
        Ok(true)
    }

    /// Unconditional wipe. Prefer the request/confirm pair in interactive
    /// flows.
    pub fn clear_all_data(&mut self) -> Result<(), StorageError> {
        self.rivalries.clear_all();
        self.settings.update(Settings::reset);
        self.save()?;
        tracing::info!("all persisted data cleared");
        Ok(())
    }
}

fn load_slice<T, S>(kv: &S, key: &str) -> Result<T, StorageError>
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = kv.get(key)? else {
        return Ok(T::default());
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(err) => {
            tracing::warn!(key, error = %err, "corrupt persisted slice, using defaults");
            Ok(T::default())
        }
    }
}

fn save_slice<T, S>(kv: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Encoding {
        key: key.to_string(),
        source,
    })?;
    kv.set(key, &raw)?;
    tracing::debug!(key, bytes = raw.len(), "slice saved");
    Ok(())
}
