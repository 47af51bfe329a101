pub mod config;
pub mod rivalry;
pub mod settings;
pub mod simulate;

use cueflow_core::storage::Database;
use cueflow_core::{AppStore, Result};

/// Open the persisted slices from the default database.
pub fn open_store() -> Result<AppStore<Database>> {
    let db = Database::open()?;
    Ok(AppStore::open(db)?)
}
