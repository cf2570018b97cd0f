pub mod amend;
pub mod carryover;
pub mod count;
pub mod error;
pub mod ledger;
pub mod models;
pub mod pointer;
pub mod session;
pub mod settings;
pub mod store;
pub mod utils;
pub mod zone;

#[cfg(test)]
mod test_support;

use std::path::Path;

use anyhow::{Context, Result};

pub use count::Count;
pub use error::{SessionError, SessionResult};
pub use ledger::{EventLedger, LedgerEntry, UndoReport};
pub use models::{GameInfo, Half, PitchDraft, PitchResult, PlateAppearanceKey};
pub use pointer::Advance;
pub use session::SessionContext;
pub use settings::{LedgerSettings, SettingsStore};
pub use store::{MemoryStore, RemoteStore, SqliteStore, StoreError};
pub use utils::logging::init_logging;
pub use zone::{classify_point, Bounds, GridCell, Zone};

const DATABASE_FILE: &str = "pitchlog.sqlite3";
const SETTINGS_FILE: &str = "settings.json";

/// Opens the on-disk store and settings under `data_dir` and starts a
/// session against them.
pub fn open_local_session(data_dir: &Path) -> Result<(SessionContext<SqliteStore>, SettingsStore)> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

    let store = SqliteStore::open(data_dir.join(DATABASE_FILE))?;
    let settings = SettingsStore::new(data_dir.join(SETTINGS_FILE))?;
    let session = SessionContext::new(store, &settings.ledger());

    log::info!("Ledger opened in {}", data_dir.display());
    Ok((session, settings))
}
