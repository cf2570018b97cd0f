use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;
pub const DEFAULT_UPDATE_CHUNK_SIZE: usize = 100;
pub const DEFAULT_CHUNK_PAUSE_MS: u64 = 1_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LedgerSettings {
    /// Undo entries kept per session; the oldest are dropped beyond this.
    pub history_capacity: usize,
    /// Cell updates sent per store call when amending rows.
    pub update_chunk_size: usize,
    /// Pause between chunks, to stay under the store's rate limits.
    pub chunk_pause_ms: u64,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            update_chunk_size: DEFAULT_UPDATE_CHUNK_SIZE,
            chunk_pause_ms: DEFAULT_CHUNK_PAUSE_MS,
        }
    }
}

impl LedgerSettings {
    pub fn chunk_pause(&self) -> Duration {
        Duration::from_millis(self.chunk_pause_ms)
    }

    /// Chunk size never below one.
    pub fn chunk_size(&self) -> usize {
        self.update_chunk_size.max(1)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct UserSettings {
    #[serde(default)]
    ledger: LedgerSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!("Ignoring unreadable settings at {}: {err}", path.display());
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn ledger(&self) -> LedgerSettings {
        self.read().ledger.clone()
    }

    pub fn update_ledger(&self, settings: LedgerSettings) -> Result<()> {
        let mut guard = self.write();
        guard.ledger = settings;
        self.persist(&guard)
    }

    fn read(&self) -> RwLockReadGuard<'_, UserSettings> {
        match self.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserSettings> {
        match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        assert_eq!(store.ledger(), LedgerSettings::default());
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        let store = SettingsStore::new(path).unwrap();
        assert_eq!(store.ledger().history_capacity, DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn updates_persist_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let store = SettingsStore::new(path.clone()).unwrap();
        store
            .update_ledger(LedgerSettings {
                history_capacity: 10,
                update_chunk_size: 25,
                chunk_pause_ms: 0,
            })
            .unwrap();

        let reopened = SettingsStore::new(path).unwrap();
        assert_eq!(reopened.ledger().history_capacity, 10);
        assert_eq!(reopened.ledger().chunk_pause(), Duration::ZERO);
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"ledger":{"chunk_pause_ms":5}}"#).unwrap();
        let ledger = SettingsStore::new(path).unwrap().ledger();
        assert_eq!(ledger.chunk_pause_ms, 5);
        assert_eq!(ledger.update_chunk_size, DEFAULT_UPDATE_CHUNK_SIZE);
    }

    #[test]
    fn chunk_size_is_at_least_one() {
        let settings = LedgerSettings {
            update_chunk_size: 0,
            ..LedgerSettings::default()
        };
        assert_eq!(settings.chunk_size(), 1);
    }
}
