pub mod helpers;
pub use helpers::{
    load_close_to_tray, load_managed_mode, load_show_on_startup, load_window_bounds, WindowBounds,
};

use crate::constants::SETTINGS_FILE_NAME;
use crate::error::{Result, ShellError};
use directories::ProjectDirs;
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub type SettingsRecord = Map<String, Value>;

/// Per-user directory holding `settings.json`, created on demand.
pub fn runtime_dir() -> Result<PathBuf> {
    let proj_dirs =
        ProjectDirs::from("ru", "yandex", "MessengerShell").ok_or(ShellError::NoProjectDirs)?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;
    Ok(data_dir.to_path_buf())
}

/// Flat JSON key/value store, read once and rewritten in full on every `set`.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    cache: SettingsRecord,
}

impl SettingsStore {
    pub fn open(dir: &Path) -> Self {
        let path = dir.join(SETTINGS_FILE_NAME);
        let cache = load_from_disk(&path);
        Self { path, cache }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored value for `key` when present and of type `T`, else `fallback`.
    pub fn get<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        self.cache
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or(fallback)
    }

    /// Raw stored value, for callers that validate shape themselves.
    pub fn get_raw(&self, key: &str) -> Option<&Value> {
        self.cache.get(key)
    }

    /// Merge `value` under `key` and flush the whole record to disk.
    ///
    /// The in-memory record is updated even when the write fails.
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.cache.insert(key.to_string(), value);
        self.persist()
    }

    pub fn all(&self) -> SettingsRecord {
        self.cache.clone()
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.cache)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

fn load_from_disk(path: &Path) -> SettingsRecord {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            if e.kind() != ErrorKind::NotFound {
                warn!("[settings] failed to load {}: {e}", path.display());
            }
            return SettingsRecord::new();
        }
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(record)) => record,
        Ok(_) => {
            warn!("[settings] ignoring non-object settings in {}", path.display());
            SettingsRecord::new()
        }
        Err(e) => {
            warn!("[settings] failed to parse {}: {e}", path.display());
            SettingsRecord::new()
        }
    }
}
