// src/settings/helpers.rs
//
// Typed accessors over the untyped settings record.

use crate::constants::*;
use crate::settings::SettingsStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowBounds {
    pub width: f64,
    pub height: f64,
}

impl WindowBounds {
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    fn from_value(value: &Value) -> Option<Self> {
        let record = value.as_object()?;
        let bounds = Self {
            width: record.get("width")?.as_f64()?,
            height: record.get("height")?.as_f64()?,
        };
        bounds.is_valid().then_some(bounds)
    }
}

impl Default for WindowBounds {
    fn default() -> Self {
        DEFAULT_WINDOW_BOUNDS
    }
}

pub fn load_window_bounds(store: &SettingsStore) -> WindowBounds {
    store
        .get_raw(KEY_WINDOW_BOUNDS)
        .and_then(WindowBounds::from_value)
        .unwrap_or_default()
}

pub fn load_managed_mode(store: &SettingsStore) -> bool {
    store.get(KEY_MANAGED_MODE, DEFAULT_MANAGED_MODE)
}

pub fn load_close_to_tray(store: &SettingsStore) -> bool {
    store.get(KEY_CLOSE_TO_TRAY, DEFAULT_CLOSE_TO_TRAY)
}

pub fn load_show_on_startup(store: &SettingsStore) -> bool {
    store.get(KEY_SHOW_ON_STARTUP, DEFAULT_SHOW_ON_STARTUP)
}
