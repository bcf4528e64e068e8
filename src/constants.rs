// src/constants.rs

use crate::settings::WindowBounds;

/// Canonical URL of the wrapped messenger; its host and path define the main view.
pub const APP_URL: &str = "https://messenger.360.yandex.ru/";

/// Display name used for window titles and tray tooltips.
pub const APP_NAME: &str = "Yandex Messenger";

/// User-Agent sent with every request of the shell's session.
pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36";

pub const DEFAULT_WINDOW_BOUNDS: WindowBounds = WindowBounds {
    width: 1280.0,
    height: 800.0,
};

/// Label of the single main window.
pub const MAIN_WINDOW_LABEL: &str = "main";

pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Settings keys, as stored in `settings.json`
pub const KEY_WINDOW_BOUNDS: &str = "windowBounds";
pub const KEY_MANAGED_MODE: &str = "managedMode";
pub const KEY_CLOSE_TO_TRAY: &str = "closeToTray";
pub const KEY_SHOW_ON_STARTUP: &str = "showOnStartup";

pub const DEFAULT_MANAGED_MODE: bool = false;
pub const DEFAULT_CLOSE_TO_TRAY: bool = true;
pub const DEFAULT_SHOW_ON_STARTUP: bool = false;

/// Zoom factor bounds and menu step
pub const MIN_ZOOM: f64 = 0.25;
pub const MAX_ZOOM: f64 = 3.0;
pub const ZOOM_STEP: f64 = 0.1;

/// Longest URL written to the filter log before it is cut with an ellipsis.
pub const LOG_URL_LIMIT: usize = 100;

/// Edge length of tray icons, in pixels
#[cfg(target_os = "macos")]
pub const TRAY_ICON_SIZE: u32 = 22;
#[cfg(not(target_os = "macos"))]
pub const TRAY_ICON_SIZE: u32 = 64;

/// Badge text shown by the OS while notifications are pending
pub const ALERT_BADGE: &str = "•";
