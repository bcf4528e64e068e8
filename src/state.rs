use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::constants::{DEFAULT_CLOSE_TO_TRAY, DEFAULT_MANAGED_MODE, DEFAULT_SHOW_ON_STARTUP};
use log::warn;

/// Session flags shared between the shell and host callbacks.
///
/// Navigation and request callbacks read these on every event, so they are
/// atomics instead of living behind the shell's lock.
#[derive(Debug)]
pub struct SessionFlags {
    managed_mode: AtomicBool,
    close_to_tray: AtomicBool,
    show_on_startup: AtomicBool,
    quitting: AtomicBool,
}

impl Default for SessionFlags {
    fn default() -> Self {
        Self::new(DEFAULT_MANAGED_MODE, DEFAULT_CLOSE_TO_TRAY, DEFAULT_SHOW_ON_STARTUP)
    }
}

impl SessionFlags {
    pub fn new(managed_mode: bool, close_to_tray: bool, show_on_startup: bool) -> Self {
        Self {
            managed_mode: AtomicBool::new(managed_mode),
            close_to_tray: AtomicBool::new(close_to_tray),
            show_on_startup: AtomicBool::new(show_on_startup),
            quitting: AtomicBool::new(false),
        }
    }

    pub fn managed_mode(&self) -> bool {
        self.managed_mode.load(Ordering::SeqCst)
    }

    pub fn set_managed_mode(&self, enabled: bool) {
        self.managed_mode.store(enabled, Ordering::SeqCst);
    }

    pub fn close_to_tray(&self) -> bool {
        self.close_to_tray.load(Ordering::SeqCst)
    }

    pub fn set_close_to_tray(&self, enabled: bool) {
        self.close_to_tray.store(enabled, Ordering::SeqCst);
    }

    pub fn show_on_startup(&self) -> bool {
        self.show_on_startup.load(Ordering::SeqCst)
    }

    pub fn set_show_on_startup(&self, enabled: bool) {
        self.show_on_startup.store(enabled, Ordering::SeqCst);
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting.load(Ordering::SeqCst)
    }

    pub fn mark_quitting(&self) {
        self.quitting.store(true, Ordering::SeqCst);
    }

    /// Closing hides to the tray unless the user is quitting.
    pub fn should_hide_on_close(&self) -> bool {
        self.close_to_tray() && !self.is_quitting()
    }
}

/// Handlers that must be attached to a browser session at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionHook {
    UserAgent,
    RequestFilter,
    Permissions,
}

/// Tracks which hooks have been installed on which session.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    installed: Mutex<HashMap<String, HashSet<SessionHook>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `hook` for `session`.
    ///
    /// Returns `true` the first time, meaning the caller should install the
    /// handler now, and `false` on every later call for the same pair.
    pub fn register(&self, session: &str, hook: SessionHook) -> bool {
        let mut installed = match self.installed.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("SessionRegistry mutex was poisoned, recovering");
                poisoned.into_inner()
            }
        };
        installed.entry(session.to_string()).or_default().insert(hook)
    }
}
