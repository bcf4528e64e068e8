use crate::host::UrlOpener;
use crate::navigation::{open_external, NavigationClassifier};
use crate::state::SessionFlags;
use std::sync::Arc;

/// Outcome of a page's request to open a new window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowOpenAction {
    /// Let the host open the window as usual
    Allow,
    /// Refuse; nothing else to do
    Deny,
    /// Refuse the new window and load the URL in the existing one
    LoadInPlace(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAction {
    Close,
    HideToTray,
}

/// Navigation and close decisions for the main window.
///
/// Cheap to clone and free of locks so host callbacks can own a copy.
#[derive(Clone)]
pub struct NavigationPolicy {
    classifier: NavigationClassifier,
    flags: Arc<SessionFlags>,
    opener: Arc<dyn UrlOpener>,
}

impl NavigationPolicy {
    pub fn new(
        classifier: NavigationClassifier,
        flags: Arc<SessionFlags>,
        opener: Arc<dyn UrlOpener>,
    ) -> Self {
        Self {
            classifier,
            flags,
            opener,
        }
    }

    pub fn classifier(&self) -> &NavigationClassifier {
        &self.classifier
    }

    pub fn flags(&self) -> &Arc<SessionFlags> {
        &self.flags
    }

    pub fn open_external(&self, url: &str) {
        open_external(self.opener.as_ref(), url);
    }

    pub fn on_window_open(&self, url: &str) -> WindowOpenAction {
        if !self.flags.managed_mode() {
            return WindowOpenAction::Allow;
        }

        if self.classifier.is_internal(url) {
            if url.is_empty() || url == "about:blank" {
                return WindowOpenAction::Deny;
            }
            return WindowOpenAction::LoadInPlace(url.to_string());
        }

        self.open_external(url);
        WindowOpenAction::Deny
    }

    /// Whether an in-page navigation may proceed. External targets are handed
    /// to the OS opener before being refused.
    pub fn on_will_navigate(&self, url: &str) -> bool {
        if !self.flags.managed_mode() || self.classifier.is_internal(url) {
            return true;
        }

        self.open_external(url);
        false
    }

    pub fn close_action(&self) -> CloseAction {
        if self.flags.should_hide_on_close() {
            CloseAction::HideToTray
        } else {
            CloseAction::Close
        }
    }
}
