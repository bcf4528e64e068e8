pub mod guard;
pub mod permissions;
pub mod policy;
pub mod stylesheet;

pub use guard::{should_block_request, BLOCK_REQUEST_COMMAND, GUARD_SCRIPT};
pub use permissions::grant_permission;
pub use policy::{CloseAction, NavigationPolicy, WindowOpenAction};
pub use stylesheet::{load_custom_css, StylesheetInjector};

use crate::host::BrowserSurface;
use crate::tray::TrayImage;
use log::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationPhase {
    Start,
    Finish,
    InPage,
}

impl NavigationPhase {
    fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Finish => "finish",
            Self::InPage => "in-page",
        }
    }
}

fn log_navigation(phase: NavigationPhase, url: &str) {
    if url.is_empty() {
        return;
    }
    info!("[nav] {} → {url}", phase.as_str());
}

/// Owns the main browser surface and applies window-level policy to it.
pub struct WindowController {
    surface: Box<dyn BrowserSurface>,
    policy: NavigationPolicy,
    stylesheet: StylesheetInjector,
    icon: TrayImage,
}

impl WindowController {
    pub fn new(
        surface: Box<dyn BrowserSurface>,
        policy: NavigationPolicy,
        custom_css: Option<String>,
        icon: TrayImage,
    ) -> Self {
        Self {
            surface,
            policy,
            stylesheet: StylesheetInjector::new(custom_css),
            icon,
        }
    }

    pub fn policy(&self) -> &NavigationPolicy {
        &self.policy
    }

    pub fn is_visible(&self) -> bool {
        self.surface.is_visible()
    }

    pub fn show_and_focus(&self) {
        if let Err(e) = self.surface.show().and_then(|()| self.surface.focus()) {
            warn!("[window] failed to show window: {e}");
        }
        self.mark_visible();
    }

    pub fn hide(&self) {
        if let Err(e) = self.surface.hide() {
            warn!("[window] failed to hide window: {e}");
        }
    }

    /// Hide and drop the taskbar entry; the tray stays as the only affordance.
    pub fn hide_to_tray(&self) {
        if let Err(e) = self.surface.set_skip_taskbar(true) {
            warn!("[window] failed to leave taskbar: {e}");
        }
        self.hide();
    }

    /// Restore the taskbar entry and icon after the window is shown or
    /// restored.
    pub fn mark_visible(&self) {
        if let Err(e) = self.surface.set_skip_taskbar(false) {
            warn!("[window] failed to restore taskbar entry: {e}");
        }
        if self.icon.is_empty() {
            return;
        }
        if let Err(e) = self.surface.set_icon(&self.icon) {
            warn!("[window] failed to restore window icon: {e}");
        }
    }

    /// Decide what a close request does, hiding the window if it is kept.
    pub fn on_close_requested(&self) -> CloseAction {
        let action = self.policy.close_action();
        if action == CloseAction::HideToTray {
            self.hide_to_tray();
        }
        action
    }

    /// Content finished loading.
    pub fn on_loaded(&mut self) {
        if !self.surface.is_visible() && self.policy.flags().show_on_startup() {
            self.show_and_focus();
        }
        self.ensure_custom_css();
    }

    pub fn on_navigation(&mut self, phase: NavigationPhase, url: &str) {
        log_navigation(phase, url);
        match phase {
            NavigationPhase::Start => self.stylesheet.reset_document(),
            NavigationPhase::Finish | NavigationPhase::InPage => self.ensure_custom_css(),
        }
    }

    /// `code` is the host's error code, when it reports one.
    pub fn on_load_failed(&self, code: Option<i32>, description: &str, url: &str) {
        match code {
            Some(code) => error!("Failed to load URL {url}: {description} (code {code})"),
            None => error!("Failed to load URL {url}: {description}"),
        }
    }

    pub fn ensure_custom_css(&mut self) {
        let managed = self.policy.flags().managed_mode();
        self.stylesheet.sync(self.surface.as_ref(), managed);
    }

    pub fn has_custom_css(&self) -> bool {
        self.stylesheet.is_inserted()
    }

    pub fn reload(&self) {
        if let Err(e) = self.surface.reload() {
            error!("[window] failed to reload: {e}");
        }
    }

    pub fn set_zoom(&self, factor: f64) {
        if let Err(e) = self.surface.set_zoom(factor) {
            error!("[window] failed to set zoom to {factor}: {e}");
        }
    }
}
