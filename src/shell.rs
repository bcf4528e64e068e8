//! The orchestrator: owns settings, session flags, the tray and the main
//! window, and turns host events into tray and settings updates.

use crate::constants::*;
use crate::error::Result;
use crate::filter::RequestFilter;
use crate::host::{SurfaceFactory, TrayHost, UrlOpener, WindowOptions};
use crate::menu::{zoom_in, zoom_out, MenuAction};
use crate::navigation::NavigationClassifier;
use crate::settings::{
    load_close_to_tray, load_managed_mode, load_show_on_startup, load_window_bounds,
    SettingsStore, WindowBounds,
};
use crate::state::SessionFlags;
use crate::tray::{TrayAction, TrayController, TrayImage};
use crate::window::{CloseAction, NavigationPhase, NavigationPolicy, WindowController};
use log::{debug, error, info};
use serde::Serialize;
use std::sync::Arc;

/// Fixed inputs of a shell instance.
#[derive(Debug, Clone)]
pub struct ShellOptions {
    pub app_url: String,
    pub user_agent: String,
    pub custom_css: Option<String>,
    /// Application icon for the main window, unscaled
    pub window_icon: TrayImage,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            app_url: APP_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            custom_css: None,
            window_icon: TrayImage::empty(),
        }
    }
}

/// What the host should do after a tray action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayOutcome {
    Continue,
    Exit,
}

pub struct Shell<T: TrayHost> {
    options: ShellOptions,
    settings: SettingsStore,
    flags: Arc<SessionFlags>,
    policy: NavigationPolicy,
    factory: Box<dyn SurfaceFactory>,
    window: Option<WindowController>,
    tray: TrayController<T>,
    bounds: WindowBounds,
    zoom: f64,
    title: String,
    url: String,
}

impl<T: TrayHost> Shell<T> {
    pub fn new(
        options: ShellOptions,
        settings: SettingsStore,
        opener: Arc<dyn UrlOpener>,
        factory: Box<dyn SurfaceFactory>,
        tray: TrayController<T>,
    ) -> Result<Self> {
        let classifier = NavigationClassifier::new(&options.app_url)?;
        let flags = Arc::new(SessionFlags::new(
            load_managed_mode(&settings),
            load_close_to_tray(&settings),
            load_show_on_startup(&settings),
        ));
        let bounds = load_window_bounds(&settings);
        let policy = NavigationPolicy::new(classifier, Arc::clone(&flags), opener);

        Ok(Self {
            options,
            settings,
            flags,
            policy,
            factory,
            window: None,
            tray,
            bounds,
            zoom: 1.0,
            title: String::new(),
            url: String::new(),
        })
    }

    pub fn flags(&self) -> Arc<SessionFlags> {
        Arc::clone(&self.flags)
    }

    /// Lock-free copy of the navigation policy for host callbacks.
    pub fn policy(&self) -> NavigationPolicy {
        self.policy.clone()
    }

    pub fn request_filter(&self) -> RequestFilter {
        RequestFilter::new(self.flags())
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn bounds(&self) -> WindowBounds {
        self.bounds
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn tray(&self) -> &TrayController<T> {
        &self.tray
    }

    pub fn window(&self) -> Option<&WindowController> {
        self.window.as_ref()
    }

    pub fn window_mut(&mut self) -> Option<&mut WindowController> {
        self.window.as_mut()
    }

    /// Create the main window unless it already exists. A recreated window
    /// keeps the zoom chosen for the previous one.
    pub fn ensure_window(&mut self) -> Result<&mut WindowController> {
        let window = match self.window.take() {
            Some(window) => window,
            None => {
                let options = WindowOptions {
                    title: APP_NAME.to_string(),
                    app_url: self.options.app_url.clone(),
                    user_agent: self.options.user_agent.clone(),
                    bounds: self.bounds,
                    icon: self.options.window_icon.clone(),
                    policy: self.policy.clone(),
                };
                let surface = self.factory.create(&options)?;
                info!("[window] created main window for {}", options.app_url);
                let window = WindowController::new(
                    surface,
                    self.policy.clone(),
                    self.options.custom_css.clone(),
                    options.icon,
                );
                if (self.zoom - 1.0).abs() > f64::EPSILON {
                    window.set_zoom(self.zoom);
                }
                window
            }
        };
        Ok(self.window.insert(window))
    }

    pub fn ensure_tray(&mut self) {
        if let Err(e) = self.tray.ensure() {
            error!("[tray] failed to create tray: {e}");
        }
    }

    /// Unread messages are pending on the main view.
    pub fn has_notifications(&self) -> bool {
        self.window.is_some() && self.policy.classifier().has_notifications(&self.url, &self.title)
    }

    pub fn update_tray_state(&mut self) {
        let alert = self.has_notifications();
        self.tray.update(alert);
    }

    // ── Window events ──────────────────────────────────────────────

    /// Content finished loading. Every load re-applies the startup
    /// visibility rule.
    pub fn on_ready(&mut self, url: &str) {
        self.url = url.to_string();
        if let Some(window) = self.window.as_mut() {
            window.on_loaded();
        }
        self.update_tray_state();
    }

    pub fn on_load_failed(&self, code: Option<i32>, description: &str, url: &str) {
        if let Some(window) = self.window.as_ref() {
            window.on_load_failed(code, description, url);
        }
    }

    pub fn on_title_changed(&mut self, title: &str) {
        self.title = title.to_string();
        self.update_tray_state();
    }

    pub fn on_navigation(&mut self, phase: NavigationPhase, url: &str) {
        if let Some(window) = self.window.as_mut() {
            window.on_navigation(phase, url);
        }
        if phase != NavigationPhase::Start {
            self.url = url.to_string();
            self.update_tray_state();
        }
    }

    /// URL observed outside a page load, e.g. history API routing.
    pub fn on_url_observed(&mut self, url: &str) {
        if url.is_empty() || url == self.url {
            return;
        }
        self.on_navigation(NavigationPhase::InPage, url);
    }

    pub fn on_resized(&mut self, bounds: WindowBounds) {
        if !bounds.is_valid() {
            debug!("[window] ignoring degenerate bounds {bounds:?}");
            return;
        }
        self.bounds = bounds;
        self.write_setting(KEY_WINDOW_BOUNDS, bounds);
    }

    pub fn on_close_requested(&self) -> CloseAction {
        self.window
            .as_ref()
            .map_or(CloseAction::Close, WindowController::on_close_requested)
    }

    pub fn on_shown(&self) {
        if let Some(window) = self.window.as_ref() {
            window.mark_visible();
        }
    }

    pub fn on_closed(&mut self) {
        self.window = None;
        self.title.clear();
        self.url.clear();
        self.update_tray_state();
    }

    // ── Settings toggles ───────────────────────────────────────────

    pub fn set_managed_mode(&mut self, enabled: bool) {
        if self.flags.managed_mode() == enabled {
            return;
        }
        self.flags.set_managed_mode(enabled);
        self.write_setting(KEY_MANAGED_MODE, enabled);
        info!("[settings] managed mode {}", if enabled { "on" } else { "off" });

        if let Some(window) = self.window.as_mut() {
            window.ensure_custom_css();
            window.reload();
        }
    }

    pub fn set_close_to_tray(&mut self, enabled: bool) {
        if self.flags.close_to_tray() == enabled {
            return;
        }
        self.flags.set_close_to_tray(enabled);
        self.write_setting(KEY_CLOSE_TO_TRAY, enabled);
    }

    pub fn set_show_on_startup(&mut self, enabled: bool) {
        if self.flags.show_on_startup() == enabled {
            return;
        }
        self.flags.set_show_on_startup(enabled);
        self.write_setting(KEY_SHOW_ON_STARTUP, enabled);
    }

    /// Current checked state of a checkbox action.
    pub fn is_checked(&self, action: MenuAction) -> Option<bool> {
        match action {
            MenuAction::ToggleManagedMode => Some(self.flags.managed_mode()),
            MenuAction::ToggleCloseToTray => Some(self.flags.close_to_tray()),
            MenuAction::ToggleShowOnStartup => Some(self.flags.show_on_startup()),
            MenuAction::ZoomIn | MenuAction::ZoomOut => None,
        }
    }

    /// Apply a settings-menu click. `checked` is the checkbox state after
    /// the click, when the host reports one.
    pub fn handle_menu_action(&mut self, action: MenuAction, checked: Option<bool>) {
        let toggled = |current: bool| checked.unwrap_or(!current);
        match action {
            MenuAction::ToggleManagedMode => {
                let next = toggled(self.flags.managed_mode());
                self.set_managed_mode(next);
            }
            MenuAction::ToggleCloseToTray => {
                let next = toggled(self.flags.close_to_tray());
                self.set_close_to_tray(next);
            }
            MenuAction::ToggleShowOnStartup => {
                let next = toggled(self.flags.show_on_startup());
                self.set_show_on_startup(next);
            }
            MenuAction::ZoomIn => self.apply_zoom(zoom_in(self.zoom)),
            MenuAction::ZoomOut => self.apply_zoom(zoom_out(self.zoom)),
        }
    }

    fn apply_zoom(&mut self, factor: f64) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        window.set_zoom(factor);
        self.zoom = factor;
    }

    // ── Tray and app lifecycle ─────────────────────────────────────

    pub fn show_window(&mut self) {
        match self.ensure_window() {
            Ok(window) => window.show_and_focus(),
            Err(e) => error!("[window] failed to create main window: {e}"),
        }
    }

    pub fn hide_window(&self) {
        if let Some(window) = self.window.as_ref() {
            window.hide();
        }
    }

    pub fn toggle_window(&mut self) {
        match self.ensure_window() {
            Ok(window) if window.is_visible() => window.hide(),
            Ok(window) => window.show_and_focus(),
            Err(e) => error!("[window] failed to create main window: {e}"),
        }
    }

    pub fn handle_tray_action(&mut self, action: TrayAction) -> TrayOutcome {
        match action {
            TrayAction::Show => self.show_window(),
            TrayAction::Hide => self.hide_window(),
            TrayAction::Toggle => self.toggle_window(),
            TrayAction::Quit => {
                self.quit();
                return TrayOutcome::Exit;
            }
        }
        TrayOutcome::Continue
    }

    /// Dock icon re-activated.
    pub fn activate(&mut self) {
        self.show_window();
    }

    pub fn before_quit(&self) {
        self.flags.mark_quitting();
    }

    pub fn quit(&mut self) {
        self.flags.mark_quitting();
        self.tray.destroy();
    }

    fn write_setting<V: Serialize>(&mut self, key: &str, value: V) {
        if let Err(e) = self.settings.set(key, value) {
            error!("[settings] failed to save {key}: {e}");
        }
    }
}
