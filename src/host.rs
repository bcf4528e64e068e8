//! Seams to the windowing host.
//!
//! The shell core never talks to a webview or tray directly; the desktop
//! binary implements these traits on top of its runtime and the tests
//! implement them with in-memory fakes.

use crate::error::Result;
use crate::settings::WindowBounds;
use crate::tray::{TrayImage, TrayMenuEntry};
use crate::window::NavigationPolicy;

/// Hands a URL to the operating system's default handler.
pub trait UrlOpener: Send + Sync {
    fn open_url(&self, url: &str) -> Result<()>;
}

/// Opaque identifier of a stylesheet inserted into the current document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleHandle(pub String);

/// One browser window bound to the application's webview.
pub trait BrowserSurface: Send {
    fn load_url(&self, url: &str) -> Result<()>;
    fn reload(&self) -> Result<()>;

    fn show(&self) -> Result<()>;
    fn hide(&self) -> Result<()>;
    fn focus(&self) -> Result<()>;
    fn is_visible(&self) -> bool;
    fn set_skip_taskbar(&self, skip: bool) -> Result<()>;
    fn set_icon(&self, icon: &TrayImage) -> Result<()>;

    fn insert_css(&self, css: &str) -> Result<StyleHandle>;
    fn remove_css(&self, handle: &StyleHandle) -> Result<()>;

    fn set_zoom(&self, factor: f64) -> Result<()>;
}

/// Parameters for creating the main window.
///
/// `policy` is lock-free and meant to be moved into the host's navigation
/// callbacks.
#[derive(Clone)]
pub struct WindowOptions {
    pub title: String,
    pub app_url: String,
    pub user_agent: String,
    pub bounds: WindowBounds,
    /// Window icon; empty when the bundled icon is missing
    pub icon: TrayImage,
    pub policy: NavigationPolicy,
}

pub trait SurfaceFactory: Send {
    fn create(&self, options: &WindowOptions) -> Result<Box<dyn BrowserSurface>>;
}

/// System tray affordance.
///
/// Clicks and menu selections are routed back by the host as
/// [`crate::tray::TrayAction`]s.
pub trait TrayHost: Send {
    fn create(&mut self, icon: &TrayImage, tooltip: &str, menu: &[TrayMenuEntry]) -> Result<()>;
    fn set_icon(&mut self, icon: &TrayImage) -> Result<()>;
    fn set_tooltip(&mut self, tooltip: &str) -> Result<()>;
    /// Dock/taskbar badge; `None` clears it
    fn set_badge(&mut self, badge: Option<&str>) -> Result<()>;
    fn destroy(&mut self);
}
