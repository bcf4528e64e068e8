//! In-memory hosts for unit tests.
//!
//! Each fake records the calls it receives so tests can assert on what the
//! shell asked the host to do.

use crate::error::{Result, ShellError};
use crate::host::{BrowserSurface, StyleHandle, SurfaceFactory, TrayHost, UrlOpener, WindowOptions};
use crate::tray::{TrayIcons, TrayImage, TrayMenuEntry};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::{Arc, Mutex, Once};

// ── URL opener ─────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingOpener {
    opened: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingOpener {
    /// Records every URL but reports failure to the caller.
    pub fn failing() -> Self {
        Self {
            opened: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl UrlOpener for RecordingOpener {
    fn open_url(&self, url: &str) -> Result<()> {
        self.opened.lock().unwrap().push(url.to_string());
        if self.fail {
            return Err(ShellError::host("open url", "no handler"));
        }
        Ok(())
    }
}

// ── Browser surface ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    LoadUrl(String),
    Reload,
    Show,
    Hide,
    Focus,
    SkipTaskbar(bool),
    SetIcon(TrayImage),
    InsertCss(String),
    RemoveCss(StyleHandle),
    SetZoom(f64),
}

#[derive(Debug, Default)]
struct SurfaceState {
    calls: Vec<SurfaceCall>,
    visible: bool,
    fail_css: bool,
    next_style: usize,
}

/// Clones share state, so a test can keep a handle after boxing one.
#[derive(Debug, Clone, Default)]
pub struct FakeSurface {
    state: Arc<Mutex<SurfaceState>>,
}

impl FakeSurface {
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, predicate: impl Fn(&SurfaceCall) -> bool) -> usize {
        self.state.lock().unwrap().calls.iter().filter(|c| predicate(c)).count()
    }

    pub fn fail_css(&self, fail: bool) {
        self.state.lock().unwrap().fail_css = fail;
    }

    fn record(&self, call: SurfaceCall) {
        self.state.lock().unwrap().calls.push(call);
    }
}

impl BrowserSurface for FakeSurface {
    fn load_url(&self, url: &str) -> Result<()> {
        self.record(SurfaceCall::LoadUrl(url.to_string()));
        Ok(())
    }

    fn reload(&self) -> Result<()> {
        self.record(SurfaceCall::Reload);
        Ok(())
    }

    fn show(&self) -> Result<()> {
        self.record(SurfaceCall::Show);
        self.state.lock().unwrap().visible = true;
        Ok(())
    }

    fn hide(&self) -> Result<()> {
        self.record(SurfaceCall::Hide);
        self.state.lock().unwrap().visible = false;
        Ok(())
    }

    fn focus(&self) -> Result<()> {
        self.record(SurfaceCall::Focus);
        Ok(())
    }

    fn is_visible(&self) -> bool {
        self.state.lock().unwrap().visible
    }

    fn set_skip_taskbar(&self, skip: bool) -> Result<()> {
        self.record(SurfaceCall::SkipTaskbar(skip));
        Ok(())
    }

    fn set_icon(&self, icon: &TrayImage) -> Result<()> {
        self.record(SurfaceCall::SetIcon(icon.clone()));
        Ok(())
    }

    fn insert_css(&self, css: &str) -> Result<StyleHandle> {
        let mut state = self.state.lock().unwrap();
        if state.fail_css {
            return Err(ShellError::host("insert css", "document not ready"));
        }
        state.calls.push(SurfaceCall::InsertCss(css.to_string()));
        state.next_style += 1;
        Ok(StyleHandle(format!("style-{}", state.next_style)))
    }

    fn remove_css(&self, handle: &StyleHandle) -> Result<()> {
        self.record(SurfaceCall::RemoveCss(handle.clone()));
        Ok(())
    }

    fn set_zoom(&self, factor: f64) -> Result<()> {
        self.record(SurfaceCall::SetZoom(factor));
        Ok(())
    }
}

/// Hands out [`FakeSurface`]s and remembers what it was asked for.
#[derive(Clone, Default)]
pub struct FakeFactory {
    created: Arc<Mutex<Vec<(WindowOptions, FakeSurface)>>>,
}

impl FakeFactory {
    pub fn created(&self) -> Vec<WindowOptions> {
        self.created.lock().unwrap().iter().map(|(o, _)| o.clone()).collect()
    }

    pub fn last_surface(&self) -> Option<FakeSurface> {
        self.created.lock().unwrap().last().map(|(_, s)| s.clone())
    }
}

impl SurfaceFactory for FakeFactory {
    fn create(&self, options: &WindowOptions) -> Result<Box<dyn BrowserSurface>> {
        let surface = FakeSurface::default();
        self.created
            .lock()
            .unwrap()
            .push((options.clone(), surface.clone()));
        Ok(Box::new(surface))
    }
}

// ── Tray ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayCall {
    Create {
        icon: TrayImage,
        tooltip: String,
        menu: Vec<TrayMenuEntry>,
    },
    SetIcon(TrayImage),
    SetTooltip(String),
    SetBadge(Option<String>),
    Destroy,
}

#[derive(Debug, Default)]
pub struct FakeTray {
    calls: Vec<TrayCall>,
}

impl FakeTray {
    pub fn calls(&self) -> &[TrayCall] {
        &self.calls
    }

    pub fn count(&self, predicate: impl Fn(&TrayCall) -> bool) -> usize {
        self.calls.iter().filter(|c| predicate(c)).count()
    }

    pub fn last_tooltip(&self) -> Option<String> {
        self.calls.iter().rev().find_map(|c| match c {
            TrayCall::SetTooltip(tooltip) | TrayCall::Create { tooltip, .. } => Some(tooltip.clone()),
            _ => None,
        })
    }

    pub fn last_icon(&self) -> Option<TrayImage> {
        self.calls.iter().rev().find_map(|c| match c {
            TrayCall::SetIcon(icon) | TrayCall::Create { icon, .. } => Some(icon.clone()),
            _ => None,
        })
    }

    pub fn last_badge(&self) -> Option<Option<String>> {
        self.calls.iter().rev().find_map(|c| match c {
            TrayCall::SetBadge(badge) => Some(badge.clone()),
            _ => None,
        })
    }
}

impl TrayHost for FakeTray {
    fn create(&mut self, icon: &TrayImage, tooltip: &str, menu: &[TrayMenuEntry]) -> Result<()> {
        self.calls.push(TrayCall::Create {
            icon: icon.clone(),
            tooltip: tooltip.to_string(),
            menu: menu.to_vec(),
        });
        Ok(())
    }

    fn set_icon(&mut self, icon: &TrayImage) -> Result<()> {
        self.calls.push(TrayCall::SetIcon(icon.clone()));
        Ok(())
    }

    fn set_tooltip(&mut self, tooltip: &str) -> Result<()> {
        self.calls.push(TrayCall::SetTooltip(tooltip.to_string()));
        Ok(())
    }

    fn set_badge(&mut self, badge: Option<&str>) -> Result<()> {
        self.calls.push(TrayCall::SetBadge(badge.map(String::from)));
        Ok(())
    }

    fn destroy(&mut self) {
        self.calls.push(TrayCall::Destroy);
    }
}

/// 2x2 image filled with `value`; distinct values give distinct images.
pub fn solid_image(value: u8) -> TrayImage {
    TrayImage {
        rgba: vec![value; 16],
        width: 2,
        height: 2,
    }
}

pub fn test_icons() -> TrayIcons {
    TrayIcons {
        blue: solid_image(1),
        red: solid_image(2),
        fallback: solid_image(3),
    }
}

// ── Log capture ────────────────────────────────────────────────────

struct CaptureLogger;

static CAPTURED: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());
static INSTALL_LOGGER: Once = Once::new();

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        CAPTURED.lock().unwrap().push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

/// Route `log` records into memory for the rest of the test binary.
pub fn capture_logs() {
    INSTALL_LOGGER.call_once(|| {
        log::set_logger(&CaptureLogger).unwrap();
        log::set_max_level(LevelFilter::Debug);
    });
}

/// Captured records mentioning `needle`. Tests share the logger, so pick a
/// needle unique to the test.
pub fn logs_containing(needle: &str) -> Vec<(Level, String)> {
    CAPTURED
        .lock()
        .unwrap()
        .iter()
        .filter(|(_, message)| message.contains(needle))
        .cloned()
        .collect()
}
