use crate::constants::{ALERT_BADGE, APP_NAME, TRAY_ICON_SIZE};
use crate::error::Result;
use crate::host::TrayHost;
use image::imageops::FilterType;
use log::{error, warn};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrayVariant {
    /// No pending notifications
    #[default]
    Blue,
    /// Unread messages on the main view
    Red,
}

impl TrayVariant {
    pub fn from_alert(alert: bool) -> Self {
        if alert {
            Self::Red
        } else {
            Self::Blue
        }
    }

    pub fn tooltip(self) -> String {
        match self {
            Self::Blue => APP_NAME.to_string(),
            Self::Red => format!("{APP_NAME} — new notifications"),
        }
    }
}

/// Decoded RGBA tray image. An empty image is the last-resort placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrayImage {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl TrayImage {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rgba.is_empty() || self.width == 0 || self.height == 0
    }

    /// Decode a PNG file, optionally resizing it to the tray size.
    ///
    /// Missing or undecodable files yield an empty image.
    pub fn load(path: &Path, resize: bool) -> Self {
        match Self::try_load(path, resize) {
            Ok(image) => image,
            Err(e) => {
                warn!("[tray] icon {} unavailable: {e}", path.display());
                Self::empty()
            }
        }
    }

    fn try_load(path: &Path, resize: bool) -> Result<Self> {
        let mut decoded = image::open(path)?.into_rgba8();
        if resize {
            decoded = image::imageops::resize(&decoded, TRAY_ICON_SIZE, TRAY_ICON_SIZE, FilterType::Lanczos3);
        }
        let (width, height) = decoded.dimensions();
        Ok(Self {
            rgba: decoded.into_raw(),
            width,
            height,
        })
    }
}

/// Preferred icon per variant plus the shared fallback.
#[derive(Debug, Clone, Default)]
pub struct TrayIcons {
    pub blue: TrayImage,
    pub red: TrayImage,
    pub fallback: TrayImage,
}

impl TrayIcons {
    pub fn load(blue: &Path, red: &Path, fallback: &Path) -> Self {
        Self {
            blue: TrayImage::load(blue, true),
            red: TrayImage::load(red, true),
            fallback: TrayImage::load(fallback, true),
        }
    }

    /// Preferred icon, else the fallback, else the empty placeholder.
    pub fn resolve(&self, variant: TrayVariant) -> &TrayImage {
        let preferred = match variant {
            TrayVariant::Blue => &self.blue,
            TrayVariant::Red => &self.red,
        };
        if !preferred.is_empty() {
            return preferred;
        }
        if self.fallback.is_empty() {
            preferred
        } else {
            &self.fallback
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayAction {
    Show,
    Hide,
    Toggle,
    Quit,
}

impl TrayAction {
    pub fn id(self) -> &'static str {
        match self {
            Self::Show => "tray_show",
            Self::Hide => "tray_hide",
            Self::Toggle => "tray_toggle",
            Self::Quit => "tray_quit",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        [Self::Show, Self::Hide, Self::Toggle, Self::Quit]
            .into_iter()
            .find(|action| action.id() == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayMenuEntry {
    Item { action: TrayAction, label: &'static str },
    Separator,
}

/// Context menu shown on the tray icon.
pub const TRAY_MENU: &[TrayMenuEntry] = &[
    TrayMenuEntry::Item {
        action: TrayAction::Show,
        label: "Show Window",
    },
    TrayMenuEntry::Item {
        action: TrayAction::Hide,
        label: "Hide Window",
    },
    TrayMenuEntry::Separator,
    TrayMenuEntry::Item {
        action: TrayAction::Quit,
        label: "Quit",
    },
];

/// Two-state tray indicator.
pub struct TrayController<H: TrayHost> {
    host: H,
    icons: TrayIcons,
    created: bool,
    variant: TrayVariant,
}

impl<H: TrayHost> TrayController<H> {
    pub fn new(host: H, icons: TrayIcons) -> Self {
        Self {
            host,
            icons,
            created: false,
            variant: TrayVariant::Blue,
        }
    }

    pub fn current_variant(&self) -> TrayVariant {
        self.variant
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn ensure(&mut self) -> Result<()> {
        if self.created {
            return Ok(());
        }

        let icon = self.icons.resolve(TrayVariant::Blue);
        self.host.create(icon, &TrayVariant::Blue.tooltip(), TRAY_MENU)?;
        self.created = true;
        self.variant = TrayVariant::Blue;
        Ok(())
    }

    /// Reflect the notification state; icon swaps only on a variant change.
    pub fn update(&mut self, alert: bool) {
        if !self.created {
            if let Err(e) = self.ensure() {
                error!("[tray] failed to create tray: {e}");
                return;
            }
        }

        let badge = alert.then_some(ALERT_BADGE);
        if let Err(e) = self.host.set_badge(badge) {
            warn!("[tray] failed to update badge: {e}");
        }

        let next = TrayVariant::from_alert(alert);
        if next != self.variant {
            self.apply_variant(next);
        }
    }

    fn apply_variant(&mut self, variant: TrayVariant) {
        let icon = self.icons.resolve(variant);
        if let Err(e) = self.host.set_icon(icon) {
            error!("[tray] failed to set {variant:?} icon: {e}");
        }
        if let Err(e) = self.host.set_tooltip(&variant.tooltip()) {
            warn!("[tray] failed to set tooltip: {e}");
        }
        self.variant = variant;
    }

    pub fn destroy(&mut self) {
        if !self.created {
            return;
        }
        self.host.destroy();
        self.created = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{solid_image, FakeTray, TrayCall};
    use tempfile::tempdir;

    fn icons() -> TrayIcons {
        TrayIcons {
            blue: solid_image(1),
            red: solid_image(2),
            fallback: solid_image(3),
        }
    }

    #[test]
    fn test_initial_state_is_blue() {
        let tray = TrayController::new(FakeTray::default(), icons());
        assert_eq!(tray.current_variant(), TrayVariant::Blue);
        assert!(!tray.is_created());
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let mut tray = TrayController::new(FakeTray::default(), icons());
        tray.ensure().unwrap();
        tray.ensure().unwrap();
        assert_eq!(tray.host().count(|c| matches!(c, TrayCall::Create { .. })), 1);
    }

    #[test]
    fn test_update_creates_tray_on_demand() {
        let mut tray = TrayController::new(FakeTray::default(), icons());
        tray.update(false);
        assert!(tray.is_created());
        assert_eq!(tray.host().count(|c| matches!(c, TrayCall::SetIcon(_))), 0);
    }

    #[test]
    fn test_repeated_alert_swaps_icon_once() {
        let mut tray = TrayController::new(FakeTray::default(), icons());
        tray.update(true);
        tray.update(true);
        assert_eq!(tray.current_variant(), TrayVariant::Red);
        assert_eq!(tray.host().count(|c| matches!(c, TrayCall::SetIcon(_))), 1);
        assert_eq!(
            tray.host().last_tooltip().as_deref(),
            Some("Yandex Messenger — new notifications")
        );
    }

    #[test]
    fn test_alert_cleared_restores_blue() {
        let mut tray = TrayController::new(FakeTray::default(), icons());
        tray.update(true);
        tray.update(false);
        assert_eq!(tray.current_variant(), TrayVariant::Blue);
        assert_eq!(tray.host().count(|c| matches!(c, TrayCall::SetIcon(_))), 2);
        assert_eq!(tray.host().last_icon(), Some(solid_image(1)));
        assert_eq!(tray.host().last_badge(), Some(None));
    }

    #[test]
    fn test_badge_follows_alert() {
        let mut tray = TrayController::new(FakeTray::default(), icons());
        tray.update(true);
        assert_eq!(tray.host().last_badge(), Some(Some("•".to_string())));
    }

    #[test]
    fn test_destroy_is_safe_to_repeat() {
        let mut tray = TrayController::new(FakeTray::default(), icons());
        tray.ensure().unwrap();
        tray.destroy();
        tray.destroy();
        assert!(!tray.is_created());
        assert_eq!(tray.host().count(|c| matches!(c, TrayCall::Destroy)), 1);
    }

    #[test]
    fn test_resolve_falls_back_to_shared_icon_then_placeholder() {
        let icons = TrayIcons {
            blue: solid_image(1),
            red: TrayImage::empty(),
            fallback: solid_image(3),
        };
        assert_eq!(icons.resolve(TrayVariant::Red), &solid_image(3));

        let icons = TrayIcons::default();
        assert!(icons.resolve(TrayVariant::Red).is_empty());
    }

    #[test]
    fn test_missing_icon_file_loads_empty() {
        let dir = tempdir().unwrap();
        assert!(TrayImage::load(&dir.path().join("nope.png"), true).is_empty());

        let garbage = dir.path().join("garbage.png");
        std::fs::write(&garbage, b"not a png").unwrap();
        assert!(TrayImage::load(&garbage, true).is_empty());
    }

    #[test]
    fn test_png_is_resized_to_tray_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("icon.png");
        image::RgbaImage::from_pixel(8, 8, image::Rgba([0, 0, 255, 255]))
            .save(&path)
            .unwrap();

        let icon = TrayImage::load(&path, true);
        assert_eq!((icon.width, icon.height), (TRAY_ICON_SIZE, TRAY_ICON_SIZE));
        let original = TrayImage::load(&path, false);
        assert_eq!((original.width, original.height), (8, 8));
    }

    #[test]
    fn test_tray_action_ids_round_trip() {
        for action in [TrayAction::Show, TrayAction::Hide, TrayAction::Toggle, TrayAction::Quit] {
            assert_eq!(TrayAction::from_id(action.id()), Some(action));
        }
        assert_eq!(TrayAction::from_id("managed_mode"), None);
    }
}
