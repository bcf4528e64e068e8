use crate::constants::{MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};

/// Id and label of the top-level settings entry.
pub const SETTINGS_MENU_ID: &str = "messenger";
pub const SETTINGS_MENU_LABEL: &str = "Messenger";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ToggleManagedMode,
    ToggleCloseToTray,
    ToggleShowOnStartup,
    ZoomIn,
    ZoomOut,
}

impl MenuAction {
    const ALL: [Self; 5] = [
        Self::ToggleManagedMode,
        Self::ToggleCloseToTray,
        Self::ToggleShowOnStartup,
        Self::ZoomIn,
        Self::ZoomOut,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::ToggleManagedMode => "managed_mode",
            Self::ToggleCloseToTray => "close_to_tray",
            Self::ToggleShowOnStartup => "show_on_startup",
            Self::ZoomIn => "zoom_in",
            Self::ZoomOut => "zoom_out",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ToggleManagedMode => "Managed Mode",
            Self::ToggleCloseToTray => "Close to Tray",
            Self::ToggleShowOnStartup => "Show on Startup",
            Self::ZoomIn => "Zoom +10%",
            Self::ZoomOut => "Zoom -10%",
        }
    }

    pub fn is_checkbox(self) -> bool {
        matches!(
            self,
            Self::ToggleManagedMode | Self::ToggleCloseToTray | Self::ToggleShowOnStartup
        )
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.id() == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Action(MenuAction),
    Separator,
}

/// Layout of the settings submenu, top to bottom.
pub const SETTINGS_MENU: &[MenuEntry] = &[
    MenuEntry::Action(MenuAction::ToggleManagedMode),
    MenuEntry::Action(MenuAction::ToggleCloseToTray),
    MenuEntry::Action(MenuAction::ToggleShowOnStartup),
    MenuEntry::Separator,
    MenuEntry::Action(MenuAction::ZoomIn),
    MenuEntry::Action(MenuAction::ZoomOut),
];

/// Next zoom factor, rounded to two decimals and clamped to the allowed range.
pub fn adjust_zoom(current: f64, delta: f64) -> f64 {
    let next = ((current + delta) * 100.0).round() / 100.0;
    next.clamp(MIN_ZOOM, MAX_ZOOM)
}

pub fn zoom_in(current: f64) -> f64 {
    adjust_zoom(current, ZOOM_STEP)
}

pub fn zoom_out(current: f64) -> f64 {
    adjust_zoom(current, -ZOOM_STEP)
}
