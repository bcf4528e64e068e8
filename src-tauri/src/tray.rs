use crate::with_shell;
use messenger_shell::tray::{TrayAction, TrayImage, TrayMenuEntry};
use messenger_shell::{host::TrayHost, Result, ShellError, TrayOutcome};
use log::info;
use tauri::{
    image::Image,
    menu::{Menu, MenuItem, PredefinedMenuItem},
    tray::{MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent},
    AppHandle,
};

const TRAY_ID: &str = "messenger-tray";

pub(crate) fn to_image(image: &TrayImage) -> Option<Image<'static>> {
    if image.is_empty() {
        return None;
    }
    Some(Image::new_owned(image.rgba.clone(), image.width, image.height))
}

fn build_menu(app: &AppHandle, entries: &[TrayMenuEntry]) -> tauri::Result<Menu<tauri::Wry>> {
    let menu = Menu::new(app)?;
    for entry in entries {
        match entry {
            TrayMenuEntry::Item { action, label } => {
                menu.append(&MenuItem::with_id(app, action.id(), *label, true, None::<&str>)?)?;
            }
            TrayMenuEntry::Separator => menu.append(&PredefinedMenuItem::separator(app)?)?,
        }
    }
    Ok(menu)
}

/// Run a tray action against the shell and exit when it asks to.
pub fn dispatch(app: &AppHandle, action: TrayAction) {
    if with_shell(app, |shell| shell.handle_tray_action(action)) == Some(TrayOutcome::Exit) {
        info!("[tray] quit requested");
        app.exit(0);
    }
}

pub struct TauriTray {
    app: AppHandle,
    icon: Option<TrayIcon>,
}

impl TauriTray {
    pub fn new(app: AppHandle) -> Self {
        Self { app, icon: None }
    }

    fn icon(&self, operation: &'static str) -> Result<&TrayIcon> {
        self.icon
            .as_ref()
            .ok_or_else(|| ShellError::host(operation, "tray not created"))
    }
}

impl TrayHost for TauriTray {
    fn create(&mut self, icon: &TrayImage, tooltip: &str, menu: &[TrayMenuEntry]) -> Result<()> {
        let menu = build_menu(&self.app, menu).map_err(|e| ShellError::host("build tray menu", e))?;

        let mut builder = TrayIconBuilder::with_id(TRAY_ID)
            .tooltip(tooltip)
            .menu(&menu)
            .show_menu_on_left_click(false)
            .on_menu_event(|app, event| {
                if let Some(action) = TrayAction::from_id(event.id().as_ref()) {
                    dispatch(app, action);
                }
            })
            .on_tray_icon_event(|tray, event| {
                if let TrayIconEvent::Click {
                    button: MouseButton::Left,
                    button_state: MouseButtonState::Up,
                    ..
                } = event
                {
                    dispatch(tray.app_handle(), TrayAction::Toggle);
                }
            });
        if let Some(image) = to_image(icon) {
            builder = builder.icon(image);
        }

        let tray = builder
            .build(&self.app)
            .map_err(|e| ShellError::host("create tray", e))?;
        self.icon = Some(tray);
        Ok(())
    }

    fn set_icon(&mut self, icon: &TrayImage) -> Result<()> {
        self.icon("set tray icon")?
            .set_icon(to_image(icon))
            .map_err(|e| ShellError::host("set tray icon", e))
    }

    fn set_tooltip(&mut self, tooltip: &str) -> Result<()> {
        self.icon("set tray tooltip")?
            .set_tooltip(Some(tooltip))
            .map_err(|e| ShellError::host("set tray tooltip", e))
    }

    #[cfg(target_os = "macos")]
    fn set_badge(&mut self, badge: Option<&str>) -> Result<()> {
        use messenger_shell::constants::MAIN_WINDOW_LABEL;
        use tauri::Manager;

        let Some(window) = self.app.get_webview_window(MAIN_WINDOW_LABEL) else {
            return Ok(());
        };
        window
            .set_badge_label(badge.map(str::to_string))
            .map_err(|e| ShellError::host("set dock badge", e))
    }

    // Only the macOS dock carries a text badge.
    #[cfg(not(target_os = "macos"))]
    fn set_badge(&mut self, _badge: Option<&str>) -> Result<()> {
        Ok(())
    }

    fn destroy(&mut self) {
        self.icon = None;
        self.app.remove_tray_by_id(TRAY_ID);
    }
}
