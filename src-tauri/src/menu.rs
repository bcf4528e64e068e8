use crate::tray::TauriTray;
use crate::with_shell;
use log::warn;
use messenger_shell::menu::{MenuAction, MenuEntry, SETTINGS_MENU, SETTINGS_MENU_ID, SETTINGS_MENU_LABEL};
use messenger_shell::Shell;
use tauri::{
    menu::{CheckMenuItem, Menu, MenuEvent, MenuItem, PredefinedMenuItem, Submenu},
    AppHandle,
};

/// Append the settings submenu to the application menu bar, once.
pub fn install(app: &AppHandle, shell: &Shell<TauriTray>) -> tauri::Result<()> {
    let menu = match app.menu() {
        Some(menu) => menu,
        None => Menu::default(app)?,
    };
    if menu.get(SETTINGS_MENU_ID).is_some() {
        return Ok(());
    }

    let submenu = Submenu::with_id(app, SETTINGS_MENU_ID, SETTINGS_MENU_LABEL, true)?;
    for entry in SETTINGS_MENU {
        match *entry {
            MenuEntry::Separator => submenu.append(&PredefinedMenuItem::separator(app)?)?,
            MenuEntry::Action(action) => match shell.is_checked(action) {
                Some(checked) => submenu.append(&CheckMenuItem::with_id(
                    app,
                    action.id(),
                    action.label(),
                    true,
                    checked,
                    None::<&str>,
                )?)?,
                None => submenu.append(&MenuItem::with_id(app, action.id(), action.label(), true, None::<&str>)?)?,
            },
        }
    }

    menu.append(&submenu)?;
    app.set_menu(menu)?;
    app.on_menu_event(handle_menu_event);
    Ok(())
}

fn check_item(app: &AppHandle, action: MenuAction) -> Option<CheckMenuItem<tauri::Wry>> {
    let menu = app.menu()?;
    let settings = menu.get(SETTINGS_MENU_ID)?;
    let item = settings.as_submenu()?.get(action.id())?;
    item.as_check_menuitem().cloned()
}

fn handle_menu_event(app: &AppHandle, event: MenuEvent) {
    let Some(action) = MenuAction::from_id(event.id().as_ref()) else {
        return;
    };

    let item = check_item(app, action);
    let reported = item.as_ref().and_then(|item| item.is_checked().ok());
    let applied = with_shell(app, |shell| {
        shell.handle_menu_action(action, reported);
        shell.is_checked(action)
    })
    .flatten();

    // Keep the checkbox in step with the stored value.
    if let (Some(item), Some(checked)) = (item, applied) {
        if let Err(e) = item.set_checked(checked) {
            warn!("[menu] failed to update {}: {e}", action.id());
        }
    }
}
