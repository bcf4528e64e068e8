mod menu;
mod opener;
mod surface;
mod tray;

use crate::opener::TauriOpener;
use crate::surface::TauriWindowFactory;
use crate::tray::TauriTray;
use log::{error, info, warn};
use messenger_shell::constants::MAIN_WINDOW_LABEL;
use messenger_shell::filter::RequestFilter;
use messenger_shell::host::UrlOpener;
use messenger_shell::resources::ResourcePaths;
use messenger_shell::settings::{runtime_dir, SettingsStore, WindowBounds};
use messenger_shell::state::SessionRegistry;
use messenger_shell::tray::{TrayController, TrayIcons, TrayImage};
use messenger_shell::window::{load_custom_css, CloseAction, NavigationPhase};
use messenger_shell::{Shell, ShellOptions};
use std::sync::{Arc, Mutex};
use tauri::webview::PageLoadEvent;
use tauri::{AppHandle, Manager, RunEvent, State, Window, WindowEvent};

/// The orchestrator, shared with every host callback.
pub struct ShellState(Mutex<Shell<TauriTray>>);

/// Run `f` against the shell, recovering the lock if a callback panicked.
pub(crate) fn with_shell<T>(app: &AppHandle, f: impl FnOnce(&mut Shell<TauriTray>) -> T) -> Option<T> {
    let state = app.try_state::<ShellState>()?;
    let mut shell = match state.0.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!("Shell mutex was poisoned, recovering");
            poisoned.into_inner()
        }
    };
    Some(f(&mut shell))
}

/// Asked by the page guard script before a sub-resource request goes out.
#[tauri::command]
fn should_block_request(filter: State<'_, RequestFilter>, url: String, resource_type: String) -> bool {
    messenger_shell::window::should_block_request(&filter, &url, &resource_type)
}

fn setup(app: &mut tauri::App) -> Result<(), Box<dyn std::error::Error>> {
    let handle = app.handle().clone();

    let resources = ResourcePaths::new(&app.path().resource_dir()?);
    let settings = SettingsStore::open(&runtime_dir()?);
    info!("[settings] using {}", settings.path().display());

    let options = ShellOptions {
        custom_css: load_custom_css(&resources.custom_css),
        window_icon: TrayImage::load(&resources.app_icon, false),
        ..ShellOptions::default()
    };
    let icons = TrayIcons::load(&resources.tray_blue, &resources.tray_red, &resources.app_icon);
    let opener: Arc<dyn UrlOpener> = Arc::new(TauriOpener::new(handle.clone()));
    let factory = TauriWindowFactory::new(handle.clone(), Arc::new(SessionRegistry::new()));
    let tray = TrayController::new(TauriTray::new(handle.clone()), icons);

    let mut shell = Shell::new(options, settings, opener, Box::new(factory), tray)?;
    app.manage(shell.request_filter());
    menu::install(&handle, &shell)?;
    shell.ensure_window()?;
    shell.ensure_tray();
    shell.update_tray_state();

    app.manage(ShellState(Mutex::new(shell)));
    Ok(())
}

fn on_window_event(window: &Window, event: &WindowEvent) {
    if window.label() != MAIN_WINDOW_LABEL {
        return;
    }
    let app = window.app_handle();

    match event {
        WindowEvent::CloseRequested { api, .. } => {
            if with_shell(app, |shell| shell.on_close_requested()) == Some(CloseAction::HideToTray) {
                api.prevent_close();
            }
        }
        WindowEvent::Resized(size) => {
            let scale = window.scale_factor().unwrap_or(1.0);
            let logical = size.to_logical::<f64>(scale);
            with_shell(app, |shell| {
                shell.on_resized(WindowBounds {
                    width: logical.width,
                    height: logical.height,
                });
            });
        }
        WindowEvent::Focused(true) => {
            with_shell(app, |shell| shell.on_shown());
        }
        WindowEvent::Destroyed => {
            info!("[window] main window closed");
            with_shell(app, Shell::on_closed);
        }
        _ => {}
    }
}

fn on_run_event(app: &AppHandle, event: RunEvent) {
    match event {
        // No `code` means the last window went away rather than an explicit exit.
        RunEvent::ExitRequested { code: None, api, .. } if cfg!(target_os = "macos") => {
            api.prevent_exit();
        }
        RunEvent::ExitRequested { .. } => {
            with_shell(app, |shell| shell.before_quit());
        }
        RunEvent::Exit => {
            with_shell(app, Shell::quit);
        }
        #[cfg(target_os = "macos")]
        RunEvent::Reopen { .. } => {
            with_shell(app, Shell::activate);
        }
        _ => {}
    }
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
            info!("[window] second instance launched, focusing main window");
            with_shell(app, Shell::show_window);
        }))
        .plugin(tauri_plugin_opener::init())
        .invoke_handler(tauri::generate_handler![should_block_request])
        .setup(|app| {
            if let Err(e) = setup(app) {
                error!("Messenger shell initialization failed: {e}");
                return Err(e);
            }
            Ok(())
        })
        .on_page_load(|webview, payload| {
            if webview.label() != MAIN_WINDOW_LABEL {
                return;
            }
            let url = payload.url().as_str();
            with_shell(webview.app_handle(), |shell| match payload.event() {
                PageLoadEvent::Started => shell.on_navigation(NavigationPhase::Start, url),
                PageLoadEvent::Finished => {
                    shell.on_navigation(NavigationPhase::Finish, url);
                    shell.on_ready(url);
                }
            });
        })
        .on_window_event(on_window_event)
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(on_run_event);
}
