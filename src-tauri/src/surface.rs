//! Main webview window built on Tauri.

use crate::tray::to_image;
use crate::with_shell;
use messenger_shell::constants::MAIN_WINDOW_LABEL;
use messenger_shell::host::{BrowserSurface, StyleHandle, SurfaceFactory, WindowOptions};
use messenger_shell::state::{SessionHook, SessionRegistry};
use messenger_shell::tray::TrayImage;
use messenger_shell::window::{WindowOpenAction, GUARD_SCRIPT};
use messenger_shell::{Result, ShellError};
use log::{debug, error};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tauri::webview::NewWindowResponse;
use tauri::{AppHandle, Manager, Url, WebviewUrl, WebviewWindow, WebviewWindowBuilder};

const STYLE_ID_PREFIX: &str = "messenger-shell-style";

fn host_error(operation: &'static str) -> impl FnOnce(tauri::Error) -> ShellError {
    move |e| ShellError::host(operation, e)
}

fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|source| ShellError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

pub struct TauriSurface {
    window: WebviewWindow,
    next_style: AtomicUsize,
}

impl TauriSurface {
    fn new(window: WebviewWindow) -> Self {
        Self {
            window,
            next_style: AtomicUsize::new(0),
        }
    }

    fn eval(&self, operation: &'static str, script: &str) -> Result<()> {
        self.window.eval(script).map_err(host_error(operation))
    }
}

impl BrowserSurface for TauriSurface {
    fn load_url(&self, url: &str) -> Result<()> {
        let url = parse_url(url)?;
        self.window.navigate(url).map_err(host_error("load url"))
    }

    fn reload(&self) -> Result<()> {
        self.eval("reload", "window.location.reload();")
    }

    fn show(&self) -> Result<()> {
        self.window.show().map_err(host_error("show window"))
    }

    fn hide(&self) -> Result<()> {
        self.window.hide().map_err(host_error("hide window"))
    }

    fn focus(&self) -> Result<()> {
        self.window.set_focus().map_err(host_error("focus window"))
    }

    fn is_visible(&self) -> bool {
        self.window.is_visible().unwrap_or(false)
    }

    fn set_skip_taskbar(&self, skip: bool) -> Result<()> {
        self.window
            .set_skip_taskbar(skip)
            .map_err(host_error("set skip taskbar"))
    }

    fn set_icon(&self, icon: &TrayImage) -> Result<()> {
        let Some(image) = to_image(icon) else {
            return Ok(());
        };
        self.window.set_icon(image).map_err(host_error("set window icon"))
    }

    fn insert_css(&self, css: &str) -> Result<StyleHandle> {
        let index = self.next_style.fetch_add(1, Ordering::Relaxed);
        let id = format!("{STYLE_ID_PREFIX}-{index}");
        let id_literal = serde_json::to_string(&id)?;
        let css_literal = serde_json::to_string(css)?;
        let script = format!(
            "(function(){{var s=document.createElement('style');s.id={id_literal};\
             s.textContent={css_literal};\
             (document.head||document.documentElement).appendChild(s);}})();"
        );
        self.eval("insert css", &script)?;
        Ok(StyleHandle(id))
    }

    fn remove_css(&self, handle: &StyleHandle) -> Result<()> {
        let id_literal = serde_json::to_string(&handle.0)?;
        let script = format!(
            "(function(){{var s=document.getElementById({id_literal});if(s){{s.remove();}}}})();"
        );
        self.eval("remove css", &script)
    }

    fn set_zoom(&self, factor: f64) -> Result<()> {
        self.window.set_zoom(factor).map_err(host_error("set zoom"))
    }
}

/// Builds the main window and installs its per-session hooks.
pub struct TauriWindowFactory {
    app: AppHandle,
    registry: Arc<SessionRegistry>,
    generation: AtomicUsize,
}

impl TauriWindowFactory {
    pub fn new(app: AppHandle, registry: Arc<SessionRegistry>) -> Self {
        Self {
            app,
            registry,
            generation: AtomicUsize::new(0),
        }
    }
}

impl SurfaceFactory for TauriWindowFactory {
    fn create(&self, options: &WindowOptions) -> Result<Box<dyn BrowserSurface>> {
        let url = parse_url(&options.app_url)?;
        // Every build gets a fresh webview, so hooks are tracked per build.
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let session = format!("{MAIN_WINDOW_LABEL}#{generation}");

        let mut builder = WebviewWindowBuilder::new(&self.app, MAIN_WINDOW_LABEL, WebviewUrl::External(url))
            .title(&options.title)
            .inner_size(options.bounds.width, options.bounds.height)
            .visible(false);
        if let Some(icon) = to_image(&options.icon) {
            builder = builder.icon(icon).map_err(host_error("set window icon"))?;
        }

        if self.registry.register(&session, SessionHook::UserAgent) {
            builder = builder.user_agent(&options.user_agent);
        }

        // Requests to remote origins never reach the host, so the page
        // consults the filter through `should_block_request`.
        if self.registry.register(&session, SessionHook::RequestFilter) {
            builder = builder.initialization_script(GUARD_SCRIPT);
        }

        let policy = options.policy.clone();
        builder = builder.on_navigation(move |url| policy.on_will_navigate(url.as_str()));

        let policy = options.policy.clone();
        let app = self.app.clone();
        builder = builder.on_new_window(move |url, _features| {
            match policy.on_window_open(url.as_str()) {
                WindowOpenAction::Allow => NewWindowResponse::Allow,
                WindowOpenAction::Deny => NewWindowResponse::Deny,
                WindowOpenAction::LoadInPlace(target) => {
                    load_in_main_window(&app, &target);
                    NewWindowResponse::Deny
                }
            }
        });

        let app = self.app.clone();
        builder = builder.on_document_title_changed(move |window, title| {
            if let Err(e) = window.set_title(&title) {
                debug!("[window] failed to mirror title: {e}");
            }
            let url = window.url().ok().map(String::from);
            with_shell(&app, |shell| {
                shell.on_title_changed(&title);
                if let Some(url) = url.as_deref() {
                    shell.on_url_observed(url);
                }
            });
        });

        let window = builder.build().map_err(host_error("create main window"))?;
        if self.registry.register(&session, SessionHook::Permissions) {
            install_webview_hooks(&window, self.app.clone())?;
        }
        Ok(Box::new(TauriSurface::new(window)))
    }
}

/// Permission and load-failure signals straight from WebKitGTK.
#[cfg(target_os = "linux")]
fn install_webview_hooks(window: &WebviewWindow, app: AppHandle) -> Result<()> {
    use glib::error::ErrorDomain;
    use glib::prelude::ObjectExt;
    use messenger_shell::window::grant_permission;
    use webkit2gtk::{NetworkError, PermissionRequestExt, WebViewExt};

    window
        .with_webview(move |webview| {
            let view = webview.inner();
            view.connect_permission_request(|_, request| {
                if grant_permission(request.type_().name()) {
                    request.allow();
                } else {
                    request.deny();
                }
                true
            });
            view.connect_load_failed(move |_, _, uri, error| {
                let code = error.kind::<NetworkError>().map(ErrorDomain::code);
                with_shell(&app, |shell| shell.on_load_failed(code, error.message(), uri));
                false
            });
        })
        .map_err(host_error("install webview hooks"))
}

// WebView2 and WKWebView answer media prompts themselves and report no
// load failures through Tauri.
#[cfg(not(target_os = "linux"))]
#[allow(clippy::unnecessary_wraps, reason = "same signature as the Linux hooks")]
fn install_webview_hooks(_window: &WebviewWindow, _app: AppHandle) -> Result<()> {
    debug!("[permissions] permission requests handled by the webview");
    Ok(())
}

fn load_in_main_window(app: &AppHandle, target: &str) {
    let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) else {
        return;
    };
    let result = parse_url(target).and_then(|url| window.navigate(url).map_err(host_error("load url")));
    if let Err(e) = result {
        error!("[nav] failed to load {target} in place: {e}");
    }
}
