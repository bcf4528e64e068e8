use messenger_shell::host::UrlOpener;
use messenger_shell::{Result, ShellError};
use tauri::AppHandle;
use tauri_plugin_opener::OpenerExt;

/// Opens URLs with the desktop's default handler.
pub struct TauriOpener {
    app: AppHandle,
}

impl TauriOpener {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl UrlOpener for TauriOpener {
    fn open_url(&self, url: &str) -> Result<()> {
        self.app
            .opener()
            .open_url(url, None::<&str>)
            .map_err(|e| ShellError::host("open url", e))
    }
}
