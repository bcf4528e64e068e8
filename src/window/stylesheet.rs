use crate::host::{BrowserSurface, StyleHandle};
use log::{error, warn};
use std::path::Path;

/// Read the optional custom stylesheet. A missing file disables the feature.
pub fn load_custom_css(path: &Path) -> Option<String> {
    if !path.exists() {
        return None;
    }

    match std::fs::read_to_string(path) {
        Ok(css) if css.trim().is_empty() => None,
        Ok(css) => Some(css),
        Err(e) => {
            warn!("[css] failed to read custom stylesheet {}: {e}", path.display());
            None
        }
    }
}

/// Keeps the custom stylesheet in the document only while managed mode is on.
#[derive(Debug, Default)]
pub struct StylesheetInjector {
    css: Option<String>,
    handle: Option<StyleHandle>,
}

impl StylesheetInjector {
    pub fn new(css: Option<String>) -> Self {
        Self { css, handle: None }
    }

    pub fn is_inserted(&self) -> bool {
        self.handle.is_some()
    }

    /// Insert or remove the stylesheet to match `managed_mode`.
    pub fn sync(&mut self, surface: &dyn BrowserSurface, managed_mode: bool) {
        let Some(css) = self.css.as_deref() else {
            return;
        };

        if !managed_mode {
            if let Some(handle) = self.handle.take() {
                if let Err(e) = surface.remove_css(&handle) {
                    error!("[css] failed to remove custom stylesheet: {e}");
                }
            }
            return;
        }

        if self.handle.is_some() {
            return;
        }

        match surface.insert_css(css) {
            Ok(handle) => self.handle = Some(handle),
            Err(e) => error!("[css] failed to insert custom stylesheet: {e}"),
        }
    }

    /// The document was replaced; whatever was inserted is gone with it.
    pub fn reset_document(&mut self) {
        self.handle = None;
    }
}
