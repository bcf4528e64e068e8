use std::path::{Path, PathBuf};

/// Files shipped next to the binary under `resources/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePaths {
    pub app_icon: PathBuf,
    pub tray_blue: PathBuf,
    pub tray_red: PathBuf,
    pub custom_css: PathBuf,
}

impl ResourcePaths {
    pub fn new(root: &Path) -> Self {
        let dir = root.join("resources");
        Self {
            app_icon: dir.join("messenger.png"),
            tray_blue: dir.join("tray-blue.png"),
            tray_red: dir.join("tray-red.png"),
            custom_css: dir.join("custom.css"),
        }
    }
}
