pub mod constants;
pub mod error;
pub mod filter;
pub mod host;
pub mod menu;
pub mod navigation;
pub mod resources;
pub mod settings;
pub mod shell;
pub mod state;
#[cfg(test)]
mod test_utils;
pub mod tray;
pub mod window;

pub use error::{Result, ShellError};
pub use shell::{Shell, ShellOptions, TrayOutcome};
