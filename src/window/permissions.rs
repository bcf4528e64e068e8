//! Permission answers for the main window's session.

use log::debug;

/// Every request is granted; camera and microphone access still go
/// through the OS consent prompt.
pub fn grant_permission(permission: &str) -> bool {
    debug!("[permissions] granting {permission}");
    true
}
