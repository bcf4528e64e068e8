//! Script installed into every document of the main window.
//!
//! The webview gives the host no hook on sub-resource requests to remote
//! origins, so the page asks the shell instead: `fetch`, `XMLHttpRequest`,
//! `navigator.sendBeacon` and script/image `src` assignments are held until
//! [`BLOCK_REQUEST_COMMAND`] answers. Each request is reported with the
//! `Sec-Fetch-Dest` name the browser would send for it.
//!
//! Display capture requests that do not pick a surface ask for a whole
//! screen; the platform picker falls back to windows.

use crate::filter::{RequestFilter, ResourceType};

pub const GUARD_SCRIPT: &str = include_str!("guard.js");

/// IPC command the guard script invokes with `{ url, resourceType }`
pub const BLOCK_REQUEST_COMMAND: &str = "should_block_request";

/// Destinations the guard script reports
pub const GUARDED_DESTINATIONS: &[&str] = &["empty", "script", "image"];

/// `displaySurface` constraint used when the page names none
pub const PREFERRED_DISPLAY_SURFACE: &str = "monitor";

/// Answer a guard query from the page.
pub fn should_block_request(filter: &RequestFilter, url: &str, fetch_dest: &str) -> bool {
    filter.is_blocked(url, ResourceType::from_fetch_dest(fetch_dest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SessionFlags;
    use std::sync::Arc;

    fn filter(managed: bool) -> RequestFilter {
        RequestFilter::new(Arc::new(SessionFlags::new(managed, true, false)))
    }

    #[test]
    fn test_script_invokes_block_command() {
        assert!(GUARD_SCRIPT.contains(&format!("'{BLOCK_REQUEST_COMMAND}'")));
        assert!(GUARD_SCRIPT.contains("resourceType"));
        assert!(GUARD_SCRIPT.contains(&format!("displaySurface: '{PREFERRED_DISPLAY_SURFACE}'")));
    }

    #[test]
    fn test_guarded_destinations_are_sub_resources() {
        for dest in GUARDED_DESTINATIONS {
            assert!(GUARD_SCRIPT.contains(&format!("'{dest}'")), "{dest} not reported by script");
            let kind = ResourceType::from_fetch_dest(dest);
            assert!(
                !matches!(kind, ResourceType::MainFrame | ResourceType::SubFrame | ResourceType::Other),
                "{dest} maps to {kind:?}"
            );
        }
    }

    #[test]
    fn test_guard_query_blocks_trackers_in_managed_mode() {
        let filter = filter(true);
        assert!(should_block_request(&filter, "https://mc.yandex.ru/metrika/tag.js", "script"));
        assert!(should_block_request(&filter, "https://mc.yandex.ru/watch/1", "empty"));
        assert!(should_block_request(&filter, "https://an.yandex.ru/pixel.gif", "image"));
        assert!(!should_block_request(&filter, "https://messenger.360.yandex.ru/api/chats", "empty"));
    }

    #[test]
    fn test_guard_query_follows_managed_mode_flag() {
        let flags = Arc::new(SessionFlags::new(false, true, false));
        let filter = RequestFilter::new(Arc::clone(&flags));
        assert!(!should_block_request(&filter, "https://mc.yandex.ru/watch/1", "empty"));

        flags.set_managed_mode(true);
        assert!(should_block_request(&filter, "https://mc.yandex.ru/watch/1", "empty"));
    }
}
