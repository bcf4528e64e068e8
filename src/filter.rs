//! Managed-mode request filter.
//!
//! Cancels analytics and tracking sub-resource requests while managed mode is
//! on. Document loads are always let through so navigation keeps working.

use crate::constants::LOG_URL_LIMIT;
use crate::state::SessionFlags;
use log::{info, warn};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Kind of resource a request loads, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    MainFrame,
    SubFrame,
    Stylesheet,
    Script,
    Image,
    Xhr,
    Other,
}

impl ResourceType {
    /// Map a `Sec-Fetch-Dest` request header value.
    pub fn from_fetch_dest(dest: &str) -> Self {
        match dest.to_ascii_lowercase().as_str() {
            "document" => Self::MainFrame,
            "iframe" | "frame" | "embed" | "object" => Self::SubFrame,
            "style" => Self::Stylesheet,
            "script" | "worker" | "sharedworker" | "serviceworker" => Self::Script,
            "image" => Self::Image,
            "empty" => Self::Xhr,
            _ => Self::Other,
        }
    }

    fn is_document(self) -> bool {
        matches!(self, Self::MainFrame | Self::SubFrame)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    BlockedHost,
    BlockedPath,
}

impl BlockReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BlockedHost => "blocked-host",
            Self::BlockedPath => "blocked-path",
        }
    }
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct BlockRule {
    pub matches: fn(&Url) -> bool,
    pub reason: BlockReason,
}

const BLOCKED_HOSTS: &[&str] = &[
    "metrika.yandex.ru",
    "mc.yandex.ru",
    "mc.webvisor.org",
    "an.yandex.ru",
];

/// Lowercase path fragments; matched case-insensitively anywhere in the path
const BLOCKED_PATH_FRAGMENTS: &[&str] = &["/metrika/", "/analytics/", "/collect", "/watch"];

const BLOCKED_SCHEMES: &[&str] = &["http", "https"];

fn host_is_blocked(url: &Url) -> bool {
    let Some(hostname) = url.host_str() else {
        return false;
    };
    BLOCKED_HOSTS.iter().any(|host| {
        hostname == *host
            || hostname
                .strip_suffix(host)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

fn path_is_blocked(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    BLOCKED_PATH_FRAGMENTS
        .iter()
        .any(|fragment| path.contains(fragment))
}

/// Evaluated in order; the first matching rule decides.
pub static RULES: &[BlockRule] = &[
    BlockRule {
        matches: host_is_blocked,
        reason: BlockReason::BlockedHost,
    },
    BlockRule {
        matches: path_is_blocked,
        reason: BlockReason::BlockedPath,
    },
];

/// Cut `value` to at most `limit` characters, marking the cut with `…`.
pub fn truncate_url(value: &str, limit: usize) -> Cow<'_, str> {
    if value.chars().count() <= limit {
        return Cow::Borrowed(value);
    }

    let kept: String = value.chars().take(limit.saturating_sub(1)).collect();
    Cow::Owned(format!("{kept}…"))
}

/// Percent-decode for display, falling back to the raw string.
pub fn decode_url(value: &str) -> Cow<'_, str> {
    match urlencoding::decode(value) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!(
                "[ublock] failed to decode url {}: {e}",
                truncate_url(value, LOG_URL_LIMIT)
            );
            Cow::Borrowed(value)
        }
    }
}

fn display_url(raw: &str) -> String {
    truncate_url(&decode_url(raw), LOG_URL_LIMIT).into_owned()
}

/// Blocks analytics requests while managed mode is enabled.
///
/// Holds the live session flags rather than a snapshot so toggling managed
/// mode applies to the next request without recreating the window.
#[derive(Clone)]
pub struct RequestFilter {
    flags: Arc<SessionFlags>,
}

impl RequestFilter {
    pub fn new(flags: Arc<SessionFlags>) -> Self {
        Self { flags }
    }

    pub fn should_block(&self, raw_url: &str, resource_type: ResourceType) -> Option<BlockReason> {
        if !self.flags.managed_mode() || raw_url.is_empty() {
            return None;
        }

        let url = match Url::parse(raw_url) {
            Ok(url) => url,
            Err(e) => {
                warn!("[ublock] failed to parse url {}: {e}", display_url(raw_url));
                return None;
            }
        };

        if !BLOCKED_SCHEMES.contains(&url.scheme()) || resource_type.is_document() {
            return None;
        }

        let rule = RULES.iter().find(|rule| (rule.matches)(&url))?;
        info!("[ublock] cancel {} ({})", display_url(raw_url), rule.reason);
        Some(rule.reason)
    }

    pub fn is_blocked(&self, raw_url: &str, resource_type: ResourceType) -> bool {
        self.should_block(raw_url, resource_type).is_some()
    }
}
