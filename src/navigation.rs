use crate::error::{Result, ShellError};
use crate::host::UrlOpener;
use log::{debug, error};
use url::Url;

/// Decides whether a URL belongs to the wrapped application.
#[derive(Debug, Clone)]
pub struct NavigationClassifier {
    /// Host of the canonical URL, including a non-default port
    main_host: String,
    main_hostname: String,
    main_pathname: String,
}

/// Strip trailing slashes, collapsing an empty path to `/`.
pub fn normalize_pathname(pathname: &str) -> &str {
    let trimmed = pathname.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// `host[:port]` the way the URL authority spells it.
fn host_with_port(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

impl NavigationClassifier {
    pub fn new(app_url: &str) -> Result<Self> {
        let parsed = Url::parse(app_url).map_err(|source| ShellError::InvalidUrl {
            url: app_url.to_string(),
            source,
        })?;

        let main_host = host_with_port(&parsed).ok_or_else(|| ShellError::InvalidUrl {
            url: app_url.to_string(),
            source: url::ParseError::EmptyHost,
        })?;
        let main_hostname = parsed.host_str().unwrap_or_default().to_string();

        Ok(Self {
            main_host,
            main_hostname,
            main_pathname: normalize_pathname(parsed.path()).to_string(),
        })
    }

    pub fn is_internal(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };

        if matches!(parsed.scheme(), "about" | "chrome") {
            return true;
        }

        let Some(hostname) = parsed.host_str() else {
            return false;
        };

        if hostname == "localhost" || hostname == "127.0.0.1" {
            return true;
        }

        hostname == self.main_hostname
            || hostname
                .strip_suffix(self.main_hostname.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    }

    /// True only for the canonical top-level screen.
    pub fn is_main(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };

        if host_with_port(&parsed).as_deref() != Some(self.main_host.as_str()) {
            return false;
        }

        normalize_pathname(parsed.path()) == self.main_pathname
    }

    /// Unread-count heuristic: the page puts the counter into its title.
    pub fn has_notifications(&self, url: &str, title: &str) -> bool {
        self.is_main(url) && title.chars().any(|c| c.is_ascii_digit())
    }
}

/// Hand `url` to the OS default handler, logging instead of failing.
pub fn open_external(opener: &dyn UrlOpener, url: &str) {
    if url.is_empty() {
        return;
    }

    if Url::parse(url).is_err() {
        debug!("[nav] ignoring malformed external url {url}");
        return;
    }

    if let Err(e) = opener.open_url(url) {
        error!("Failed to open external URL {url}: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingOpener;

    fn classifier() -> NavigationClassifier {
        NavigationClassifier::new("https://messenger.example/").unwrap()
    }

    #[test]
    fn test_normalize_pathname() {
        assert_eq!(normalize_pathname(""), "/");
        assert_eq!(normalize_pathname("/"), "/");
        assert_eq!(normalize_pathname("///"), "/");
        assert_eq!(normalize_pathname("/chats/"), "/chats");
        assert_eq!(normalize_pathname("/chats//"), "/chats");
        assert_eq!(normalize_pathname("/chats"), "/chats");
    }

    #[test]
    fn test_invalid_canonical_url_is_rejected() {
        assert!(NavigationClassifier::new("not a url").is_err());
        assert!(NavigationClassifier::new("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_is_internal_privileged_schemes_and_loopback() {
        let nav = classifier();
        assert!(nav.is_internal("about:blank"));
        assert!(nav.is_internal("chrome://settings"));
        assert!(nav.is_internal("http://localhost:3000"));
        assert!(nav.is_internal("http://127.0.0.1:8080/debug"));
    }

    #[test]
    fn test_is_internal_same_host_and_subdomains() {
        let nav = classifier();
        assert!(nav.is_internal("https://messenger.example/chat/42"));
        assert!(nav.is_internal("https://files.messenger.example/a.png"));
        assert!(nav.is_internal("https://a.b.messenger.example"));
    }

    #[test]
    fn test_is_internal_rejects_unrelated_hosts() {
        let nav = classifier();
        assert!(!nav.is_internal("https://example.org/"));
        assert!(!nav.is_internal("https://evilmessenger.example/"));
        assert!(!nav.is_internal("https://messenger.example.evil.org/"));
    }

    #[test]
    fn test_malformed_urls_are_never_internal_or_main() {
        let nav = classifier();
        for input in ["", "::::", "https://", "not a url", "http://[::1"] {
            assert!(!nav.is_internal(input), "{input} should not be internal");
            assert!(!nav.is_main(input), "{input} should not be main");
        }
    }

    #[test]
    fn test_is_main_ignores_trailing_slash() {
        let nav = NavigationClassifier::new("https://host.example/path").unwrap();
        assert!(nav.is_main("https://host.example/path/"));
        assert!(nav.is_main("https://host.example/path"));
        assert!(!nav.is_main("https://other.example/path"));
        assert!(!nav.is_main("https://sub.host.example/path"));
        assert!(!nav.is_main("https://host.example/path/more"));
    }

    #[test]
    fn test_is_main_compares_port() {
        let nav = NavigationClassifier::new("http://localhost:3000/").unwrap();
        assert!(nav.is_main("http://localhost:3000"));
        assert!(!nav.is_main("http://localhost:4000/"));
    }

    #[test]
    fn test_has_notifications() {
        let nav = classifier();
        assert!(nav.has_notifications("https://messenger.example/", "Chats (3)"));
        assert!(!nav.has_notifications("https://messenger.example/", "Chats"));
        assert!(!nav.has_notifications("https://messenger.example/settings", "Chats (3)"));
    }

    #[test]
    fn test_open_external_skips_empty_and_malformed() {
        let opener = RecordingOpener::default();
        open_external(&opener, "");
        open_external(&opener, "no scheme here");
        assert!(opener.opened().is_empty());

        open_external(&opener, "https://example.org/doc");
        assert_eq!(opener.opened(), vec!["https://example.org/doc".to_string()]);
    }

    #[test]
    fn test_open_external_swallows_failures() {
        let opener = RecordingOpener::failing();
        open_external(&opener, "https://example.org/");
        assert_eq!(opener.opened().len(), 1);
    }
}
