//! Install trigger.
//!
//! Builds the OS-reserved `itms-services` URI that hands a manifest URL to
//! the iOS installer, and keeps the per-view diagnostic log of install
//! attempts. The log is UI-only: it never touches disk or the network and
//! is separate from operational `tracing` output.

use chrono::NaiveTime;
use ota_schema::ResolvedHost;
use std::collections::VecDeque;

/// URI scheme reserved by iOS for over-the-air installs.
pub const INSTALL_SCHEME: &str = "itms-services";

/// Build the install URI for a fully-qualified manifest URL.
///
/// The manifest URL is percent-encoded as a single parameter value, so any
/// query string it carries stays inside `url=`.
pub fn build_install_uri(manifest_url: &str) -> String {
    format!(
        "{INSTALL_SCHEME}://?action=download-manifest&url={}",
        urlencoding::encode(manifest_url)
    )
}

/// What the rendering context can do, decided once by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientCapabilities {
    /// Absolute origin (`scheme://host`) clients reach us at, if known.
    pub origin: Option<String>,
    /// Whether an install URI can be handed to the OS from this context.
    pub can_trigger_install: bool,
}

impl ClientCapabilities {
    /// A browser-facing context addressed at `host`.
    pub fn for_host(host: &ResolvedHost) -> Self {
        Self {
            origin: Some(host.base_url.clone()),
            can_trigger_install: true,
        }
    }

    /// A context with no known origin and no way to trigger installs.
    pub fn headless() -> Self {
        Self::default()
    }

    /// The origin, but only when install URIs are usable from here.
    pub fn install_origin(&self) -> Option<&str> {
        self.origin.as_deref().filter(|_| self.can_trigger_install)
    }
}

/// Newest-first buffer of install attempts for one view.
#[derive(Debug, Clone, Default)]
pub struct InstallLog {
    entries: VecDeque<String>,
    limit: Option<usize>,
}

impl InstallLog {
    /// An unbounded log; it lives only as long as the view owning it.
    pub fn new() -> Self {
        Self::default()
    }

    /// A log that keeps only the newest `limit` entries.
    pub fn bounded(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit: Some(limit),
        }
    }

    /// Record an install attempt stamped with the local wall-clock time.
    pub fn record_attempt(&mut self, filename: &str, uri: &str) {
        self.record_attempt_at(chrono::Local::now().time(), filename, uri);
    }

    /// Record an install attempt at an explicit time.
    pub fn record_attempt_at(&mut self, at: NaiveTime, filename: &str, uri: &str) {
        self.push(at, "Clicked install for", filename, uri);
    }

    /// Record that an install link was generated but not followed.
    pub fn record_link(&mut self, filename: &str, uri: &str) {
        self.record_link_at(chrono::Local::now().time(), filename, uri);
    }

    /// Record a generated install link at an explicit time.
    pub fn record_link_at(&mut self, at: NaiveTime, filename: &str, uri: &str) {
        self.push(at, "Generated install link for", filename, uri);
    }

    fn push(&mut self, at: NaiveTime, event: &str, filename: &str, uri: &str) {
        let line = format!("[{}] {event} {filename}.\nURL: {uri}", at.format("%H:%M:%S"));
        self.entries.push_front(line);
        if let Some(limit) = self.limit {
            self.entries.truncate(limit);
        }
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Number of entries held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ota_schema::Scheme;

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_install_uri_shape() {
        let uri = build_install_uri("https://h.example/api/manifest?file=a.ipa");
        assert_eq!(
            uri,
            "itms-services://?action=download-manifest&url=https%3A%2F%2Fh.example%2Fapi%2Fmanifest%3Ffile%3Da.ipa"
        );
    }

    #[test]
    fn test_manifest_url_is_a_single_parameter() {
        let manifest =
            "https://h.example/api/manifest?file=My%20App%20v2.ipa&title=My%20App%20v2.ipa";
        let uri = build_install_uri(manifest);
        let (_, value) = uri.split_once("&url=").unwrap();
        assert!(!value.contains('&'));
        assert!(!value.contains('?'));
        assert!(value.contains("My%2520App%2520v2.ipa"));
        assert_eq!(urlencoding::decode(value).unwrap(), manifest);
    }

    #[test]
    fn test_log_is_newest_first() {
        let mut log = InstallLog::new();
        assert!(log.is_empty());
        log.record_attempt_at(at(9, 0, 0), "a.ipa", "itms-services://one");
        log.record_attempt_at(at(9, 0, 5), "b.ipa", "itms-services://two");

        let entries: Vec<&str> = log.entries().collect();
        assert_eq!(
            entries,
            vec![
                "[09:00:05] Clicked install for b.ipa.\nURL: itms-services://two",
                "[09:00:00] Clicked install for a.ipa.\nURL: itms-services://one",
            ]
        );
    }

    #[test]
    fn test_unbounded_log_keeps_everything() {
        let mut log = InstallLog::new();
        for i in 0..500 {
            log.record_attempt(&format!("{i}.ipa"), "uri");
        }
        assert_eq!(log.len(), 500);
    }

    #[test]
    fn test_bounded_log_drops_oldest() {
        let mut log = InstallLog::bounded(2);
        log.record_attempt_at(at(1, 0, 0), "a.ipa", "u");
        log.record_attempt_at(at(2, 0, 0), "b.ipa", "u");
        log.record_attempt_at(at(3, 0, 0), "c.ipa", "u");
        assert_eq!(log.len(), 2);
        assert!(log.entries().next().unwrap().contains("c.ipa"));
        assert!(log.entries().all(|e| !e.contains("a.ipa")));
    }

    #[test]
    fn test_generated_links_are_not_clicks() {
        let mut log = InstallLog::new();
        log.record_link_at(at(8, 30, 0), "a.ipa", "itms-services://one");
        assert_eq!(
            log.entries().next(),
            Some("[08:30:00] Generated install link for a.ipa.\nURL: itms-services://one")
        );
    }

    #[test]
    fn test_capabilities() {
        let host = ResolvedHost::new(Scheme::Https, "h.example");
        let caps = ClientCapabilities::for_host(&host);
        assert_eq!(caps.install_origin(), Some("https://h.example"));

        let headless = ClientCapabilities::headless();
        assert_eq!(headless.install_origin(), None);

        let no_trigger = ClientCapabilities {
            origin: Some("https://h.example".into()),
            can_trigger_install: false,
        };
        assert_eq!(no_trigger.install_origin(), None);
    }
}
