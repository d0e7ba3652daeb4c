//! Host resolution.
//!
//! Answers "what URL should a client use to reach me" from the inbound
//! `Host` and forwarded-protocol headers. The headers are untrusted for
//! authentication but authoritative for addressing.

use crate::error::OtaError;
use ota_schema::{ResolvedHost, Scheme};

/// The request headers the resolver looks at.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestHeaders<'a> {
    /// `Host`
    pub host: Option<&'a str>,
    /// `X-Forwarded-Proto`
    pub forwarded_proto: Option<&'a str>,
    /// RFC 7239 `Forwarded`, consulted only when `X-Forwarded-Proto` is absent
    pub forwarded: Option<&'a str>,
}

/// Derives the externally visible base URL for a request.
#[derive(Debug, Clone, Default)]
pub struct HostResolver {
    tunnel_suffixes: Vec<String>,
}

impl HostResolver {
    /// Create a resolver that forces `https` for hosts under `tunnel_suffixes`.
    pub fn new<I, S>(tunnel_suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tunnel_suffixes = tunnel_suffixes
            .into_iter()
            .map(|s| s.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        Self { tunnel_suffixes }
    }

    /// Resolve the scheme, host and base URL for one request.
    ///
    /// # Errors
    ///
    /// Returns [`OtaError::MissingHost`] if the `Host` header is absent or blank.
    pub fn resolve(&self, headers: &RequestHeaders<'_>) -> Result<ResolvedHost, OtaError> {
        let host = headers
            .host
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or(OtaError::MissingHost)?;

        let mut scheme = forwarded_scheme(headers).unwrap_or_default();
        if scheme == Scheme::Http && self.is_tunnel_host(host) {
            tracing::debug!(host, "forcing https for tunnel host");
            scheme = Scheme::Https;
        }

        Ok(ResolvedHost::new(scheme, host))
    }

    /// Whether `host` (port ignored) is, or sits under, a trusted tunnel suffix.
    pub fn is_tunnel_host(&self, host: &str) -> bool {
        let name = strip_port(host).trim_end_matches('.').to_ascii_lowercase();
        self.tunnel_suffixes.iter().any(|suffix| {
            name == *suffix
                || name
                    .strip_suffix(suffix.as_str())
                    .is_some_and(|head| head.ends_with('.'))
        })
    }
}

/// Scheme announced by the proxy chain, if any. The first hop wins.
fn forwarded_scheme(headers: &RequestHeaders<'_>) -> Option<Scheme> {
    if let Some(proto) = headers.forwarded_proto {
        let first = proto.split(',').next().unwrap_or_default();
        return parse_or_default(first);
    }

    let first_hop = headers.forwarded?.split(',').next()?;
    first_hop
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("proto"))
        .and_then(|(_, value)| parse_or_default(value.trim().trim_matches('"')))
}

fn parse_or_default(value: &str) -> Option<Scheme> {
    match value.parse() {
        Ok(scheme) => Some(scheme),
        Err(e) => {
            tracing::debug!(value, error = %e, "ignoring unusable forwarded protocol");
            None
        }
    }
}

fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> HostResolver {
        HostResolver::new(["trusted-tunnel.example", ".ngrok-free.app"])
    }

    fn headers<'a>(host: Option<&'a str>, proto: Option<&'a str>) -> RequestHeaders<'a> {
        RequestHeaders {
            host,
            forwarded_proto: proto,
            forwarded: None,
        }
    }

    #[test]
    fn test_tunnel_host_forces_https() {
        let resolved = resolver()
            .resolve(&headers(Some("foo.trusted-tunnel.example"), Some("http")))
            .unwrap();
        assert_eq!(resolved.scheme, Scheme::Https);
        assert_eq!(resolved.base_url, "https://foo.trusted-tunnel.example");
    }

    #[test]
    fn test_plain_host_keeps_forwarded_http() {
        let resolved = resolver()
            .resolve(&headers(Some("myapp.example.com"), Some("http")))
            .unwrap();
        assert_eq!(resolved.scheme, Scheme::Http);
        assert_eq!(resolved.base_url, "http://myapp.example.com");
    }

    #[test]
    fn test_defaults_to_https() {
        let resolved = resolver()
            .resolve(&headers(Some("localhost:3000"), None))
            .unwrap();
        assert_eq!(resolved.scheme, Scheme::Https);
        assert_eq!(resolved.host, "localhost:3000");
    }

    #[test]
    fn test_missing_host() {
        let err = resolver().resolve(&headers(None, Some("https"))).unwrap_err();
        assert!(matches!(err, OtaError::MissingHost));
        let err = resolver().resolve(&headers(Some("  "), None)).unwrap_err();
        assert!(matches!(err, OtaError::MissingHost));
    }

    #[test]
    fn test_first_forwarded_value_wins() {
        let resolved = resolver()
            .resolve(&headers(Some("a.example.com"), Some("http, https")))
            .unwrap();
        assert_eq!(resolved.scheme, Scheme::Http);
    }

    #[test]
    fn test_garbage_proto_falls_back_to_https() {
        let resolved = resolver()
            .resolve(&headers(Some("a.example.com"), Some("gopher")))
            .unwrap();
        assert_eq!(resolved.scheme, Scheme::Https);
    }

    #[test]
    fn test_rfc7239_forwarded() {
        let h = RequestHeaders {
            host: Some("a.example.com"),
            forwarded_proto: None,
            forwarded: Some("for=192.0.2.60;proto=\"http\";by=203.0.113.43, proto=https"),
        };
        assert_eq!(resolver().resolve(&h).unwrap().scheme, Scheme::Http);
    }

    #[test]
    fn test_suffix_match_is_label_aware() {
        let r = resolver();
        assert!(r.is_tunnel_host("trusted-tunnel.example"));
        assert!(r.is_tunnel_host("FOO.Trusted-Tunnel.Example:443"));
        assert!(r.is_tunnel_host("abc.ngrok-free.app"));
        assert!(!r.is_tunnel_host("eviltrusted-tunnel.example"));
        assert!(!r.is_tunnel_host("trusted-tunnel.example.attacker.com"));
    }

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("example.com:8080"), "example.com");
        assert_eq!(strip_port("example.com"), "example.com");
        assert_eq!(strip_port("[::1]:3000"), "::1");
    }
}
