//! Artifact, manifest request and resolved host types.

use crate::Platform;
use serde::{Deserialize, Serialize};

/// Bundle identifier used when the caller does not supply one.
pub const DEFAULT_BUNDLE_ID: &str = "com.domesticrpro.provider";

/// Bundle version used when the caller does not supply one.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Installer title used when the caller does not supply one.
pub const DEFAULT_TITLE: &str = "App Download";

/// An installable file discovered in the artifact store.
///
/// Identity is the filename; the platform is derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Artifact {
    /// Bare filename within the flat store (e.g., "Provider.ipa")
    pub filename: String,

    /// Platform derived from the filename suffix
    pub platform: Platform,
}

impl Artifact {
    /// Build an artifact, classifying it from its filename.
    pub fn new(filename: impl Into<String>) -> Self {
        let filename = filename.into();
        let platform = Platform::from_filename(&filename);
        Self { filename, platform }
    }
}

/// Caller-supplied inputs for one manifest document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestRequest {
    /// Artifact filename; required and non-empty at generation time.
    pub filename: String,
    /// Bundle identifier presented to the installer.
    pub bundle_id: String,
    /// Bundle version presented to the installer.
    pub version: String,
    /// Title shown in the install prompt.
    pub title: String,
}

impl ManifestRequest {
    /// A request for `filename` with every metadata field at its default.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            bundle_id: DEFAULT_BUNDLE_ID.to_string(),
            version: DEFAULT_VERSION.to_string(),
            title: DEFAULT_TITLE.to_string(),
        }
    }

    /// Override the bundle identifier; an empty value keeps the current one.
    pub fn with_bundle_id(mut self, bundle_id: impl Into<String>) -> Self {
        set_non_empty(&mut self.bundle_id, bundle_id.into());
        self
    }

    /// Override the bundle version; an empty value keeps the current one.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        set_non_empty(&mut self.version, version.into());
        self
    }

    /// Override the title; an empty value keeps the current one.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        set_non_empty(&mut self.title, title.into());
        self
    }
}

fn set_non_empty(slot: &mut String, value: String) {
    if !value.is_empty() {
        *slot = value;
    }
}

/// URL scheme a client should use to reach this server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Plain HTTP; only produced when a proxy explicitly says so.
    Http,
    /// HTTPS, the default-secure fallback.
    #[default]
    Https,
}

impl Scheme {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Scheme {
    type Err = HostParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            other => Err(HostParseError::UnsupportedScheme(other.to_string())),
        }
    }
}

/// Errors from turning a textual base URL into a [`ResolvedHost`].
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum HostParseError {
    /// The scheme is neither `http` nor `https`.
    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),

    /// The URL has no `://` separator.
    #[error("Missing scheme in base URL: {0}")]
    MissingScheme(String),

    /// The authority part is empty or carries a path, query or fragment.
    #[error("Invalid host in base URL: {0}")]
    InvalidHost(String),
}

/// The externally visible address of the server for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedHost {
    /// Scheme clients should use
    pub scheme: Scheme,
    /// Host (and optional port) exactly as addressed by the client
    pub host: String,
    /// `scheme://host`, without a trailing slash
    pub base_url: String,
}

impl ResolvedHost {
    /// Combine a scheme and host into a resolved address.
    pub fn new(scheme: Scheme, host: impl Into<String>) -> Self {
        let host = host.into();
        let base_url = format!("{scheme}://{host}");
        Self {
            scheme,
            host,
            base_url,
        }
    }

    /// Parse an operator-supplied base URL such as `https://example.ngrok.app`.
    ///
    /// A single trailing slash is tolerated; any other path is rejected
    /// since artifact URLs are always rooted at the host.
    ///
    /// # Errors
    ///
    /// Returns [`HostParseError`] if the scheme is missing or unsupported,
    /// or the authority is empty or followed by a path.
    pub fn parse(base_url: &str) -> Result<Self, HostParseError> {
        let (scheme, rest) = base_url
            .split_once("://")
            .ok_or_else(|| HostParseError::MissingScheme(base_url.to_string()))?;
        let scheme: Scheme = scheme.parse()?;
        let host = rest.strip_suffix('/').unwrap_or(rest);
        if host.is_empty() || host.contains(['/', '?', '#', ' ']) {
            return Err(HostParseError::InvalidHost(base_url.to_string()));
        }
        Ok(Self::new(scheme, host))
    }
}
