//! Service configuration.
//!
//! Values are layered: built-in defaults, then an optional `ota.toml`,
//! then `OTA_*` environment variables. CLI flags are applied last by the
//! binary itself.

use crate::error::OtaError;
use crate::paths;
use ota_schema::{DEFAULT_BUNDLE_ID, DEFAULT_TITLE, DEFAULT_VERSION, ManifestRequest};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Tunnel-hosting domains that always terminate TLS at their edge.
pub const DEFAULT_TUNNEL_SUFFIXES: &[&str] =
    &["ngrok.io", "ngrok-free.app", "ngrok.app", "vercel.app"];

/// Address the server binds to when nothing else is configured.
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Top-level configuration for the OTA service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OtaConfig {
    /// Flat directory holding the installable artifacts.
    pub store_dir: PathBuf,
    /// Socket address for the HTTP server.
    pub bind: SocketAddr,
    /// Host suffixes for which the scheme is forced to `https`.
    pub tunnel_suffixes: Vec<String>,
    /// Fallback metadata for manifests.
    pub defaults: ManifestDefaults,
}

/// Fallback metadata applied when a manifest request omits a field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestDefaults {
    /// Bundle identifier; must match the one signed into the `.ipa`.
    pub bundle_id: String,
    /// Bundle version.
    pub version: String,
    /// Install prompt title.
    pub title: String,
}

impl Default for ManifestDefaults {
    fn default() -> Self {
        Self {
            bundle_id: DEFAULT_BUNDLE_ID.to_string(),
            version: DEFAULT_VERSION.to_string(),
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl ManifestDefaults {
    /// A manifest request for `filename` carrying these defaults.
    pub fn request_for(&self, filename: impl Into<String>) -> ManifestRequest {
        ManifestRequest::new(filename)
            .with_bundle_id(self.bundle_id.as_str())
            .with_version(self.version.as_str())
            .with_title(self.title.as_str())
    }
}

impl Default for OtaConfig {
    fn default() -> Self {
        Self {
            store_dir: paths::default_store_path(),
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            tunnel_suffixes: DEFAULT_TUNNEL_SUFFIXES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            defaults: ManifestDefaults::default(),
        }
    }
}

impl OtaConfig {
    /// Load configuration from `path`, or from `./ota.toml` if it exists,
    /// then apply `OTA_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`OtaError::Config`] if an explicitly named file is missing,
    /// any file is not valid TOML for this schema, or an environment
    /// override cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, OtaError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = paths::default_config_path();
                if default.is_file() {
                    Self::from_file(&default)?
                } else {
                    Self::default()
                }
            }
        };
        config.with_env(|key| std::env::var(key).ok())
    }

    /// Parse a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`OtaError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, OtaError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| OtaError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
            .map_err(|e| OtaError::Config(format!("{}: {e}", path.display())))
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`OtaError::Config`] on syntax errors or unknown keys.
    pub fn from_toml_str(content: &str) -> Result<Self, OtaError> {
        toml::from_str(content).map_err(|e| OtaError::Config(e.to_string()))
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`OtaError::Config`] if `OTA_BIND` is not a socket address.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, OtaError> {
        if let Some(dir) = lookup("OTA_STORE_DIR") {
            self.store_dir = PathBuf::from(dir);
        }
        if let Some(bind) = lookup("OTA_BIND") {
            self.bind = bind
                .parse()
                .map_err(|e| OtaError::Config(format!("OTA_BIND={bind}: {e}")))?;
        }
        if let Some(list) = lookup("OTA_TUNNEL_SUFFIXES") {
            self.tunnel_suffixes = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(bundle_id) = lookup("OTA_BUNDLE_ID") {
            self.defaults.bundle_id = bundle_id;
        }
        if let Some(version) = lookup("OTA_BUNDLE_VERSION") {
            self.defaults.version = version;
        }
        Ok(self)
    }
}
