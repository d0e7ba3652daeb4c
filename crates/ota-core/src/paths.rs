//! Default filesystem locations.

use std::path::PathBuf;

/// Store location relative to the working directory when nothing else is configured.
pub const DEFAULT_STORE_DIR: &str = "public/downloads";

/// Config file picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "ota.toml";

/// Artifact store path: ./public/downloads
pub fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_DIR)
}

/// Config file path: ./ota.toml
pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}
