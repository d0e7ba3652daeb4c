//! Artifact registry.
//!
//! Enumerates the installable files in the flat artifact store. Nothing is
//! cached: every call reads the directory again, so the listing always
//! reflects the store as it is at call time.

use crate::error::OtaError;
use ota_schema::{Artifact, Platform};
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem droppings that never count as artifacts.
const HOUSEKEEPING: &[&str] = &["Thumbs.db", "desktop.ini"];

/// Suffix of manifest documents left in the store by older deployments.
const MANIFEST_SUFFIX: &str = ".plist";

/// Read-only view over one artifact store directory.
#[derive(Debug, Clone)]
pub struct ArtifactRegistry {
    root: PathBuf,
}

impl ArtifactRegistry {
    /// Create a registry over `root`. The directory need not exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Enumerate artifacts, degrading to an empty listing on read failure.
    ///
    /// A missing store is a valid empty state. Any other read error is
    /// logged and yields an empty listing so callers can still render.
    pub fn list(&self) -> Vec<Artifact> {
        match self.try_list() {
            Ok(artifacts) => artifacts,
            Err(e) => {
                tracing::warn!(
                    store = %self.root.display(),
                    error = %e,
                    "failed to read artifact store"
                );
                Vec::new()
            }
        }
    }

    /// Enumerate artifacts in directory discovery order.
    ///
    /// Only regular files (not symlinks) whose names pass
    /// [`validate_name`] are listed, so every listed artifact is servable.
    /// Unreadable entries are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`OtaError::Io`] if the store exists but cannot be read.
    pub fn try_list(&self) -> Result<Vec<Artifact>, OtaError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(entries.filter_map(|entry| self.artifact_from_entry(entry)).collect())
    }

    /// Classify one directory entry, skipping anything unreadable or unlisted.
    fn artifact_from_entry(&self, entry: std::io::Result<fs::DirEntry>) -> Option<Artifact> {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(
                    store = %self.root.display(),
                    error = %e,
                    "skipping unreadable entry"
                );
                return None;
            }
        };
        match entry.file_type() {
            Ok(file_type) if file_type.is_file() => {}
            Ok(_) => return None,
            Err(e) => {
                tracing::warn!(
                    path = %entry.path().display(),
                    error = %e,
                    "skipping entry"
                );
                return None;
            }
        }
        let Ok(name) = entry.file_name().into_string() else {
            tracing::debug!(path = %entry.path().display(), "skipping non-UTF-8 filename");
            return None;
        };
        if !is_listable(&name) {
            return None;
        }
        if validate_name(&name).is_err() {
            tracing::debug!(file = %name, "skipping filename that cannot be addressed by URL");
            return None;
        }
        Some(Artifact::new(name))
    }

    /// Whether `filename` names an artifact currently in the store.
    ///
    /// Agrees with [`Self::try_list`]: symlinks and unlisted names are not
    /// registered.
    ///
    /// # Errors
    ///
    /// Returns [`OtaError::InvalidName`] if the name could address anything
    /// outside the store root.
    pub fn contains(&self, filename: &str) -> Result<bool, OtaError> {
        let Some(path) = self.artifact_path(filename)? else {
            return Ok(false);
        };
        match fs::symlink_metadata(path) {
            Ok(metadata) => Ok(metadata.file_type().is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Path of `filename` inside the store, or `None` for names that are
    /// never listed. Does not touch the filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`OtaError::InvalidName`] for names rejected by
    /// [`validate_name`].
    pub fn artifact_path(&self, filename: &str) -> Result<Option<PathBuf>, OtaError> {
        let name = validate_name(filename)?;
        if !is_listable(name) {
            return Ok(None);
        }
        Ok(Some(self.root.join(name)))
    }
}

/// Classify a filename. Pure and suffix based.
pub fn classify(filename: &str) -> Platform {
    Platform::from_filename(filename)
}

/// Whether a store entry name belongs in listings.
pub fn is_listable(name: &str) -> bool {
    !(name.starts_with('.') || name.ends_with(MANIFEST_SUFFIX) || HOUSEKEEPING.contains(&name))
}

/// Check that `name` is a single plain path segment.
///
/// Rejects empty names, `.`/`..`, separators, NUL bytes, drive prefixes,
/// and names that still decode to any of those after percent-decoding.
///
/// # Errors
///
/// Returns [`OtaError::InvalidName`] for any rejected name.
pub fn validate_name(name: &str) -> Result<&str, OtaError> {
    if !is_plain_segment(name) {
        return Err(OtaError::InvalidName(name.to_string()));
    }
    if name.contains('%') {
        let decoded =
            urlencoding::decode(name).map_err(|_| OtaError::InvalidName(name.to_string()))?;
        if !is_plain_segment(&decoded) {
            return Err(OtaError::InvalidName(name.to_string()));
        }
    }
    Ok(name)
}

fn is_plain_segment(name: &str) -> bool {
    !(name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0'])
        || name.contains(':'))
}
