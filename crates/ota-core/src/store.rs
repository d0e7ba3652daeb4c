//! Artifact server.
//!
//! Opens the bytes of one registered artifact for streaming. Names are
//! checked against the store root before any filesystem access.

use crate::error::OtaError;
use crate::registry::ArtifactRegistry;
use ota_schema::{Artifact, Platform};
use tokio::fs::File;

/// An artifact opened for reading.
#[derive(Debug)]
pub struct ArtifactFile {
    /// The artifact being served.
    pub artifact: Artifact,
    /// Size in bytes at open time.
    pub len: u64,
    /// Open handle positioned at the start of the file.
    pub file: File,
}

impl ArtifactFile {
    /// MIME type announced to the client.
    pub fn content_type(&self) -> &'static str {
        match self.artifact.platform {
            Platform::Android => "application/vnd.android.package-archive",
            Platform::Ios | Platform::Unknown => "application/octet-stream",
        }
    }
}

/// Serves raw artifact bytes out of one registry's store.
#[derive(Debug, Clone)]
pub struct ArtifactServer {
    registry: ArtifactRegistry,
}

impl ArtifactServer {
    /// Serve files from `registry`'s store.
    pub fn new(registry: ArtifactRegistry) -> Self {
        Self { registry }
    }

    /// Open `filename` for streaming.
    ///
    /// Artifacts are immutable once placed, so concurrent opens of the same
    /// file need no coordination.
    ///
    /// # Errors
    ///
    /// Returns [`OtaError::InvalidName`] for names that could escape the
    /// store, [`OtaError::NotFound`] if the artifact is absent or is not a
    /// listed artifact, and [`OtaError::Io`] for other read failures.
    pub async fn fetch(&self, filename: &str) -> Result<ArtifactFile, OtaError> {
        let path = self
            .registry
            .artifact_path(filename)
            .inspect_err(|_| {
                tracing::warn!(file = filename, "rejected artifact name");
            })?
            .ok_or_else(|| OtaError::NotFound(filename.to_string()))?;

        // Symlinks are never listed, so they are never served.
        match tokio::fs::symlink_metadata(&path).await {
            Ok(metadata) if metadata.file_type().is_file() => {}
            Ok(_) => return Err(OtaError::NotFound(filename.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(OtaError::NotFound(filename.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(OtaError::NotFound(filename.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(OtaError::NotFound(filename.to_string()));
        }

        Ok(ArtifactFile {
            artifact: Artifact::new(filename),
            len: metadata.len(),
            file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;

    fn server() -> (TempDir, ArtifactServer) {
        let root = TempDir::new().unwrap();
        let store = root.path().join("downloads");
        std::fs::create_dir(&store).unwrap();
        std::fs::write(store.join("a.ipa"), b"ipa-bytes").unwrap();
        std::fs::write(store.join("b.apk"), b"apk").unwrap();
        std::fs::write(store.join("manifest.plist"), b"<plist/>").unwrap();
        std::fs::write(root.path().join("secret.ipa"), b"outside").unwrap();
        (root, ArtifactServer::new(ArtifactRegistry::new(store)))
    }

    #[tokio::test]
    async fn test_fetch_serves_exact_bytes() {
        let (_root, server) = server();
        let mut opened = server.fetch("a.ipa").await.unwrap();
        assert_eq!(opened.len, 9);
        assert_eq!(opened.artifact.platform, Platform::Ios);
        assert_eq!(opened.content_type(), "application/octet-stream");

        let mut buf = Vec::new();
        opened.file.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"ipa-bytes");
    }

    #[tokio::test]
    async fn test_android_content_type() {
        let (_root, server) = server();
        let opened = server.fetch("b.apk").await.unwrap();
        assert_eq!(
            opened.content_type(),
            "application/vnd.android.package-archive"
        );
    }

    #[tokio::test]
    async fn test_missing_artifact() {
        let (_root, server) = server();
        let err = server.fetch("gone.ipa").await.unwrap_err();
        assert!(matches!(err, OtaError::NotFound(name) if name == "gone.ipa"));
    }

    #[tokio::test]
    async fn test_unlisted_entries_are_not_served() {
        let (_root, server) = server();
        assert!(matches!(
            server.fetch("manifest.plist").await,
            Err(OtaError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_traversal_is_rejected() {
        let (_root, server) = server();
        for name in [
            "../../etc/passwd",
            "a/../../b.ipa",
            "../secret.ipa",
            "%2e%2e%2fsecret.ipa",
        ] {
            let err = server.fetch(name).await.unwrap_err();
            assert!(matches!(err, OtaError::InvalidName(_)), "{name}");
        }
    }

    #[tokio::test]
    async fn test_every_listed_artifact_is_fetchable() {
        let (root, server) = server();
        let store = root.path().join("downloads");
        for name in ["Build: 2.ipa", "a\\b.apk", "v1%2F2.ipa"] {
            std::fs::write(store.join(name), b"x").unwrap();
        }

        let listed = server.registry.list();
        assert_eq!(listed.len(), 2);
        for artifact in &listed {
            assert!(server.fetch(&artifact.filename).await.is_ok(), "{}", artifact.filename);
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_is_not_served() {
        let (root, server) = server();
        let store = root.path().join("downloads");
        std::os::unix::fs::symlink("../secret.ipa", store.join("link.ipa")).unwrap();

        assert!(!server.registry.list().iter().any(|a| a.filename == "link.ipa"));
        assert!(matches!(
            server.fetch("link.ipa").await,
            Err(OtaError::NotFound(_))
        ));
    }
}
