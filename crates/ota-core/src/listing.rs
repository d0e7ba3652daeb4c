//! Listing view model: what each artifact offers a visitor.

use crate::config::ManifestDefaults;
use crate::manifest::manifest_url;
use crate::trigger::{ClientCapabilities, build_install_uri};
use ota_schema::{Artifact, DOWNLOADS_PREFIX, Platform};

/// How a listed artifact can be installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallAction {
    /// iOS: fetch the manifest through the OS installer.
    Manifest {
        /// Manifest endpoint URL (absolute when the origin is known)
        manifest_url: String,
        /// `itms-services` URI, present only when the context can trigger it
        install_uri: Option<String>,
    },
    /// Android: download the package directly.
    Download {
        /// Artifact URL under the downloads prefix
        url: String,
    },
    /// Listed for visibility only.
    NotInstallable,
}

/// One row of the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// The artifact.
    pub artifact: Artifact,
    /// What the visitor can do with it.
    pub action: InstallAction,
}

/// Pair every artifact with its install action.
pub fn build_listing(
    artifacts: Vec<Artifact>,
    caps: &ClientCapabilities,
    defaults: &ManifestDefaults,
) -> Vec<ListingEntry> {
    let origin = caps.origin.as_deref();
    artifacts
        .into_iter()
        .map(|artifact| {
            let action = match artifact.platform {
                Platform::Ios => {
                    // The bundle id must match the one signed into the .ipa.
                    let req = defaults
                        .request_for(artifact.filename.as_str())
                        .with_title(artifact.filename.as_str());
                    let install_uri = caps
                        .install_origin()
                        .map(|o| build_install_uri(&manifest_url(Some(o), &req)));
                    InstallAction::Manifest {
                        manifest_url: manifest_url(origin, &req),
                        install_uri,
                    }
                }
                Platform::Android => InstallAction::Download {
                    url: format!(
                        "{}{DOWNLOADS_PREFIX}/{}",
                        origin.unwrap_or_default(),
                        urlencoding::encode(&artifact.filename)
                    ),
                },
                Platform::Unknown => InstallAction::NotInstallable,
            };
            ListingEntry { artifact, action }
        })
        .collect()
}
