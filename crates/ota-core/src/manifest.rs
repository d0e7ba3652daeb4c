//! Installation manifest generation.
//!
//! A manifest is an Apple property list that tells the iOS installer where
//! the `.ipa` lives and what identity to show while installing it. The
//! document is a pure function of the resolved host and the request: no
//! timestamps, no randomness, byte-identical for identical inputs.

use crate::error::OtaError;
use ota_schema::{DOWNLOADS_PREFIX, MANIFEST_ROUTE, ManifestRequest, ResolvedHost};
use quick_xml::escape::escape;

/// The only content type installers accept for a manifest.
pub const CONTENT_TYPE: &str = "application/x-plist";

/// A generated manifest document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    asset_url: String,
    document: String,
}

impl Manifest {
    /// URL of the artifact embedded in the document (unescaped).
    pub fn asset_url(&self) -> &str {
        &self.asset_url
    }

    /// The property list text.
    pub fn as_str(&self) -> &str {
        &self.document
    }

    /// Consume into the property list text.
    pub fn into_string(self) -> String {
        self.document
    }
}

/// Where the artifact server exposes `filename` under `host`.
pub fn asset_url(host: &ResolvedHost, filename: &str) -> String {
    format!(
        "{}{DOWNLOADS_PREFIX}/{}",
        host.base_url,
        urlencoding::encode(filename)
    )
}

/// Manifest endpoint URL for `req`, absolute when `base` is known.
///
/// Every query value is percent-encoded so filenames with `&`, `#` or
/// spaces survive the round trip.
pub fn manifest_url(base: Option<&str>, req: &ManifestRequest) -> String {
    format!(
        "{}{MANIFEST_ROUTE}?file={}&title={}&bundleId={}&version={}",
        base.unwrap_or_default(),
        urlencoding::encode(&req.filename),
        urlencoding::encode(&req.title),
        urlencoding::encode(&req.bundle_id),
        urlencoding::encode(&req.version),
    )
}

/// Build the manifest for `req` served from `host`.
///
/// # Errors
///
/// Returns [`OtaError::Validation`] with reason "missing file" if the
/// request has an empty filename.
pub fn generate(req: &ManifestRequest, host: &ResolvedHost) -> Result<Manifest, OtaError> {
    if req.filename.is_empty() {
        return Err(OtaError::validation("missing file"));
    }

    let asset_url = asset_url(host, &req.filename);
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>items</key>
	<array>
		<dict>
			<key>assets</key>
			<array>
				<dict>
					<key>kind</key>
					<string>software-package</string>
					<key>url</key>
					<string>{url}</string>
				</dict>
			</array>
			<key>metadata</key>
			<dict>
				<key>bundle-identifier</key>
				<string>{bundle_id}</string>
				<key>bundle-version</key>
				<string>{version}</string>
				<key>kind</key>
				<string>software</string>
				<key>title</key>
				<string>{title}</string>
			</dict>
		</dict>
	</array>
</dict>
</plist>
"#,
        url = escape(asset_url.as_str()),
        bundle_id = escape(req.bundle_id.as_str()),
        version = escape(req.version.as_str()),
        title = escape(req.title.as_str()),
    );

    Ok(Manifest {
        asset_url,
        document,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ota_schema::Scheme;

    fn filename_from_url(url: &str) -> &str {
        url.rsplit('/').next().unwrap_or("")
    }

    fn host() -> ResolvedHost {
        ResolvedHost::new(Scheme::Https, "foo.trusted-tunnel.example")
    }

    #[test]
    fn test_generation_is_deterministic() {
        let req = ManifestRequest::new("a.ipa").with_title("Provider");
        let first = generate(&req, &host()).unwrap();
        let second = generate(&req, &host()).unwrap();
        assert_eq!(first.as_str().as_bytes(), second.as_str().as_bytes());
    }

    #[test]
    fn test_empty_filename_is_rejected() {
        let err = generate(&ManifestRequest::new(""), &host()).unwrap_err();
        match err {
            OtaError::Validation { reason } => assert_eq!(reason, "missing file"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_asset_url_round_trips_filename() {
        for name in ["My App v2.ipa", "a&b#c.ipa", "ünïcode.ipa", "plain.ipa"] {
            let manifest = generate(&ManifestRequest::new(name), &host()).unwrap();
            let prefix = format!("{}{DOWNLOADS_PREFIX}/", host().base_url);
            let encoded = manifest.asset_url().strip_prefix(&prefix).unwrap();
            assert_eq!(encoded, filename_from_url(manifest.asset_url()));
            assert_eq!(urlencoding::decode(encoded).unwrap(), name);
        }
    }

    #[test]
    fn test_spaces_are_percent_encoded() {
        let manifest = generate(&ManifestRequest::new("My App v2.ipa"), &host()).unwrap();
        assert!(manifest.asset_url().ends_with("/downloads/My%20App%20v2.ipa"));
        assert!(
            manifest
                .as_str()
                .contains("<string>https://foo.trusted-tunnel.example/downloads/My%20App%20v2.ipa</string>")
        );
    }

    #[test]
    fn test_metadata_is_escaped() {
        let req = ManifestRequest::new("a.ipa")
            .with_title("</string><key>x</key> & more")
            .with_bundle_id("com.example.<evil>");
        let doc = generate(&req, &host()).unwrap().into_string();
        assert!(
            doc.contains("<string>&lt;/string&gt;&lt;key&gt;x&lt;/key&gt; &amp; more</string>")
        );
        assert!(doc.contains("<string>com.example.&lt;evil&gt;</string>"));
        assert!(!doc.contains("<key>x</key>"));
    }

    #[test]
    fn test_field_order() {
        let doc = generate(&ManifestRequest::new("a.ipa"), &host())
            .unwrap()
            .into_string();
        let order = [
            "<key>items</key>",
            "<key>assets</key>",
            "<string>software-package</string>",
            "<key>url</key>",
            "<key>metadata</key>",
            "<key>bundle-identifier</key>",
            "<key>bundle-version</key>",
            "<string>software</string>",
            "<key>title</key>",
        ];
        let positions: Vec<usize> = order.iter().map(|k| doc.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_defaults_are_embedded() {
        let doc = generate(&ManifestRequest::new("a.ipa"), &host())
            .unwrap()
            .into_string();
        assert!(doc.contains("<string>com.domesticrpro.provider</string>"));
        assert!(doc.contains("<string>1.0.0</string>"));
        assert!(doc.contains("<string>App Download</string>"));
    }

    #[test]
    fn test_manifest_url_encodes_every_value() {
        let req = ManifestRequest::new("a&b.ipa").with_title("A B");
        let url = manifest_url(Some("https://h.example"), &req);
        assert_eq!(
            url,
            "https://h.example/api/manifest?file=a%26b.ipa&title=A%20B&bundleId=com.domesticrpro.provider&version=1.0.0"
        );
        assert!(manifest_url(None, &req).starts_with("/api/manifest?"));
    }
}
