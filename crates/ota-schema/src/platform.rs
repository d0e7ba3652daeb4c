//! Platform classification of artifacts.

/// Target platform of an installable artifact.
///
/// Classification is derived from the filename suffix and is never
/// persisted. Anything that is not a conventional `.ipa` or `.apk`
/// package is [`Platform::Unknown`]: still listed so operators can see
/// stray files, but not installable over the air.
///
/// # Example
///
/// ```
/// use ota_schema::Platform;
///
/// assert_eq!(Platform::from_filename("Provider.ipa"), Platform::Ios);
/// assert_eq!(Platform::from_filename("provider.apk"), Platform::Android);
/// assert_eq!(Platform::from_filename("notes.txt"), Platform::Unknown);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, Default,
)]
pub enum Platform {
    /// iOS application archive (`.ipa`), installed via the manifest flow.
    #[serde(rename = "iOS")]
    Ios,
    /// Android package (`.apk`), installed by direct download.
    Android,
    /// Any other file.
    #[default]
    Unknown,
}

impl Platform {
    /// Classify a filename by its suffix.
    ///
    /// Matching is case-sensitive on the conventional lower-case extensions.
    pub fn from_filename(filename: &str) -> Self {
        if filename.ends_with(".ipa") {
            Self::Ios
        } else if filename.ends_with(".apk") {
            Self::Android
        } else {
            Self::Unknown
        }
    }

    /// Human-readable label used in listings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ios => "iOS",
            Self::Android => "Android",
            Self::Unknown => "Unknown",
        }
    }

    /// Whether either OTA path can install this platform.
    pub fn is_installable(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
