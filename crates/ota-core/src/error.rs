//! Error taxonomy for OTA operations

use thiserror::Error;

/// Every failure the core components can report.
///
/// Each variant knows the HTTP status it surfaces as, so the server layer
/// never has to guess and never turns a caller mistake into a 500.
#[derive(Error, Debug)]
pub enum OtaError {
    /// Bad or missing caller input.
    #[error("Validation failed: {reason}")]
    Validation {
        /// Short machine-stable reason, e.g. "missing file"
        reason: String,
    },

    /// The request carries no `Host`, so the server cannot address itself.
    #[error("Request has no Host header")]
    MissingHost,

    /// The named artifact is not in the store.
    #[error("Artifact not found: {0}")]
    NotFound(String),

    /// The name tries to escape the store root.
    #[error("Invalid artifact name: {0:?}")]
    InvalidName(String),

    /// Configuration could not be read or parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Underlying filesystem failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OtaError {
    /// Shorthand for a validation failure.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// HTTP status this error surfaces as.
    ///
    /// `InvalidName` reports 404 so the download route does not reveal that
    /// a traversal check exists.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::NotFound(_) | Self::InvalidName(_) => 404,
            Self::MissingHost | Self::Config(_) | Self::Io(_) => 500,
        }
    }
}
