//! Core library for over-the-air app distribution.
//!
//! The pieces, leaves first:
//!
//! - [`registry`] enumerates installable artifacts in one flat store.
//! - [`host`] derives the externally visible base URL of a request.
//! - [`manifest`] builds the installation manifest for one artifact.
//! - [`store`] opens artifact bytes for streaming.
//! - [`trigger`] builds `itms-services` install URIs and keeps the
//!   per-view install log.
//!
//! Every operation is request-scoped; nothing here holds shared mutable state.

pub mod config;
pub mod error;
pub mod host;
pub mod listing;
pub mod manifest;
pub mod paths;
pub mod registry;
pub mod store;
pub mod trigger;

pub use config::{ManifestDefaults, OtaConfig};
pub use error::OtaError;
pub use host::{HostResolver, RequestHeaders};
pub use registry::ArtifactRegistry;
pub use store::ArtifactServer;
