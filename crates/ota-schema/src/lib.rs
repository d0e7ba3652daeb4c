//! Shared types for the OTA distribution service.
//!
//! These are plain data: artifacts found in the store, the caller-supplied
//! manifest request, and the resolved address of the server. Behaviour
//! lives in `ota-core`.

pub mod platform;
pub mod types;

// Re-exports
pub use platform::*;
pub use types::*;

/// Route prefix under which artifact bytes are served.
pub const DOWNLOADS_PREFIX: &str = "/downloads";

/// Route of the manifest endpoint.
pub const MANIFEST_ROUTE: &str = "/api/manifest";
