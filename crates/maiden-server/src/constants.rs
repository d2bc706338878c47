//! Server configuration constants.
//!
//! Centralizes hardcoded values for easier configuration and documentation.

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default bind address (all interfaces; the device is reached over the LAN).
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Name reported by the API info endpoint.
pub const API_NAME: &str = "maiden";

/// Version reported by the API info endpoint and at startup.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Root of the versioned API.
pub const API_ROOT: &str = "/api/v1";

/// Prefix of the dust resource tree.
pub const DUST_PREFIX: &str = "/api/v1/dust";

/// Where the web application is served from.
pub const APP_ROUTE: &str = "/maiden";

/// Where the documentation is served from.
pub const DOC_ROUTE: &str = "/doc";

/// Largest request body accepted by the dust routes.
pub const MAX_UPLOAD_BYTES: usize = 256 * 1024 * 1024;

/// Multipart field holding an uploaded file.
pub const UPLOAD_FIELD: &str = "value";

/// Form field holding the new base name for a rename.
pub const RENAME_FIELD: &str = "name";
