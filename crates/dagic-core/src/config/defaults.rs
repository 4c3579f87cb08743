//! Default values for dagic configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Config File Locations
// ============================================================================

/// Project-local config file name.
pub const LOCAL_CONFIG_FILE: &str = "dagic.toml";

/// Directory under the user config dir holding `config.toml`.
pub const USER_CONFIG_DIR: &str = "dagic";

/// User config file name.
pub const USER_CONFIG_FILE: &str = "config.toml";

// ============================================================================
// Graph Defaults
// ============================================================================

/// Default graph format when the file extension is not recognized.
pub const DEFAULT_GRAPH_FORMAT: &str = "json";

// ============================================================================
// Matrix Defaults
// ============================================================================

/// Zero-similarity pairs are dropped from the similarity table by default.
pub const DEFAULT_INCLUDE_ZERO: bool = false;

// ============================================================================
// Fetch Defaults
// ============================================================================

/// HTTP request timeout in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 60;

/// User agent sent with fetch requests.
pub const DEFAULT_USER_AGENT: &str = concat!("dagic/", env!("CARGO_PKG_VERSION"));

/// Retries after an HTTP 429 response.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Delay before retrying after an HTTP 429 response, in milliseconds.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 5_000;

// ============================================================================
// Log Defaults
// ============================================================================

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";
