//! Constants for the WiGLE API client (endpoints, timeouts).

/// Default WiGLE API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.wigle.net";

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Request timeout for transaction listing calls (30 seconds).
pub const LISTING_TIMEOUT_SECS: u64 = 30;

/// Request timeout for CSV downloads (10 minutes).
///
/// Export sizes are unbounded and unknown in advance; cross-country
/// wardriving logs reach hundreds of megabytes.
pub const DOWNLOAD_TIMEOUT_SECS: u64 = 600;
