//! Shared User-Agent string for WiGLE API traffic.

/// Default User-Agent for all API requests (identifies the tool and version).
#[must_use]
pub(crate) fn api_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("wigle-vault/{version}")
}
