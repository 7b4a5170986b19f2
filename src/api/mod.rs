//! HTTP client for the WiGLE file API.
//!
//! Two endpoints are covered: the paginated upload-transaction listing
//! (JSON, short timeout) and per-transaction CSV downloads (streamed to
//! disk, long timeout).

mod client;
mod constants;
mod error;
mod types;

pub use client::WigleClient;
pub use constants::{
    CONNECT_TIMEOUT_SECS, DEFAULT_BASE_URL, DOWNLOAD_TIMEOUT_SECS, LISTING_TIMEOUT_SECS,
};
pub use error::ApiError;
pub use types::{Transaction, TransactionPage};
