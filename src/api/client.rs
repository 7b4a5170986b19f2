//! HTTP client for the WiGLE file API.
//!
//! One [`WigleClient`] serves both endpoints this tool needs: the paginated
//! transaction listing (JSON) and per-transaction CSV downloads (streamed
//! to disk). The two calls carry divergent timeout and content-negotiation
//! policy; see [`constants`](super::constants).

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use reqwest::{Client, StatusCode};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};

use super::constants::{
    CONNECT_TIMEOUT_SECS, DEFAULT_BASE_URL, DOWNLOAD_TIMEOUT_SECS, LISTING_TIMEOUT_SECS,
};
use super::error::ApiError;
use super::types::{Transaction, TransactionPage};
use crate::user_agent;

/// Accept header for CSV downloads (raw file content, not structured data).
const CSV_ACCEPT: &str = "text/csv, text/plain, */*";

/// Authenticated client for the WiGLE file API.
///
/// Designed to be created once per run and reused for every request, taking
/// advantage of connection pooling. The credential is the "Encoded for use"
/// token from the WiGLE account page, sent as `Authorization: Basic <token>`
/// on every call.
#[derive(Debug, Clone)]
pub struct WigleClient {
    client: Client,
    base_url: String,
    auth: HeaderValue,
}

impl WigleClient {
    /// Creates a client against the production WiGLE API.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidToken`] if the token contains characters
    /// that cannot appear in an HTTP header.
    pub fn new(token: &str) -> Result<Self, ApiError> {
        Self::build(token, DEFAULT_BASE_URL.to_string())
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidToken`] if the token contains characters
    /// that cannot appear in an HTTP header.
    pub fn with_base_url(token: &str, base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::build(token, base_url.into())
    }

    #[allow(clippy::expect_used)]
    fn build(token: &str, base_url: String) -> Result<Self, ApiError> {
        let mut auth = HeaderValue::from_str(&format!("Basic {token}"))
            .map_err(|_| ApiError::InvalidToken)?;
        auth.set_sensitive(true);

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .gzip(true)
            .user_agent(user_agent::api_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");

        Ok(Self {
            client,
            base_url,
            auth,
        })
    }

    /// Fetches one page of the upload-transaction listing.
    ///
    /// Pages are addressed by zero-based index; the server sees the
    /// half-open offset window `[page * page_size, (page + 1) * page_size)`
    /// as the `pagestart`/`pageend` query parameters.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on any transport failure, timeout, non-2xx status
    /// or malformed response body. 401/403 surface as
    /// [`ApiError::AuthRequired`] so callers can give token guidance.
    #[instrument(skip(self))]
    pub async fn list_transactions(
        &self,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<Transaction>, ApiError> {
        let url = format!("{}/api/v2/file/transactions", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("pagestart", page * page_size),
                ("pageend", (page + 1) * page_size),
            ])
            .header(AUTHORIZATION, self.auth.clone())
            .header(ACCEPT, "application/json")
            .timeout(Duration::from_secs(LISTING_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|e| classify_send_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(&url, status));
        }

        let body: TransactionPage = response.json().await.map_err(|e| ApiError::decode(&url, e))?;

        debug!(page, results = body.results.len(), "listing page fetched");
        Ok(body.results)
    }

    /// Downloads one transaction's CSV export, streaming the body to `dest`.
    ///
    /// The body is consumed chunk by chunk through a buffered writer rather
    /// than buffered wholesale, bounding peak memory for large exports.
    /// Returns the number of bytes written. When streaming or writing fails
    /// after the file was created, the partial file is removed so a later
    /// run does not mistake it for a complete backup.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on any transport failure, timeout, non-2xx status
    /// or filesystem error.
    #[instrument(skip(self, dest), fields(dest = %dest.display()))]
    pub async fn download_csv(&self, transid: &str, dest: &Path) -> Result<u64, ApiError> {
        let url = format!("{}/api/v2/file/csv/{transid}", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, self.auth.clone())
            .header(ACCEPT, CSV_ACCEPT)
            .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|e| classify_send_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(&url, status));
        }

        let file = File::create(dest)
            .await
            .map_err(|e| ApiError::io(dest, e))?;

        let result = stream_to_file(file, response, &url, dest).await;
        if result.is_err() {
            debug!(path = %dest.display(), "cleaning up partial file after error");
            let _ = tokio::fs::remove_file(dest).await;
        }
        result
    }
}

/// Streams the response body to `file`, returning bytes written.
///
/// Extracted so the caller can clean up the partial file on error.
async fn stream_to_file(
    file: File,
    response: reqwest::Response,
    url: &str,
    dest: &Path,
) -> Result<u64, ApiError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| classify_send_error(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| ApiError::io(dest, e))?;

        bytes_written += chunk.len() as u64;
    }

    // Ensure all data is flushed to disk
    writer.flush().await.map_err(|e| ApiError::io(dest, e))?;

    Ok(bytes_written)
}

fn classify_send_error(url: &str, error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::timeout(url)
    } else {
        ApiError::network(url, error)
    }
}

fn status_error(url: &str, status: StatusCode) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::auth_required(status.as_u16()),
        _ => ApiError::http_status(url, status.as_u16()),
    }
}
