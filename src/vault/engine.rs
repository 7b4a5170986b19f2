//! The backup run loop: pagination, per-file skip decisions, aggregation.
//!
//! This is the control center of the tool. The loop walks the transaction
//! listing one page at a time and drains every page into the per-file
//! fetch path before requesting the next. Listing failures abort the run;
//! per-file failures are counted and the run continues.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::api::{ApiError, WigleClient};

use super::stats::VaultStats;

/// Default number of transactions requested per listing page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Default pause after each successful download (politeness toward the API).
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(500);

/// Tuning knobs for a backup run.
///
/// The defaults match production use; tests shrink the page size and zero
/// the throttle.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Transactions requested per listing page.
    pub page_size: usize,
    /// Fixed pause applied after each successful download.
    pub throttle: Duration,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            throttle: DEFAULT_THROTTLE,
        }
    }
}

/// Runs a full backup: walks every listing page and downloads each
/// transaction's CSV export into `output_dir`.
///
/// Files already present are left untouched and counted as skipped, which
/// makes re-running safe: an interrupted run resumes at the first missing
/// file. Transactions without a usable identifier are ignored entirely.
///
/// Termination: an empty page ends the walk, and so does a short page
/// (fewer results than `config.page_size`) without issuing another
/// request. When the listing size lands exactly on a page boundary, the
/// loop issues one further request and observes the empty page.
///
/// # Errors
///
/// Returns an error only for listing-level failures (fetch or parse of a
/// page, including an [`ApiError::AuthRequired`] token rejection).
/// Individual download failures are counted in the returned stats and
/// never abort the run.
#[instrument(skip(client, config), fields(output_dir = %output_dir.display()))]
pub async fn run_backup(
    client: &WigleClient,
    output_dir: &Path,
    config: &VaultConfig,
) -> Result<VaultStats, ApiError> {
    let mut stats = VaultStats::new();
    let mut page = 0usize;

    loop {
        info!(page = page + 1, "fetching transaction page");
        let transactions = client.list_transactions(page, config.page_size).await?;

        if transactions.is_empty() {
            debug!(page = page + 1, "empty page, listing exhausted");
            break;
        }

        debug!(count = transactions.len(), "processing page");
        for transaction in &transactions {
            let Some(id) = transaction.id() else {
                continue; // unusable record, not counted as attempted
            };
            stats.record_found();
            process_transaction(client, id, output_dir, config, &mut stats).await;
        }

        // A short page is the final page; a full page may be, so one more
        // request is needed to observe the empty page after an exact
        // boundary.
        if transactions.len() < config.page_size {
            debug!(results = transactions.len(), "short page, listing exhausted");
            break;
        }
        page += 1;
    }

    info!(
        found = stats.found(),
        downloaded = stats.downloaded(),
        skipped = stats.skipped(),
        failed = stats.failed(),
        total_bytes = stats.total_bytes(),
        "backup run complete"
    );

    Ok(stats)
}

/// Fetches one transaction's export unless it is already on disk.
async fn process_transaction(
    client: &WigleClient,
    id: &str,
    output_dir: &Path,
    config: &VaultConfig,
    stats: &mut VaultStats,
) {
    let dest = output_dir.join(format!("{id}.csv"));

    // Existence is the skip signal; this is what makes re-runs idempotent.
    if let Ok(meta) = tokio::fs::metadata(&dest).await {
        debug!(file = %dest.display(), bytes = meta.len(), "already present, skipping");
        stats.record_skipped(meta.len());
        return;
    }

    match client.download_csv(id, &dest).await {
        Ok(bytes) => {
            info!(file = %dest.display(), bytes, "downloaded");
            stats.record_downloaded(bytes);
            if !config.throttle.is_zero() {
                tokio::time::sleep(config.throttle).await;
            }
        }
        Err(error) => {
            warn!(transid = id, error = %error, "download failed, continuing");
            stats.record_failed();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = VaultConfig::default();
        assert_eq!(config.page_size, 100);
        assert_eq!(config.throttle, Duration::from_millis(500));
    }

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_PAGE_SIZE, 100);
        assert_eq!(DEFAULT_THROTTLE, Duration::from_millis(500));
    }
}
