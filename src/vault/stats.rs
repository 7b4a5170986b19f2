//! Counters aggregated over one backup run.

/// Statistics from a single backup run.
///
/// Created at run start, mutated once per transaction processed, and
/// returned by value when the run finishes. The run loop is strictly
/// sequential, so plain integers suffice; no shared-state discipline is
/// needed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VaultStats {
    found: u64,
    downloaded: u64,
    skipped: u64,
    failed: u64,
    total_bytes: u64,
}

impl VaultStats {
    /// Creates a new stats value with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of transactions seen with a usable identifier.
    #[must_use]
    pub fn found(&self) -> u64 {
        self.found
    }

    /// Returns the number of files downloaded this run.
    #[must_use]
    pub fn downloaded(&self) -> u64 {
        self.downloaded
    }

    /// Returns the number of files skipped because they already existed.
    #[must_use]
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Returns the number of files whose download failed.
    #[must_use]
    pub fn failed(&self) -> u64 {
        self.failed
    }

    /// Returns the byte total across downloaded and skipped files.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Records a transaction with a usable identifier.
    pub(crate) fn record_found(&mut self) {
        self.found += 1;
    }

    /// Records a completed download of `bytes` bytes.
    pub(crate) fn record_downloaded(&mut self, bytes: u64) {
        self.downloaded += 1;
        self.total_bytes += bytes;
    }

    /// Records a skipped file whose existing size is `bytes` bytes.
    pub(crate) fn record_skipped(&mut self, bytes: u64) {
        self.skipped += 1;
        self.total_bytes += bytes;
    }

    /// Records a failed download.
    pub(crate) fn record_failed(&mut self) {
        self.failed += 1;
    }
}
