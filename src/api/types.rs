//! Response types for the WiGLE file API.

use serde::Deserialize;

/// One page of the upload-transaction listing.
#[derive(Debug, Deserialize)]
pub struct TransactionPage {
    /// Transactions on this page. An absent or empty array means the
    /// listing is exhausted.
    #[serde(default)]
    pub results: Vec<Transaction>,
}

/// One upload-transaction record from the listing.
///
/// The listing carries more fields (file name, observation counts, wait
/// queue position) than this tool consumes; only the identifier matters
/// here, since it doubles as the remote download key and the local
/// filename stem.
#[derive(Debug, Clone, Deserialize)]
pub struct Transaction {
    /// Opaque transaction identifier.
    #[serde(default)]
    pub transid: Option<String>,
}

impl Transaction {
    /// Returns the transaction id if present and non-empty.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.transid.as_deref().filter(|id| !id.is_empty())
    }
}
