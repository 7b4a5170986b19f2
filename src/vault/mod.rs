//! The backup run loop and its statistics.

mod engine;
mod stats;

pub use engine::{DEFAULT_PAGE_SIZE, DEFAULT_THROTTLE, VaultConfig, run_backup};
pub use stats::VaultStats;
