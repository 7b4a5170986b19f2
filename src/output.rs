//! Console output for the backup run: summary report and exit-code logic.

use std::path::Path;

use indicatif::HumanBytes;
use wigle_vault::VaultStats;

/// Process exit outcome of a completed backup run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessExit {
    /// Everything requested was downloaded or skipped.
    Success,
    /// The run completed but some downloads failed (strict mode only).
    Partial,
}

impl ProcessExit {
    /// Returns the process exit code for this outcome.
    pub fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Partial => 3,
        }
    }
}

/// Maps the run's failure count to a process exit outcome.
///
/// Per-file failures only affect the exit code in strict mode; the default
/// matches the remedy for a failed file, which is simply re-running.
pub fn determine_exit_outcome(failed: u64, strict: bool) -> ProcessExit {
    if strict && failed > 0 {
        ProcessExit::Partial
    } else {
        ProcessExit::Success
    }
}

/// Prints the end-of-run summary report to stdout.
pub fn print_summary(stats: &VaultStats, output_dir: &Path) {
    println!("Backup complete");
    println!("  uploads found:      {}", stats.found());
    println!("  downloaded:         {}", stats.downloaded());
    println!("  skipped (existing): {}", stats.skipped());
    if stats.failed() > 0 {
        println!("  failed:             {}", stats.failed());
    }
    println!(
        "  total data:         {} ({} bytes)",
        HumanBytes(stats.total_bytes()),
        stats.total_bytes()
    );
    println!("  saved to:           {}", output_dir.display());
}
