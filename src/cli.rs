//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Back up your WiGLE wardriving uploads as CSV files.
///
/// Walks the authenticated upload-transaction listing and downloads every
/// CSV export that is not already present in the output directory, so
/// re-running only fetches what is missing.
#[derive(Parser, Debug)]
#[command(name = "wigle-vault")]
#[command(author, version, about)]
pub struct Args {
    /// WiGLE API token: the "Encoded for use" value from
    /// https://wigle.net/account. Prompted for when omitted on a terminal.
    pub token: Option<String>,

    /// Directory to save CSV files into
    #[arg(default_value = "vault")]
    pub output_dir: PathBuf,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Exit non-zero when any individual download failed
    #[arg(long)]
    pub strict: bool,
}
