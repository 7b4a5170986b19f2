//! CLI entry point for the wigle-vault tool.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use dialoguer::Input;
use tracing::{debug, error, info};
use wigle_vault::{VaultConfig, WigleClient, run_backup};

mod cli;
mod output;

use cli::Args;

/// Guidance printed when no usable token is available or the API rejects one.
const TOKEN_GUIDANCE: &str = "Get your API token from https://wigle.net/account: \
click \"Show my token\" and copy the \"Encoded for use\" value.";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(strict = args.strict, output_dir = %args.output_dir.display(), "CLI arguments parsed");

    let Some(token) = resolve_token(args.token)? else {
        eprintln!("error: no API token provided");
        eprintln!("{TOKEN_GUIDANCE}");
        eprintln!("Usage: wigle-vault <TOKEN> [OUTPUT_DIR]");
        return Ok(ExitCode::from(2));
    };

    let client = match WigleClient::new(&token) {
        Ok(client) => client,
        Err(error) => {
            error!(%error, "unusable token");
            eprintln!("error: {error}");
            eprintln!("{TOKEN_GUIDANCE}");
            return Ok(ExitCode::from(1));
        }
    };

    tokio::fs::create_dir_all(&args.output_dir)
        .await
        .with_context(|| {
            format!(
                "failed to create output directory {}",
                args.output_dir.display()
            )
        })?;
    // Resolve to an absolute path once, so the report names the real location
    // regardless of the working directory the run started in.
    let output_dir = args
        .output_dir
        .canonicalize()
        .unwrap_or_else(|_| args.output_dir.clone());

    info!(output_dir = %output_dir.display(), "starting backup");

    match run_backup(&client, &output_dir, &VaultConfig::default()).await {
        Ok(stats) => {
            output::print_summary(&stats, &output_dir);
            let outcome = output::determine_exit_outcome(stats.failed(), args.strict);
            Ok(ExitCode::from(outcome.code()))
        }
        Err(error) if error.is_auth_failure() => {
            error!(%error, "authentication failed");
            eprintln!("error: {error}");
            eprintln!("{TOKEN_GUIDANCE}");
            Ok(ExitCode::from(1))
        }
        Err(error) => Err(error).context("backup aborted"),
    }
}

/// Resolves the API token: CLI argument first, then an interactive prompt
/// when attached to a terminal. Returns `None` when no usable token is
/// available.
fn resolve_token(arg: Option<String>) -> Result<Option<String>> {
    if let Some(token) = arg {
        let token = token.trim().to_string();
        return Ok((!token.is_empty()).then_some(token));
    }

    if !io::stdin().is_terminal() {
        return Ok(None);
    }

    println!("{TOKEN_GUIDANCE}");
    let token: String = Input::new()
        .with_prompt("WiGLE API token")
        .interact_text()
        .context("failed to read token from terminal")?;
    let token = token.trim().to_string();
    Ok((!token.is_empty()).then_some(token))
}
