//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `redirect_check` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use redirect_check::initialization::init_logger_with;
use redirect_check::{run_scan, Config, Opt};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments into Config
    let config = Config::from(Opt::parse());

    // Initialize logger based on config
    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    match run_scan(config).await {
        Ok(report) => {
            println!(
                "✅ Probed {} domain{} ({} notable redirect{} to {} host{}) in {:.1}s",
                report.total_domains,
                if report.total_domains == 1 { "" } else { "s" },
                report.notable,
                if report.notable == 1 { "" } else { "s" },
                report.groups,
                if report.groups == 1 { "" } else { "s" },
                report.elapsed_seconds
            );
            println!("Results saved in {}", report.output_path.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("redirect_check error: {:#}", e);
            process::exit(1);
        }
    }
}
