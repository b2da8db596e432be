//! Binary crate for the `simpleweather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Driving a core session from one-shot commands or stdin lines
//! - Human-friendly output formatting

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cli;
mod format;
mod watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    setup_logging(cmd.verbose);
    cmd.run().await
}

/// Logs go to stderr so stdout stays clean for weather output.
fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("simpleweather=debug,simpleweather_core=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
