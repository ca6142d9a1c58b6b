//! `octofit`: command-line front end for the OctoFit Tracker API.

mod cli;
mod commands;
mod transport;
mod views;

use clap::Parser;
use octofit_core::{Api, ApiConfig, OctofitClient};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::transport::UreqTransport;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = ApiConfig::from_env();
    if let Some(url) = cli.base_url {
        config.base_url = url;
    }
    tracing::debug!(base_url = %config.base_url, "Resolved API base URL");

    let api = Api::new(OctofitClient::new(&config.base_url), UreqTransport::new());
    let output = commands::run(&api, cli.command)?;
    println!("{output}");
    Ok(())
}

/// Logs go to stderr so they never mix with command output.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
