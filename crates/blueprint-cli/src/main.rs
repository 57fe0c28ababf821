//! BluePrint CLI - Water footprint analyzer
//!
//! Usage:
//!   blueprint analyze shirt.jpg steak.png   Analyze product photos
//!   blueprint interpret response.txt        Interpret a saved model response
//!   blueprint compare --liters 2700         Everyday comparisons for an amount
//!   blueprint check                         Verify config, API key and model

mod cli;
mod commands;
mod session;

#[cfg(test)]
mod tests;

use anyhow::Result;
use blueprint_core::AppConfig;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use commands::OutputOptions;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let opts = OutputOptions {
        json: cli.json,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Analyze { images } => {
            let config = AppConfig::load(cli.config.as_deref())?;
            commands::cmd_analyze(&config, &images, opts).await?;
        }
        Commands::Interpret { files } => {
            let config = AppConfig::load(cli.config.as_deref())?;
            commands::cmd_interpret(&config, &files, opts)?;
        }
        Commands::Compare { liters } => {
            let config = AppConfig::load(cli.config.as_deref())?;
            commands::cmd_compare(&config, liters, opts)?;
        }
        Commands::Check => {
            let config = AppConfig::load(cli.config.as_deref())?;
            commands::cmd_check(&config, opts).await?;
        }
    }

    Ok(())
}
