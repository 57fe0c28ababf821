//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// BluePrint - Reveal the hidden water footprint of everyday products
#[derive(Parser)]
#[command(name = "blueprint")]
#[command(about = "Water and carbon footprint estimates from product photos", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ~/.local/share/blueprint/config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging and technical error details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print machine-readable JSON instead of the text report
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze product photos (one session covers all images)
    Analyze {
        /// Image files (.jpg, .jpeg, .png, .webp)
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },

    /// Interpret saved raw model responses without calling the API
    Interpret {
        /// Text files holding model output
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Express a water amount in everyday terms
    Compare {
        /// Water footprint in liters
        #[arg(short, long)]
        liters: f64,
    },

    /// Show configuration and check the API key and model
    Check,
}
