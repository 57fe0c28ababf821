//! CLI command implementations
//!
//! - `analyze` - Analyze photos and interpret saved responses, with session report
//! - `compare` - Everyday comparisons for a liter amount
//! - `check` - Config, API key and model health
//! - `report` - Text rendering shared by the commands

pub mod analyze;
pub mod check;
pub mod compare;
pub mod report;

// Re-export command functions for main.rs
pub use analyze::*;
pub use check::*;
pub use compare::*;

/// Output switches shared by every command
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Print JSON instead of the text report
    pub json: bool,
    /// Show technical error details
    pub verbose: bool,
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
