//! Compare command: a liter amount in everyday terms

use anyhow::{bail, Result};
use blueprint_core::display::{format_thousands, ImpactLevel};
use blueprint_core::{relatable_comparison, AppConfig, Comparison, ImpactMetrics};
use serde::Serialize;

use super::{print_json, OutputOptions};

#[derive(Debug, Serialize)]
pub struct CompareReport {
    pub metrics: ImpactMetrics,
    pub best_comparison: Comparison,
    pub relatable: String,
    pub impact_level: &'static str,
}

/// Build the comparison report for `liters`
pub fn compare_report(config: &AppConfig, liters: f64) -> Result<CompareReport> {
    if !liters.is_finite() || liters < 0.0 {
        bail!("Liters must be a non-negative number, got {}", liters);
    }
    let metrics = ImpactMetrics::from_total_liters(liters, &config.rates);
    Ok(CompareReport {
        best_comparison: metrics.best_comparison(),
        relatable: relatable_comparison(liters),
        impact_level: ImpactLevel::from_liters(liters).label(),
        metrics,
    })
}

pub fn cmd_compare(config: &AppConfig, liters: f64, opts: OutputOptions) -> Result<()> {
    let report = compare_report(config, liters)?;
    if opts.json {
        return print_json(&report);
    }

    let m = &report.metrics;
    println!();
    println!("💧 {} liters", format_thousands(m.total_liters));
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Impact level:     {}", report.impact_level);
    println!("   Equivalent:       {}", report.relatable);
    println!("   Best comparison:  {}", report.best_comparison);
    println!();
    println!("   Drinking water:   {:.1} days", m.daily_drinking_equivalent);
    println!("   Showers:          {:.1} minutes", m.shower_minutes_equivalent);
    println!("   Toilet flushes:   {:.1}", m.toilet_flushes_equivalent);
    println!("   Dishwasher:       {:.1} cycles", m.dishwasher_cycles_equivalent);
    println!(
        "   Washing machine:  {:.1} loads",
        m.washing_machine_cycles_equivalent
    );
    println!();
    Ok(())
}
