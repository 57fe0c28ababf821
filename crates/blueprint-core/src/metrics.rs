//! Household-equivalent metrics
//!
//! Expresses a footprint in liters as everyday units: days of drinking
//! water, shower minutes, toilet flushes, appliance cycles.

use serde::{Deserialize, Serialize};

use crate::config::ConversionRates;

/// Liters per day used by [`relatable_comparison`]
const DRINKING_LITERS_PER_DAY: f64 = 3.0;
/// Liters in one ten-minute shower
const TEN_MINUTE_SHOWER_LITERS: f64 = 95.0;
/// Liters in an Olympic-ish swimming pool
const SWIMMING_POOL_LITERS: f64 = 90_000.0;

/// A total footprint expressed in household units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactMetrics {
    pub total_liters: f64,
    pub daily_drinking_equivalent: f64,
    pub shower_minutes_equivalent: f64,
    pub toilet_flushes_equivalent: f64,
    pub dishwasher_cycles_equivalent: f64,
    pub washing_machine_cycles_equivalent: f64,
}

/// The most readable single comparison for a set of metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Display label, e.g. "3.2 hours"
    pub label: String,
    /// Numeric value behind the label
    pub value: f64,
    /// What the unit refers to, e.g. "of continuous shower"
    pub description: String,
}

impl Comparison {
    fn new(label: String, value: f64, description: &str) -> Self {
        Self {
            label,
            value,
            description: description.to_string(),
        }
    }
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.label, self.description)
    }
}

impl ImpactMetrics {
    /// Convert a liter total using validated rates
    ///
    /// Rates come from [`AppConfig`](crate::config::AppConfig), which
    /// rejects zero divisors at load time.
    pub fn from_total_liters(total_liters: f64, rates: &ConversionRates) -> Self {
        Self {
            total_liters,
            daily_drinking_equivalent: total_liters / rates.drinking_liters_per_day,
            shower_minutes_equivalent: total_liters / rates.shower_liters_per_minute,
            toilet_flushes_equivalent: total_liters / rates.toilet_flush_liters,
            dishwasher_cycles_equivalent: total_liters / rates.dishwasher_cycle_liters,
            washing_machine_cycles_equivalent: total_liters / rates.washing_machine_cycle_liters,
        }
    }

    /// Pick the unit that reads most naturally for this magnitude
    pub fn best_comparison(&self) -> Comparison {
        let days = self.daily_drinking_equivalent;
        let minutes = self.shower_minutes_equivalent;

        if days < 30.0 {
            Comparison::new(format!("{:.0} days", days), days, "of drinking water")
        } else if minutes < 120.0 {
            Comparison::new(format!("{:.0} minutes", minutes), minutes, "of shower time")
        } else if minutes < 480.0 {
            let hours = minutes / 60.0;
            Comparison::new(format!("{:.1} hours", hours), hours, "of continuous shower")
        } else if days >= 365.0 {
            let years = days / 365.0;
            Comparison::new(format!("{:.1} years", years), years, "of drinking water")
        } else {
            Comparison::new(format!("{:.0} days", days), days, "of drinking water")
        }
    }
}

/// A short sentence comparing a liter amount to something familiar
///
/// Uses fixed divisors independent of configured rates so the wording is
/// reproducible.
pub fn relatable_comparison(total_liters: f64) -> String {
    let pools = total_liters / SWIMMING_POOL_LITERS;
    let drinking_days = total_liters / DRINKING_LITERS_PER_DAY;
    let showers = total_liters / TEN_MINUTE_SHOWER_LITERS;

    if pools >= 1.0 {
        if pools < 10.0 {
            format!("{:.1} swimming pools", pools)
        } else {
            format!("{:.0} swimming pools", pools)
        }
    } else if drinking_days >= 365.0 {
        let years = drinking_days / 365.0;
        if years < 10.0 {
            format!("{:.1} years of drinking water", years)
        } else {
            format!("{:.0} years of drinking water", years)
        }
    } else if drinking_days >= 30.0 {
        format!("{:.0} days of drinking water", drinking_days)
    } else if showers >= 1.0 {
        format!("{:.0} ten-minute showers", showers)
    } else {
        format!("{:.0} glasses of water", total_liters)
    }
}
