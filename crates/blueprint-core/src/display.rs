//! Formatting helpers shared by front ends

use serde::Serialize;

/// Shown alongside every estimate
pub const DISCLAIMER: &str =
    "Note: Estimates based on Water Footprint Network global averages. For educational purposes.";

/// Abbreviate large numbers: 1.5B, 2.3M, 4.0K, 950
pub fn format_compact(n: f64) -> String {
    if n >= 1_000_000_000.0 {
        format!("{:.1}B", n / 1_000_000_000.0)
    } else if n >= 1_000_000.0 {
        format!("{:.1}M", n / 1_000_000.0)
    } else if n >= 1_000.0 {
        format!("{:.1}K", n / 1_000.0)
    } else {
        format!("{:.0}", n)
    }
}

/// Round to a whole number and group thousands with commas
pub fn format_thousands(n: f64) -> String {
    let rounded = format!("{:.0}", n.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, c) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if n < 0.0 && rounded != "0" {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Qualitative band for a single product's water footprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImpactLevel {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl ImpactLevel {
    pub fn from_liters(total_liters: f64) -> Self {
        if total_liters < 100.0 {
            Self::VeryLow
        } else if total_liters < 1_000.0 {
            Self::Low
        } else if total_liters < 5_000.0 {
            Self::Moderate
        } else if total_liters < 15_000.0 {
            Self::High
        } else {
            Self::VeryHigh
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryLow => "Very Low",
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::VeryLow => "#4CAF50",
            Self::Low => "#8BC34A",
            Self::Moderate => "#FFC107",
            Self::High => "#FF9800",
            Self::VeryHigh => "#F44336",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::VeryLow => "Minimal water impact 👍",
            Self::Low => "Pretty good water footprint",
            Self::Moderate => "Consider some alternatives",
            Self::High => "That's a lot of water!",
            Self::VeryHigh => "Major water footprint 😬",
        }
    }
}

/// Icon for a product category (case-insensitive)
pub fn category_icon(category: &str) -> &'static str {
    match category.trim().to_lowercase().as_str() {
        "textiles" => "👕",
        "food" => "🍽️",
        "electronics" => "📱",
        "agriculture" => "🌾",
        "paper" => "📄",
        "transport" => "🚗",
        "beverages" => "☕",
        _ => "📦",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(950.0), "950");
        assert_eq!(format_compact(4_000.0), "4.0K");
        assert_eq!(format_compact(2_300_000.0), "2.3M");
        assert_eq!(format_compact(1_500_000_000.0), "1.5B");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(45_000.0), "45,000");
        assert_eq!(format_thousands(1_234_567.4), "1,234,567");
        assert_eq!(format_thousands(-2_500.0), "-2,500");
    }

    #[test]
    fn test_impact_level_bands() {
        assert_eq!(ImpactLevel::from_liters(50.0), ImpactLevel::VeryLow);
        assert_eq!(ImpactLevel::from_liters(100.0), ImpactLevel::Low);
        assert_eq!(ImpactLevel::from_liters(2_700.0), ImpactLevel::Moderate);
        assert_eq!(ImpactLevel::from_liters(8_000.0), ImpactLevel::High);
        assert_eq!(ImpactLevel::from_liters(15_400.0).label(), "Very High");
    }

    #[test]
    fn test_category_icon_case_insensitive() {
        assert_eq!(category_icon("Textiles"), "👕");
        assert_eq!(category_icon("FOOD"), "🍽️");
        assert_eq!(category_icon("Spaceships"), "📦");
    }
}
