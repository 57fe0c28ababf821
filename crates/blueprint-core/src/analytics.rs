//! Trend analysis over a session's analysis history
//!
//! [`TrendAnalyzer`] borrows the history read-only. Every query is a pure
//! function of that slice, so calling it twice gives the same answer.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::AnalysisResult;

/// Minimum history length before patterns are reported
const MIN_HISTORY_FOR_PATTERNS: usize = 3;
/// Times a category must appear to suggest buying in bulk
const BULK_CATEGORY_COUNT: usize = 3;
/// Liters above which a single item counts as high-water
const HIGH_WATER_LITERS: f64 = 5_000.0;
/// High-water items needed before the pattern is reported
const HIGH_WATER_ITEM_COUNT: usize = 2;
/// Mean confidence below which a photo tip is shown
const LOW_CONFIDENCE_THRESHOLD: f64 = 0.6;

/// A named cumulative-water tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Milestone {
    pub threshold: f64,
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

/// Fixed milestone tiers, lowest first
pub const MILESTONES: [Milestone; 4] = [
    Milestone {
        threshold: 10_000.0,
        icon: "🌱",
        title: "Beginner",
        description: "First 10K liters tracked",
    },
    Milestone {
        threshold: 50_000.0,
        icon: "💧",
        title: "Conscious",
        description: "50K liters analyzed",
    },
    Milestone {
        threshold: 100_000.0,
        icon: "🌊",
        title: "Expert",
        description: "100K+ liters tracked",
    },
    Milestone {
        threshold: 500_000.0,
        icon: "🌍",
        title: "Champion",
        description: "Half million liters!",
    },
];

/// Tier reported before the first milestone is reached
const STARTER: Milestone = Milestone {
    threshold: 0.0,
    icon: "🌱",
    title: "Starter",
    description: "Just getting started",
};

/// Aggregate statistics for a history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    pub total_items: usize,
    pub total_water: f64,
    pub total_carbon: f64,
    pub avg_water_per_item: f64,
    pub avg_carbon_per_item: f64,
    /// Most frequent category; ties go to the category seen first
    pub top_category: String,
    pub potential_savings_water: f64,
    /// Swap carbon, counted only for items that recorded their own carbon
    pub potential_savings_carbon: f64,
    pub category_breakdown: BTreeMap<String, usize>,
}

/// A behavioral pattern worth pointing out to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "pattern", rename_all = "snake_case")]
pub enum Pattern {
    /// The latest item's category keeps coming up
    BulkBuying { category: String },
    HighWaterItems { count: usize },
    /// Average model confidence is low, photos could be better
    LowConfidence,
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BulkBuying { category } => write!(
                f,
                "You scan a lot of {} items - consider bulk alternatives to reduce impact",
                category
            ),
            Self::HighWaterItems { count } => write!(
                f,
                "You've scanned {} high-water items - small swaps = huge impact",
                count
            ),
            Self::LowConfidence => {
                f.write_str("Tip: Better lighting & closer photos = more accurate analysis")
            }
        }
    }
}

/// The next tier to aim for
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextMilestone {
    pub title: &'static str,
    pub description: &'static str,
    pub remaining: f64,
    pub progress_pct: f64,
}

/// Where a cumulative water total sits among the milestone tiers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MilestoneProgress {
    pub current: &'static str,
    pub current_icon: &'static str,
    pub current_desc: &'static str,
    /// `None` once the top tier is reached
    pub next: Option<NextMilestone>,
}

impl MilestoneProgress {
    fn new(current: &Milestone, next: Option<(&Milestone, f64)>) -> Self {
        Self {
            current: current.title,
            current_icon: current.icon,
            current_desc: current.description,
            next: next.map(|(tier, total_water)| NextMilestone {
                title: tier.title,
                description: tier.description,
                remaining: tier.threshold - total_water,
                progress_pct: total_water / tier.threshold * 100.0,
            }),
        }
    }
}

/// Read-only analytics over an ordered history
pub struct TrendAnalyzer<'a> {
    history: &'a [AnalysisResult],
}

impl<'a> TrendAnalyzer<'a> {
    pub fn new(history: &'a [AnalysisResult]) -> Self {
        Self { history }
    }

    /// Totals, averages and category counts; `None` for an empty history
    pub fn weekly_summary(&self) -> Option<WeeklySummary> {
        if self.history.is_empty() {
            return None;
        }

        let count = self.history.len() as f64;
        let total_water: f64 = self.history.iter().map(|a| a.total_liters).sum();
        let total_carbon: f64 = self.history.iter().map(|a| a.carbon_kg).sum();

        // First-seen order, used to break ties
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for analysis in self.history {
            let category = analysis.product_category.as_str();
            match counts.iter_mut().find(|(c, _)| *c == category) {
                Some((_, n)) => *n += 1,
                None => counts.push((category, 1)),
            }
        }

        let mut top: Option<(&str, usize)> = None;
        for &(category, n) in &counts {
            if top.map_or(true, |(_, best)| n > best) {
                top = Some((category, n));
            }
        }
        let top_category = top.map(|(c, _)| c.to_string()).unwrap_or_default();

        let potential_savings_water = self
            .history
            .iter()
            .map(|a| a.sustainable_swap.savings_liters)
            .sum();
        let potential_savings_carbon = self
            .history
            .iter()
            .filter(|a| a.carbon_kg > 0.0)
            .map(|a| a.sustainable_swap.carbon_kg)
            .sum();

        Some(WeeklySummary {
            total_items: self.history.len(),
            total_water,
            total_carbon,
            avg_water_per_item: total_water / count,
            avg_carbon_per_item: total_carbon / count,
            top_category,
            potential_savings_water,
            potential_savings_carbon,
            category_breakdown: counts
                .into_iter()
                .map(|(c, n)| (c.to_string(), n))
                .collect(),
        })
    }

    /// Patterns in check order; empty until the history has three entries
    pub fn detect_patterns(&self) -> Vec<Pattern> {
        let Some(latest) = self.history.last() else {
            return Vec::new();
        };
        if self.history.len() < MIN_HISTORY_FOR_PATTERNS {
            return Vec::new();
        }

        let mut patterns = Vec::new();

        let latest_category = &latest.product_category;
        let same_category = self
            .history
            .iter()
            .filter(|a| &a.product_category == latest_category)
            .count();
        if same_category >= BULK_CATEGORY_COUNT {
            patterns.push(Pattern::BulkBuying {
                category: latest_category.clone(),
            });
        }

        let high_water = self
            .history
            .iter()
            .filter(|a| a.total_liters > HIGH_WATER_LITERS)
            .count();
        if high_water >= HIGH_WATER_ITEM_COUNT {
            patterns.push(Pattern::HighWaterItems { count: high_water });
        }

        let avg_confidence = self
            .history
            .iter()
            .map(|a| a.confidence_score)
            .sum::<f64>()
            / self.history.len() as f64;
        if avg_confidence < LOW_CONFIDENCE_THRESHOLD {
            patterns.push(Pattern::LowConfidence);
        }

        patterns
    }

    /// Milestone tier for a cumulative water total
    ///
    /// The total is passed in by the caller (the session keeps the running
    /// sum), not derived from the history.
    pub fn milestone_progress(&self, total_water: f64) -> MilestoneProgress {
        milestone_progress(total_water)
    }
}

/// Milestone tier for a cumulative water total
pub fn milestone_progress(total_water: f64) -> MilestoneProgress {
    let reached = MILESTONES
        .iter()
        .enumerate()
        .rev()
        .find(|(_, tier)| total_water >= tier.threshold);

    match reached {
        Some((idx, tier)) => MilestoneProgress::new(
            tier,
            MILESTONES.get(idx + 1).map(|next| (next, total_water)),
        ),
        None => MilestoneProgress::new(&STARTER, Some((&MILESTONES[0], total_water))),
    }
}
