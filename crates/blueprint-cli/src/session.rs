//! Per-run session state
//!
//! The core analytics are stateless; the session owns the history and the
//! running totals for one CLI invocation.

use blueprint_core::{
    AnalysisResult, Challenge, ChallengeEngine, MilestoneProgress, Pattern, TrendAnalyzer,
    WeeklySummary,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Milestone progress is only worth showing after a few scans
pub const MILESTONE_MIN_ITEMS: usize = 3;

/// Where and when a recorded result came from, parallel to `history`
#[derive(Debug, Clone, Serialize)]
pub struct SessionEntry {
    pub source: String,
    pub analyzed_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct Session {
    started_at: DateTime<Utc>,
    entries: Vec<SessionEntry>,
    history: Vec<AnalysisResult>,
    total_water: f64,
    total_carbon: f64,
    failures: usize,
}

/// Everything the session report shows after the per-item output
#[derive(Debug, Serialize)]
pub struct SessionInsights {
    pub started_at: DateTime<Utc>,
    pub items: usize,
    pub failures: usize,
    pub total_water: f64,
    pub total_carbon: f64,
    pub entries: Vec<SessionEntry>,
    pub summary: Option<WeeklySummary>,
    pub patterns: Vec<Pattern>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<MilestoneProgress>,
    pub challenge: Challenge,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            entries: Vec::new(),
            history: Vec::new(),
            total_water: 0.0,
            total_carbon: 0.0,
            failures: 0,
        }
    }

    /// Record a successful analysis
    pub fn record(&mut self, source: &str, result: AnalysisResult) {
        self.total_water += result.total_liters;
        self.total_carbon += result.carbon_kg;
        self.history.push(result);
        self.entries.push(SessionEntry {
            source: source.to_string(),
            analyzed_at: Utc::now(),
        });
    }

    /// Count an input that produced no result
    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    pub fn history(&self) -> &[AnalysisResult] {
        &self.history
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn insights(&self) -> SessionInsights {
        let analyzer = TrendAnalyzer::new(&self.history);
        let milestone = (self.history.len() >= MILESTONE_MIN_ITEMS)
            .then(|| analyzer.milestone_progress(self.total_water));

        SessionInsights {
            started_at: self.started_at,
            items: self.history.len(),
            failures: self.failures,
            total_water: self.total_water,
            total_carbon: self.total_carbon,
            entries: self.entries.clone(),
            summary: analyzer.weekly_summary(),
            patterns: analyzer.detect_patterns(),
            milestone,
            challenge: ChallengeEngine::generate_weekly_challenge(&self.history),
        }
    }
}
