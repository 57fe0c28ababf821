//! BluePrint Core Library
//!
//! Shared functionality for the BluePrint water footprint analyzer:
//! - Analysis schema with range validation
//! - Response interpreter (model text to result or classified error)
//! - Impact metrics and everyday comparisons
//! - Session analytics: weekly summary, patterns, milestones
//! - Weekly challenge selection
//! - Pluggable vision backends (Gemini, mock)
//! - Prompt library with user overrides
//! - Layered configuration

pub mod ai;
pub mod analytics;
pub mod challenge;
pub mod config;
pub mod display;
pub mod error;
pub mod interpreter;
pub mod metrics;
pub mod models;
pub mod prompts;

/// Test utilities including mock Gemini server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AIClient, Analyzer, GeminiBackend, MockBackend, VisionBackend};
pub use analytics::{
    milestone_progress, Milestone, MilestoneProgress, NextMilestone, Pattern, TrendAnalyzer,
    WeeklySummary, MILESTONES,
};
pub use challenge::{Challenge, ChallengeEngine};
pub use config::{AppConfig, BackendKind, ConversionRates, ModelConfig};
pub use error::{Error, Result};
pub use interpreter::{extract_structured, transport_error};
pub use metrics::{relatable_comparison, Comparison, ImpactMetrics};
pub use models::{
    AnalysisError, AnalysisResult, ErrorKind, RegionalImpact, SustainableSwap, WaterBreakdown,
};
pub use prompts::{Prompt, PromptId};
