//! Analysis result schema
//!
//! Typed records for a successful footprint analysis and the distinct
//! [`AnalysisError`] record. Every record has an explicit `validate()` that
//! checks the documented ranges; the interpreter only hands out a record
//! after validation has passed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default data source attributed when the model omits one
pub const DEFAULT_DATA_SOURCE: &str = "WFN 2024 + IPCC";

/// A field that failed range validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaViolation {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be at least {min}, got {value}")]
    BelowMinimum { field: String, value: f64, min: f64 },
}

impl SchemaViolation {
    /// Dotted path of the offending field (e.g. `breakdown.grey_water_pct`)
    pub fn field(&self) -> &str {
        match self {
            Self::OutOfRange { field, .. } | Self::BelowMinimum { field, .. } => field,
        }
    }

    fn nested(self, parent: &str) -> Self {
        match self {
            Self::OutOfRange {
                field,
                value,
                min,
                max,
            } => Self::OutOfRange {
                field: format!("{}.{}", parent, field),
                value,
                min,
                max,
            },
            Self::BelowMinimum { field, value, min } => Self::BelowMinimum {
                field: format!("{}.{}", parent, field),
                value,
                min,
            },
        }
    }
}

fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), SchemaViolation> {
    // Written so that NaN fails as well
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(SchemaViolation::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        })
    }
}

fn check_min(field: &str, value: f64, min: f64) -> Result<(), SchemaViolation> {
    if value >= min && value.is_finite() {
        Ok(())
    } else {
        Err(SchemaViolation::BelowMinimum {
            field: field.to_string(),
            value,
            min,
        })
    }
}

/// Green/blue/grey split of a water footprint, in percent
///
/// The three values are not required to sum to 100. The upstream model is
/// imprecise and the split is passed through as reported; see
/// [`WaterBreakdown::total_pct`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterBreakdown {
    /// Rainwater consumed by plants
    pub green_water_pct: f64,
    /// Surface or groundwater used in production
    pub blue_water_pct: f64,
    /// Freshwater needed to dilute pollutants
    pub grey_water_pct: f64,
}

impl WaterBreakdown {
    pub fn validate(&self) -> Result<(), SchemaViolation> {
        check_range("green_water_pct", self.green_water_pct, 0.0, 100.0)?;
        check_range("blue_water_pct", self.blue_water_pct, 0.0, 100.0)?;
        check_range("grey_water_pct", self.grey_water_pct, 0.0, 100.0)
    }

    /// Sum of the three percentages as reported by the model
    pub fn total_pct(&self) -> f64 {
        self.green_water_pct + self.blue_water_pct + self.grey_water_pct
    }
}

/// Regional water-stress context for a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalImpact {
    #[serde(default)]
    pub high_stress_regions: Vec<String>,
    /// Amplification of impact in water-scarce regions (1.0 - 5.0)
    #[serde(default = "default_scarcity_multiplier")]
    pub scarcity_multiplier: f64,
    #[serde(default)]
    pub context: String,
}

fn default_scarcity_multiplier() -> f64 {
    1.0
}

impl RegionalImpact {
    pub fn validate(&self) -> Result<(), SchemaViolation> {
        check_range("scarcity_multiplier", self.scarcity_multiplier, 1.0, 5.0)
    }
}

/// A lower-impact alternative suggested for the analyzed product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SustainableSwap {
    pub product_name: String,
    pub water_liters: f64,
    #[serde(default)]
    pub carbon_kg: f64,
    pub savings_liters: f64,
    pub savings_percentage: f64,
    pub reasoning: String,
}

impl SustainableSwap {
    pub fn validate(&self) -> Result<(), SchemaViolation> {
        check_min("water_liters", self.water_liters, 0.0)?;
        check_min("carbon_kg", self.carbon_kg, 0.0)?;
        check_min("savings_liters", self.savings_liters, 0.0)?;
        check_range("savings_percentage", self.savings_percentage, 0.0, 100.0)
    }
}

/// A successful footprint analysis of one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub product_name: String,
    /// Free-text category (Textiles, Food, Electronics, ...)
    pub product_category: String,
    pub total_liters: f64,
    #[serde(default)]
    pub carbon_kg: f64,
    pub breakdown: WaterBreakdown,
    pub sustainable_swap: SustainableSwap,
    #[serde(default)]
    pub regional_impact: Option<RegionalImpact>,
    #[serde(default)]
    pub actionable_steps: Vec<String>,
    #[serde(default)]
    pub collective_impact: Option<String>,
    /// Model-reported certainty (0.0 - 1.0)
    pub confidence_score: f64,
    #[serde(default = "default_data_source")]
    pub data_source: String,
    #[serde(default)]
    pub fun_fact: Option<String>,
}

fn default_data_source() -> String {
    DEFAULT_DATA_SOURCE.to_string()
}

impl AnalysisResult {
    /// Check every numeric field against its documented range
    pub fn validate(&self) -> Result<(), SchemaViolation> {
        check_min("total_liters", self.total_liters, 0.0)?;
        check_min("carbon_kg", self.carbon_kg, 0.0)?;
        self.breakdown
            .validate()
            .map_err(|v| v.nested("breakdown"))?;
        self.sustainable_swap
            .validate()
            .map_err(|v| v.nested("sustainable_swap"))?;
        if let Some(ref regional) = self.regional_impact {
            regional
                .validate()
                .map_err(|v| v.nested("regional_impact"))?;
        }
        check_range("confidence_score", self.confidence_score, 0.0, 1.0)
    }

    pub fn green_water_liters(&self) -> f64 {
        self.total_liters * (self.breakdown.green_water_pct / 100.0)
    }

    pub fn blue_water_liters(&self) -> f64 {
        self.total_liters * (self.breakdown.blue_water_pct / 100.0)
    }

    pub fn grey_water_liters(&self) -> f64 {
        self.total_liters * (self.breakdown.grey_water_pct / 100.0)
    }
}

/// Failure taxonomy for an analysis attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The model returned no text
    EmptyResponse,
    /// No well-formed JSON could be extracted from the response
    ParseError,
    /// JSON decoded but did not satisfy the result schema
    ValidationError,
    /// The model itself reported that it could not analyze the image
    AnalysisFailed,
    AuthError,
    RateLimit,
    ModelNotFound,
    Timeout,
    NetworkError,
    /// Any other transport failure
    ApiError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyResponse => "empty_response",
            Self::ParseError => "parse_error",
            Self::ValidationError => "validation_error",
            Self::AnalysisFailed => "analysis_failed",
            Self::AuthError => "auth_error",
            Self::RateLimit => "rate_limit",
            Self::ModelNotFound => "model_not_found",
            Self::Timeout => "timeout",
            Self::NetworkError => "network_error",
            Self::ApiError => "api_error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed analysis, ready to show to the user
///
/// `user_friendly_message` is the primary text; `message` holds diagnostic
/// detail for logs and an expandable "technical details" view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisError {
    #[serde(rename = "error_type")]
    pub kind: ErrorKind,
    pub message: String,
    pub user_friendly_message: String,
    pub retry_suggested: bool,
}

impl AnalysisError {
    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        user_friendly_message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            user_friendly_message: user_friendly_message.into(),
            retry_suggested: true,
        }
    }

    pub fn empty_response() -> Self {
        Self::new(
            ErrorKind::EmptyResponse,
            "Empty response from AI",
            "Couldn't analyze the image. Try a clearer photo with better lighting.",
        )
    }

    /// Decoded JSON that does not fit the result schema
    pub fn validation(detail: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorKind::ValidationError,
            format!("Schema validation failed: {}", detail),
            "AI response was incomplete. Retrying might help.",
        )
    }
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}
