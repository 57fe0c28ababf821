//! Mock backend for testing and offline demos
//!
//! Returns a canned analysis for a cotton T-shirt regardless of the image.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::VisionBackend;

/// Canned answer, wrapped in a fence the way the real model usually replies
const CANNED_RESPONSE: &str = r#"```json
{
  "product_name": "Cotton T-shirt",
  "product_category": "Textiles",
  "total_liters": 2700,
  "carbon_kg": 7.0,
  "breakdown": {
    "green_water_pct": 54,
    "blue_water_pct": 33,
    "grey_water_pct": 13
  },
  "sustainable_swap": {
    "product_name": "Secondhand T-shirt",
    "water_liters": 500,
    "carbon_kg": 1.0,
    "savings_liters": 2200,
    "savings_percentage": 81.5,
    "reasoning": "Reuses an existing garment, so no new cotton is grown"
  },
  "regional_impact": {
    "high_stress_regions": ["India", "Pakistan"],
    "scarcity_multiplier": 2.5,
    "context": "Most cotton is irrigated in water-stressed basins"
  },
  "actionable_steps": ["Buy secondhand", "Wash cold", "Repair before replacing"],
  "confidence_score": 0.9,
  "data_source": "WFN 2024 + IPCC",
  "fun_fact": "One T-shirt uses as much water as one person drinks in 2.5 years"
}
```"#;

/// Mock backend returning a fixed response or a fixed failure
#[derive(Clone)]
pub struct MockBackend {
    response: std::result::Result<String, String>,
    healthy: bool,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Healthy mock returning the canned T-shirt analysis
    pub fn new() -> Self {
        Self {
            response: Ok(CANNED_RESPONSE.to_string()),
            healthy: true,
        }
    }

    /// Mock that returns `text` as the model's answer
    pub fn with_response(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
            healthy: true,
        }
    }

    /// Mock whose calls fail with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
            healthy: false,
        }
    }
}

#[async_trait]
impl VisionBackend for MockBackend {
    async fn generate(&self, _image: &[u8], _mime_type: &str) -> Result<String> {
        self.response.clone().map_err(Error::Backend)
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::extract_structured;

    #[tokio::test]
    async fn test_canned_response_is_valid_analysis() {
        let mock = MockBackend::new();
        let text = mock.generate(b"", "image/jpeg").await.unwrap();
        let result = extract_structured(&text).unwrap();
        assert_eq!(result.product_name, "Cotton T-shirt");
        assert_eq!(result.total_liters, 2700.0);
        assert_eq!(result.breakdown.total_pct(), 100.0);
    }

    #[tokio::test]
    async fn test_failing_mock() {
        let mock = MockBackend::failing("401 Unauthorized");
        assert!(!mock.health_check().await);
        let err = mock.generate(b"", "image/jpeg").await.unwrap_err();
        assert!(err.to_string().contains("401"));
    }
}
