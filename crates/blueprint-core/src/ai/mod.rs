//! Pluggable vision backend abstraction
//!
//! # Architecture
//!
//! - `VisionBackend` trait: send one product photo, get the model's raw text back
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `MockBackend`
//! - `Analyzer`: turns raw model text (or a transport failure) into an
//!   analysis outcome
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = AppConfig::load(None)?;
//! let analyzer = Analyzer::new(AIClient::from_config(&config)?);
//! match analyzer.analyze_file(Path::new("shirt.jpg")).await? {
//!     Ok(result) => println!("{}: {}L", result.product_name, result.total_liters),
//!     Err(err) => eprintln!("{}", err.user_friendly_message),
//! }
//! ```

mod analyzer;
mod gemini;
mod mock;

pub use analyzer::{
    check_image_size, mime_type_for_bytes, mime_type_for_path, sniff_mime_type, Analyzer,
};
pub use gemini::GeminiBackend;
pub use mock::MockBackend;

use async_trait::async_trait;

use crate::config::{AppConfig, BackendKind};
use crate::error::{Error, Result};

/// Trait defining the interface for vision backends
///
/// Backends must be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait VisionBackend: Send + Sync {
    /// Send an image and return the model's raw text answer
    async fn generate(&self, image: &[u8], mime_type: &str) -> Result<String>;

    /// Check if the backend is reachable and the model exists
    async fn health_check(&self) -> bool;

    /// Get the model name
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
#[derive(Clone)]
pub enum AIClient {
    /// Google Gemini generateContent API
    Gemini(GeminiBackend),
    /// Mock backend for testing and offline demos
    Mock(MockBackend),
}

impl AIClient {
    /// Build the backend selected by `model.backend`
    ///
    /// The Gemini backend needs a plausible API key and loads the analysis
    /// prompt (override first, embedded default second).
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        match config.model.backend {
            BackendKind::Gemini => GeminiBackend::from_config(config).map(AIClient::Gemini),
            BackendKind::Mock => Ok(AIClient::Mock(MockBackend::new())),
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    fn backend(&self) -> &dyn VisionBackend {
        match self {
            AIClient::Gemini(b) => b,
            AIClient::Mock(b) => b,
        }
    }

    pub async fn generate(&self, image: &[u8], mime_type: &str) -> Result<String> {
        self.backend().generate(image, mime_type).await
    }

    pub async fn health_check(&self) -> bool {
        self.backend().health_check().await
    }

    pub fn model(&self) -> &str {
        self.backend().model()
    }

    pub fn host(&self) -> &str {
        self.backend().host()
    }
}

/// Render a backend failure as text for keyword classification
///
/// reqwest's Display does not always say "timeout" or "connection", so the
/// error kind is spelled out in front of the message.
pub fn describe_transport_error(err: &Error) -> String {
    match err {
        Error::Http(e) if e.is_timeout() => format!("timeout: {}", e),
        Error::Http(e) if e.is_connect() => format!("connection error: {}", e),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::classify_transport_error;
    use crate::models::ErrorKind;

    #[test]
    fn test_api_error_description_keeps_status() {
        let err = Error::Api {
            status: 429,
            body: "RESOURCE_EXHAUSTED".into(),
        };
        let text = describe_transport_error(&err);
        assert_eq!(text, "API returned 429: RESOURCE_EXHAUSTED");
        assert_eq!(classify_transport_error(&text), ErrorKind::RateLimit);
    }

    #[test]
    fn test_from_config_mock() {
        let mut config = AppConfig::default();
        config.model.backend = BackendKind::Mock;
        let client = AIClient::from_config(&config).unwrap();
        assert!(matches!(client, AIClient::Mock(_)));
        assert_eq!(client.model(), "mock");
    }

    #[test]
    fn test_from_config_gemini_requires_key() {
        let config = AppConfig::default();
        assert!(AIClient::from_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_refused_connection_reads_as_network_error() {
        let mut config = AppConfig::default();
        config.api_key = Some("AIzaSyTestKey123".into());
        // Port 9 (discard) is closed on test machines
        config.model.host = "http://127.0.0.1:9".into();
        config.model.timeout = std::time::Duration::from_secs(2);
        let client = AIClient::from_config(&config).unwrap();

        let err = client.generate(b"img", "image/jpeg").await.unwrap_err();
        let kind = classify_transport_error(&describe_transport_error(&err));
        assert_eq!(kind, ErrorKind::NetworkError);
    }
}
