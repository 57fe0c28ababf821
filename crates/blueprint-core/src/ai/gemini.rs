//! Gemini backend implementation
//!
//! HTTP client for the `generateContent` REST endpoint. The analysis prompt
//! comes from the prompt library; sampling settings come from `[model]` in
//! the app config.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{AppConfig, ModelConfig};
use crate::error::{Error, Result};
use crate::prompts::{Prompt, PromptId};

use super::VisionBackend;

const API_KEY_HEADER: &str = "x-goog-api-key";
const DEFAULT_USER_TEXT: &str = "Analyze this product image:";

/// Gemini vision backend
#[derive(Clone)]
pub struct GeminiBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: String,
    prompt: Arc<Prompt>,
    generation: GenerationConfig,
}

impl GeminiBackend {
    /// Create a backend with explicit settings
    pub fn new(model: &ModelConfig, api_key: &str, prompt: Prompt) -> Result<Self> {
        let http_client = Client::builder().timeout(model.timeout).build()?;
        Ok(Self {
            http_client,
            base_url: model.host.trim_end_matches('/').to_string(),
            model: model.name.clone(),
            api_key: api_key.to_string(),
            prompt: Arc::new(prompt),
            generation: GenerationConfig {
                temperature: model.temperature,
                top_p: model.top_p,
                top_k: model.top_k,
                max_output_tokens: model.max_output_tokens,
            },
        })
    }

    /// Create from resolved app config
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let api_key = config.validate_api_key()?;
        let prompt = Prompt::resolve(PromptId::AnalyzeFootprint)?;
        if let Some(path) = &prompt.override_path {
            debug!(path = %path.display(), "Using prompt override");
        }
        Self::new(&config.model, api_key, prompt)
    }

    fn model_url(&self) -> String {
        format!("{}/v1beta/models/{}", self.base_url, self.model)
    }

    fn build_request(&self, image: &[u8], mime_type: &str) -> GenerateRequest {
        let system = self.prompt.system_section().unwrap_or(&self.prompt.content);
        let user = self.prompt.user_section().unwrap_or(DEFAULT_USER_TEXT);

        GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::text(system),
                    Part::text(user),
                    Part {
                        text: None,
                        inline_data: Some(Blob {
                            mime_type: mime_type.to_string(),
                            data: base64::engine::general_purpose::STANDARD.encode(image),
                        }),
                    },
                ],
            }],
            generation_config: self.generation.clone(),
        }
    }
}

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<Blob>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Blob {
    mime_type: String,
    data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_p: f64,
    top_k: u32,
    max_output_tokens: u32,
}

/// Response from `generateContent`
#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl VisionBackend for GeminiBackend {
    async fn generate(&self, image: &[u8], mime_type: &str) -> Result<String> {
        let request = self.build_request(image, mime_type);
        let url = format!("{}:generateContent", self.model_url());

        debug!(
            model = %self.model,
            mime_type,
            image_bytes = image.len(),
            "Sending image to Gemini"
        );

        let response = self
            .http_client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = parsed.text();
        debug!(chars = text.len(), "Gemini response: {}", text);
        Ok(text)
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(self.model_url())
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockGeminiServer, MockReply};

    fn backend_for(url: &str) -> GeminiBackend {
        let model = ModelConfig {
            host: url.to_string(),
            ..ModelConfig::default()
        };
        let prompt = Prompt::embedded(PromptId::AnalyzeFootprint).unwrap();
        GeminiBackend::new(&model, "AIzaSyTestKey123", prompt).unwrap()
    }

    #[test]
    fn test_request_shape() {
        let backend = backend_for("http://localhost");
        let request = backend.build_request(&[0xFF, 0xD8, 0xFF], "image/jpeg");
        let json = serde_json::to_value(&request).unwrap();

        let parts = json["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert!(parts[0]["text"]
            .as_str()
            .unwrap()
            .contains("\"sustainable_swap\""));
        assert_eq!(parts[1]["text"], "Analyze this product image:");
        assert_eq!(parts[2]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[2]["inlineData"]["data"], "/9j/");
        assert!(parts[2].get("text").is_none());

        let gen = &json["generationConfig"];
        assert_eq!(gen["temperature"], 0.3);
        assert_eq!(gen["topK"], 40);
        assert_eq!(gen["maxOutputTokens"], 2048);
    }

    #[test]
    fn test_response_text_joins_parts() {
        let parsed: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}]}},
                {"content":{"parts":[{"text":"ignored"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.text(), "{\"a\":1}");
    }

    #[test]
    fn test_response_without_candidates_is_empty() {
        let parsed: GenerateResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert_eq!(parsed.text(), "");
    }

    #[tokio::test]
    async fn test_generate_against_mock_server() {
        let server = MockGeminiServer::start(MockReply::Text("hello".into())).await;
        let backend = backend_for(&server.url());

        let text = backend.generate(b"img", "image/png").await.unwrap();
        assert_eq!(text, "hello");
        assert_eq!(server.last_api_key().as_deref(), Some("AIzaSyTestKey123"));
        assert!(backend.health_check().await);
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let server = MockGeminiServer::start(MockReply::Status(
            429,
            "Resource has been exhausted (e.g. check quota).".into(),
        ))
        .await;
        let backend = backend_for(&server.url());

        match backend.generate(b"img", "image/png").await {
            Err(Error::Api { status, body }) => {
                assert_eq!(status, 429);
                assert!(body.contains("quota"));
            }
            other => panic!("expected API error, got {:?}", other.map(|_| ())),
        }
        assert!(!backend.health_check().await);
    }
}
