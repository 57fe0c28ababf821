//! Response interpreter
//!
//! Turns free-form model output into a validated [`AnalysisResult`] or a
//! classified [`AnalysisError`]. The model is told to answer with bare JSON
//! but sometimes wraps it in markdown fences or prose anyway, so extraction
//! tries several shapes before giving up.
//!
//! Nothing in this module panics or returns [`crate::Error`]: every failure
//! is an `AnalysisError` value.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::FALLBACK_MODEL;
use crate::models::{AnalysisError, AnalysisResult, ErrorKind};

/// Characters of raw response kept in a parse error diagnostic
const PARSE_ERROR_PREVIEW_CHARS: usize = 500;

/// Characters of raw transport error shown in the generic API error message
const API_ERROR_PREVIEW_CHARS: usize = 200;

/// Breakdown sums further than this from 100 are logged
const BREAKDOWN_SUM_TOLERANCE: f64 = 1.0;

fn json_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```json\s*(\{.*?\})\s*```").expect("valid regex"))
}

fn any_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```\s*(\{.*?\})\s*```").expect("valid regex"))
}

/// Interpret raw model output as a footprint analysis
pub fn extract_structured(text: &str) -> Result<AnalysisResult, AnalysisError> {
    if text.trim().is_empty() {
        return Err(AnalysisError::empty_response());
    }

    let value = extract_json(text).ok_or_else(|| {
        debug!("No JSON object found in model response");
        AnalysisError::new(
            ErrorKind::ParseError,
            format!(
                "Failed to parse JSON from response. Raw text: {}",
                truncate_chars(text.trim(), PARSE_ERROR_PREVIEW_CHARS)
            ),
            "AI response format error. Retrying might help.",
        )
    })?;

    if value.get("error").is_some_and(is_truthy) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error");
        let suggestion = value
            .get("suggestion")
            .and_then(Value::as_str)
            .unwrap_or("Try with a clearer image.");
        return Err(AnalysisError::new(
            ErrorKind::AnalysisFailed,
            message,
            suggestion,
        ));
    }

    let result: AnalysisResult =
        serde_json::from_value(value).map_err(AnalysisError::validation)?;
    result.validate().map_err(AnalysisError::validation)?;

    let breakdown_sum = result.breakdown.total_pct();
    if (breakdown_sum - 100.0).abs() > BREAKDOWN_SUM_TOLERANCE {
        warn!(
            product = %result.product_name,
            sum = breakdown_sum,
            "Water breakdown percentages do not sum to 100"
        );
    }

    Ok(result)
}

/// Find the first candidate in the text that decodes as a JSON object
///
/// Candidates, most specific first: a ```` ```json ```` fenced block, any
/// fenced block, the span from the first `{` to the last `}`, and finally
/// the whole trimmed text.
pub fn extract_json(text: &str) -> Option<Value> {
    let text = text.trim();

    let fenced = [json_fence(), any_fence()]
        .into_iter()
        .filter_map(|re| re.captures(text))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim()));

    let braces = match (text.find('{'), text.rfind('}')) {
        (Some(s), Some(e)) if s < e => Some(&text[s..=e]),
        _ => None,
    };

    fenced
        .chain(braces)
        .chain(std::iter::once(text))
        .find_map(decode_object)
}

fn decode_object(candidate: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(value @ Value::Object(_)) => Some(value),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "Candidate JSON did not decode");
            None
        }
    }
}

/// JSON truthiness of the model's `error` flag
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Classify the text of a failed model call
///
/// Keyword match against the lower-cased text, first hit wins.
pub fn classify_transport_error(text: &str) -> ErrorKind {
    let lower = text.to_lowercase();
    let has = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

    if has(&["unauthorized", "401", "api_key"]) {
        ErrorKind::AuthError
    } else if has(&["quota", "429", "resource_exhausted"]) {
        ErrorKind::RateLimit
    } else if has(&["404", "not found"]) {
        ErrorKind::ModelNotFound
    } else if has(&["timeout"]) {
        ErrorKind::Timeout
    } else if has(&["network", "connection"]) {
        ErrorKind::NetworkError
    } else {
        ErrorKind::ApiError
    }
}

/// Build the user-facing error for a failed model call
pub fn transport_error(raw: &str, model: &str) -> AnalysisError {
    let kind = classify_transport_error(raw);
    let friendly = match kind {
        ErrorKind::AuthError => {
            "🔑 Invalid API key. Check your GEMINI_API_KEY setting".to_string()
        }
        ErrorKind::RateLimit => {
            "🚦 API rate limit exceeded. Wait a minute and try again.".to_string()
        }
        ErrorKind::ModelNotFound => format!(
            "❌ Model '{}' not available. Try {}",
            model, FALLBACK_MODEL
        ),
        ErrorKind::Timeout => "⏱️ Request timed out. Try again with smaller image.".to_string(),
        ErrorKind::NetworkError => "🌐 Network error. Check your internet connection.".to_string(),
        _ => format!(
            "⚠️ API Error: {}",
            truncate_chars(raw, API_ERROR_PREVIEW_CHARS)
        ),
    };
    warn!(kind = %kind, error = %raw, "Model call failed");
    AnalysisError::new(kind, raw, friendly)
}

/// Truncate to at most `max` characters without splitting a code point
pub(crate) fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
