//! Image analysis front door
//!
//! Owns no network state of its own: the `AIClient` it is built with does the
//! talking, and the interpreter turns whatever comes back into a result or an
//! `AnalysisError`.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::interpreter::{extract_structured, transport_error};
use crate::models::{AnalysisError, AnalysisResult};

use super::{describe_transport_error, AIClient};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Runs product photos through a vision backend
#[derive(Clone)]
pub struct Analyzer {
    client: AIClient,
    max_image_size_mb: Option<u64>,
}

impl Analyzer {
    pub fn new(client: AIClient) -> Self {
        Self {
            client,
            max_image_size_mb: None,
        }
    }

    /// Reject files larger than `mb` megabytes in `analyze_file`
    pub fn with_size_limit(mut self, mb: u64) -> Self {
        self.max_image_size_mb = Some(mb);
        self
    }

    pub fn client(&self) -> &AIClient {
        &self.client
    }

    /// Analyze one image already in memory
    pub async fn analyze_image(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> std::result::Result<AnalysisResult, AnalysisError> {
        match self.client.generate(image, mime_type).await {
            Ok(text) => {
                debug!(model = %self.client.model(), "Model answered, interpreting");
                extract_structured(&text)
            }
            Err(e) => Err(transport_error(
                &describe_transport_error(&e),
                self.client.model(),
            )),
        }
    }

    /// Read an image from disk and analyze it
    ///
    /// The outer `Result` covers reading the file; the inner one is the
    /// analysis outcome.
    pub async fn analyze_file(
        &self,
        path: &Path,
    ) -> Result<std::result::Result<AnalysisResult, AnalysisError>> {
        let bytes = fs::read(path)?;
        if let Some(max_mb) = self.max_image_size_mb {
            check_image_size(&bytes, max_mb)?;
        }
        let mime_type = sniff_mime_type(&bytes).unwrap_or_else(|| mime_type_for_path(path));
        info!(path = %path.display(), mime_type, "Analyzing image");
        Ok(self.analyze_image(&bytes, mime_type).await)
    }
}

/// Mime type from a file extension (default image/jpeg)
pub fn mime_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

/// Mime type from the file's magic number (default image/jpeg)
pub fn mime_type_for_bytes(bytes: &[u8]) -> &'static str {
    sniff_mime_type(bytes).unwrap_or("image/jpeg")
}

/// Mime type from the magic number, `None` when it is not a known image format
pub fn sniff_mime_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

/// Reject images over `max_mb` megabytes
pub fn check_image_size(bytes: &[u8], max_mb: u64) -> Result<()> {
    let size_mb = bytes.len() as f64 / BYTES_PER_MB;
    if size_mb > max_mb as f64 {
        return Err(Error::InvalidImage(format!(
            "Image too large ({:.1}MB). Max: {}MB",
            size_mb, max_mb
        )));
    }
    Ok(())
}
