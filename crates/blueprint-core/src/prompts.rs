//! Prompt Library for the vision model
//!
//! Prompts are loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/blueprint/prompts/overrides/)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Users can tune the reference data or wording without rebuilding, and
//! still pick up new default prompts on upgrade.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default prompts (compiled into binary)
mod defaults {
    pub const ANALYZE_FOOTPRINT: &str = include_str!("../../../prompts/analyze_footprint.md");
}

/// Known prompt IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// Product photo to water/carbon footprint JSON
    AnalyzeFootprint,
}

impl PromptId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnalyzeFootprint => "analyze_footprint",
        }
    }

    pub fn all() -> &'static [PromptId] {
        &[Self::AnalyzeFootprint]
    }

    fn default_content(&self) -> &'static str {
        match self {
            Self::AnalyzeFootprint => defaults::ANALYZE_FOOTPRINT,
        }
    }
}

/// Prompt frontmatter metadata
#[derive(Debug, Clone, Deserialize)]
pub struct PromptMetadata {
    pub id: String,
    /// Version number for tracking changes
    pub version: u32,
    pub task_type: String,
}

/// A loaded prompt with metadata and content
#[derive(Debug, Clone)]
pub struct Prompt {
    pub metadata: PromptMetadata,
    /// The prompt body (system + user sections)
    pub content: String,
    /// Path to the override file, when one was used
    pub override_path: Option<PathBuf>,
}

impl Prompt {
    /// Load a prompt, preferring an override in `override_dir`
    pub fn load(id: PromptId, override_dir: Option<&Path>) -> Result<Self> {
        if let Some(dir) = override_dir {
            let path = dir.join(format!("{}.md", id.as_str()));
            if path.exists() {
                let content = fs::read_to_string(&path).map_err(|e| {
                    Error::Prompt(format!("Failed to read prompt override: {}", e))
                })?;
                let (metadata, body) = parse_prompt(&content)?;
                return Ok(Self {
                    metadata,
                    content: body,
                    override_path: Some(path),
                });
            }
        }

        let (metadata, body) = parse_prompt(id.default_content())?;
        Ok(Self {
            metadata,
            content: body,
            override_path: None,
        })
    }

    /// Load from the default override directory or the embedded copy
    pub fn resolve(id: PromptId) -> Result<Self> {
        Self::load(id, default_prompts_dir().as_deref())
    }

    /// Load the embedded copy only
    pub fn embedded(id: PromptId) -> Result<Self> {
        Self::load(id, None)
    }

    pub fn is_override(&self) -> bool {
        self.override_path.is_some()
    }

    /// Get the system section of the prompt
    pub fn system_section(&self) -> Option<&str> {
        extract_section(&self.content, "# System")
    }

    /// Get the user section of the prompt
    pub fn user_section(&self) -> Option<&str> {
        extract_section(&self.content, "# User")
    }
}

/// Default prompts override directory
pub fn default_prompts_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("blueprint").join("prompts").join("overrides"))
}

/// Parse a prompt file into metadata and body
fn parse_prompt(content: &str) -> Result<(PromptMetadata, String)> {
    let content = content.trim();

    if !content.starts_with("---") {
        return Err(Error::Prompt(
            "Prompt must start with YAML frontmatter (---)".into(),
        ));
    }

    // The closing fence must start a line
    let rest = &content[3..];
    let end = rest.find("\n---").ok_or_else(|| {
        Error::Prompt("Prompt frontmatter not closed (missing second ---)".into())
    })?;

    let frontmatter = rest[..end].trim();
    let body = rest[end + 4..].trim();

    let metadata: PromptMetadata = serde_yaml::from_str(frontmatter)
        .map_err(|e| Error::Prompt(format!("Invalid prompt frontmatter: {}", e)))?;

    Ok((metadata, body.to_string()))
}

/// Extract a section from the prompt content
fn extract_section<'a>(content: &'a str, header: &str) -> Option<&'a str> {
    let start = content.find(header)?;
    let after_header = &content[start + header.len()..];

    // Sub-headings (##) stay inside the section
    let end = after_header.find("\n# ").unwrap_or(after_header.len());

    Some(after_header[..end].trim())
}
