//! Check command: configuration, API key and model health

use anyhow::{bail, Result};
use blueprint_core::config::default_config_path;
use blueprint_core::prompts::{default_prompts_dir, Prompt, PromptId};
use blueprint_core::{AIClient, AppConfig, BackendKind};
use serde::Serialize;

use super::{print_json, OutputOptions};

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    config: &'a AppConfig,
    api_key: Result<String, String>,
    prompt_override: Option<String>,
    healthy: bool,
}

/// Show a key as its first and last four characters
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

pub async fn cmd_check(config: &AppConfig, opts: OutputOptions) -> Result<()> {
    let api_key = match config.model.backend {
        BackendKind::Mock => Ok("(not needed for mock backend)".to_string()),
        BackendKind::Gemini => config
            .validate_api_key()
            .map(mask_key)
            .map_err(|e| e.to_string()),
    };

    let prompt = Prompt::resolve(PromptId::AnalyzeFootprint)?;
    let prompt_override = prompt
        .override_path
        .as_ref()
        .map(|p| p.display().to_string());

    let healthy = match AIClient::from_config(config) {
        Ok(client) => client.health_check().await,
        Err(_) => false,
    };

    if opts.json {
        print_json(&CheckReport {
            config,
            api_key,
            prompt_override,
            healthy,
        })?;
    } else {
        println!();
        println!("🔍 BluePrint Check");
        println!("   ─────────────────────────────────────────────────────────────");
        match &config.config_path {
            Some(path) => println!("   Config:   {}", path.display()),
            None => {
                let hint = default_config_path()
                    .map(|p| format!(" (create {} to override)", p.display()))
                    .unwrap_or_default();
                println!("   Config:   built-in defaults{}", hint);
            }
        }
        println!("   Backend:  {:?}", config.model.backend);
        println!("   Model:    {}", config.model.name);
        println!("   Host:     {}", config.model.host);
        println!("   Timeout:  {}s", config.model.timeout.as_secs());
        println!("   Max image size: {}MB", config.max_image_size_mb);
        match &prompt_override {
            Some(path) => println!("   Prompt:   {} (v{})", path, prompt.metadata.version),
            None => {
                let dir = default_prompts_dir()
                    .map(|d| d.display().to_string())
                    .unwrap_or_else(|| "(no data dir)".to_string());
                println!(
                    "   Prompt:   embedded v{} (overrides: {})",
                    prompt.metadata.version, dir
                );
            }
        }
        println!();
        match &api_key {
            Ok(shown) => println!("   ✓ API key: {}", shown),
            Err(e) => println!("   ❌ API key: {}", e),
        }
        if healthy {
            println!("   ✓ Model '{}' is reachable", config.model.name);
        } else {
            println!("   ❌ Model '{}' is not reachable", config.model.name);
        }
        println!();
    }

    if !healthy {
        bail!("Backend check failed");
    }
    Ok(())
}
