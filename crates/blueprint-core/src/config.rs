//! Application configuration
//!
//! Config is resolved in three layers:
//! 1. Embedded defaults (`config/blueprint.toml`, compiled into the binary)
//! 2. An override file: an explicit path, or
//!    `~/.local/share/blueprint/config.toml` when it exists
//! 3. Environment variables (`AI_BACKEND`, `GEMINI_API_KEY`, `GEMINI_MODEL`,
//!    `GEMINI_HOST`, `API_TIMEOUT_SECONDS`, `MAX_IMAGE_SIZE_MB`)
//!
//! Conversion rates are validated at load time so that metric arithmetic
//! never divides by zero later on.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/blueprint.toml");

/// Model suggested to the user when the configured one is unavailable
pub const FALLBACK_MODEL: &str = "gemini-2.5-flash";

/// Shortest API key accepted as plausible
const MIN_API_KEY_LEN: usize = 10;

/// Which vision backend answers analysis requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Gemini,
    /// Canned responses, no network
    Mock,
}

impl std::str::FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "mock" => Ok(Self::Mock),
            other => Err(Error::Config(format!("Unknown AI backend: {}", other))),
        }
    }
}

/// Vision model settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelConfig {
    pub backend: BackendKind,
    pub name: String,
    pub host: String,
    pub timeout: Duration,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Gemini,
            name: FALLBACK_MODEL.to_string(),
            host: "https://generativelanguage.googleapis.com".to_string(),
            timeout: Duration::from_secs(30),
            temperature: 0.3,
            top_p: 0.8,
            top_k: 40,
            max_output_tokens: 2048,
        }
    }
}

/// Household water-use rates for expressing footprints in everyday units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionRates {
    pub drinking_liters_per_day: f64,
    pub shower_liters_per_minute: f64,
    pub toilet_flush_liters: f64,
    pub dishwasher_cycle_liters: f64,
    pub washing_machine_cycle_liters: f64,
}

impl Default for ConversionRates {
    fn default() -> Self {
        Self {
            drinking_liters_per_day: 3.0,
            shower_liters_per_minute: 9.5,
            toilet_flush_liters: 6.0,
            dishwasher_cycle_liters: 15.0,
            washing_machine_cycle_liters: 50.0,
        }
    }
}

impl ConversionRates {
    /// Every rate must be a positive, finite divisor
    pub fn validate(&self) -> Result<()> {
        let rates = [
            ("drinking_liters_per_day", self.drinking_liters_per_day),
            ("shower_liters_per_minute", self.shower_liters_per_minute),
            ("toilet_flush_liters", self.toilet_flush_liters),
            ("dishwasher_cycle_liters", self.dishwasher_cycle_liters),
            (
                "washing_machine_cycle_liters",
                self.washing_machine_cycle_liters,
            ),
        ];
        for (name, value) in rates {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::Config(format!(
                    "rates.{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Fully resolved application configuration
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    #[serde(skip)]
    pub api_key: Option<String>,
    pub model: ModelConfig,
    pub max_image_size_mb: u64,
    pub rates: ConversionRates,
    /// Override file that was applied, if any
    pub config_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: ModelConfig::default(),
            max_image_size_mb: 10,
            rates: ConversionRates::default(),
            config_path: None,
        }
    }
}

impl AppConfig {
    /// Load config from files and the process environment
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::from_toml(DEFAULT_CONFIG)?;

        let path = match override_path {
            Some(p) if !p.exists() => {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )))
            }
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };

        if let Some(path) = path {
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;
            config.apply_toml(&content)?;
            config.config_path = Some(path);
        }

        config.apply_env(|key| std::env::var(key).ok())?;
        config.rates.validate()?;
        Ok(config)
    }

    /// Parse a complete config on top of the built-in defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config = Self::default();
        config.apply_toml(content)?;
        config.rates.validate()?;
        Ok(config)
    }

    fn apply_toml(&mut self, content: &str) -> Result<()> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

        if let Some(model) = raw.model {
            if let Some(backend) = model.backend {
                self.model.backend = backend;
            }
            if let Some(name) = model.name {
                self.model.name = name;
            }
            if let Some(host) = model.host {
                self.model.host = host.trim_end_matches('/').to_string();
            }
            if let Some(secs) = model.timeout_secs {
                self.model.timeout = Duration::from_secs(secs);
            }
            if let Some(t) = model.temperature {
                self.model.temperature = t;
            }
            if let Some(p) = model.top_p {
                self.model.top_p = p;
            }
            if let Some(k) = model.top_k {
                self.model.top_k = k;
            }
            if let Some(n) = model.max_output_tokens {
                self.model.max_output_tokens = n;
            }
        }

        if let Some(limits) = raw.limits {
            if let Some(mb) = limits.max_image_size_mb {
                self.max_image_size_mb = mb;
            }
        }

        if let Some(rates) = raw.rates {
            let r = &mut self.rates;
            if let Some(v) = rates.drinking_liters_per_day {
                r.drinking_liters_per_day = v;
            }
            if let Some(v) = rates.shower_liters_per_minute {
                r.shower_liters_per_minute = v;
            }
            if let Some(v) = rates.toilet_flush_liters {
                r.toilet_flush_liters = v;
            }
            if let Some(v) = rates.dishwasher_cycle_liters {
                r.dishwasher_cycle_liters = v;
            }
            if let Some(v) = rates.washing_machine_cycle_liters {
                r.washing_machine_cycle_liters = v;
            }
        }

        Ok(())
    }

    /// Apply environment overrides from `lookup`
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(backend) = lookup("AI_BACKEND").filter(|b| !b.is_empty()) {
            self.model.backend = backend.parse()?;
        }
        if let Some(key) = lookup("GEMINI_API_KEY").filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(model) = lookup("GEMINI_MODEL").filter(|m| !m.is_empty()) {
            self.model.name = model;
        }
        if let Some(host) = lookup("GEMINI_HOST").filter(|h| !h.is_empty()) {
            self.model.host = host.trim_end_matches('/').to_string();
        }
        if let Some(secs) = lookup("API_TIMEOUT_SECONDS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                Error::Config(format!("API_TIMEOUT_SECONDS must be an integer, got {}", secs))
            })?;
            self.model.timeout = Duration::from_secs(secs);
        }
        if let Some(mb) = lookup("MAX_IMAGE_SIZE_MB") {
            self.max_image_size_mb = mb.trim().parse().map_err(|_| {
                Error::Config(format!("MAX_IMAGE_SIZE_MB must be an integer, got {}", mb))
            })?;
        }
        Ok(())
    }

    /// The API key, if it looks usable
    pub fn validate_api_key(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            None => Err(Error::Config(
                "GEMINI_API_KEY environment variable is not set.".into(),
            )),
            Some(key) if key.len() < MIN_API_KEY_LEN => Err(Error::Config(
                "GEMINI_API_KEY appears to be invalid (too short).".into(),
            )),
            Some(key) => Ok(key),
        }
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("blueprint").join("config.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    model: Option<RawModel>,
    limits: Option<RawLimits>,
    rates: Option<RawRates>,
}

#[derive(Debug, Deserialize)]
struct RawModel {
    backend: Option<BackendKind>,
    name: Option<String>,
    host: Option<String>,
    timeout_secs: Option<u64>,
    temperature: Option<f64>,
    top_p: Option<f64>,
    top_k: Option<u32>,
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawLimits {
    max_image_size_mb: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawRates {
    drinking_liters_per_day: Option<f64>,
    shower_liters_per_minute: Option<f64>,
    toilet_flush_liters: Option<f64>,
    dishwasher_cycle_liters: Option<f64>,
    washing_machine_cycle_liters: Option<f64>,
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    #[test]
    fn test_parse_default_config() {
        let config = AppConfig::from_toml(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.model.name, "gemini-2.5-flash");
        assert_eq!(config.model.timeout, Duration::from_secs(30));
        assert_eq!(config.model.top_k, 40);
        assert_eq!(config.max_image_size_mb, 10);
        assert_eq!(config.rates, ConversionRates::default());
    }

    #[test]
    fn test_partial_override() {
        let config = AppConfig::from_toml(
            r#"
[model]
name = "gemini-2.5-pro"

[rates]
shower_liters_per_minute = 12.0
"#,
        )
        .unwrap();
        assert_eq!(config.model.name, "gemini-2.5-pro");
        assert_eq!(config.model.max_output_tokens, 2048);
        assert_eq!(config.rates.shower_liters_per_minute, 12.0);
        assert_eq!(config.rates.drinking_liters_per_day, 3.0);
    }

    #[test]
    fn test_zero_rate_is_config_error() {
        let err = AppConfig::from_toml("[rates]\ntoilet_flush_liters = 0.0\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("toilet_flush_liters"));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(AppConfig::from_toml("[model\nname=").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("AI_BACKEND", "Mock"),
            ("GEMINI_API_KEY", "AIzaSyTestKey123"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
            ("GEMINI_HOST", "http://127.0.0.1:9999/"),
            ("API_TIMEOUT_SECONDS", "5"),
            ("MAX_IMAGE_SIZE_MB", "4"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_env(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.model.backend, BackendKind::Mock);
        assert_eq!(config.api_key.as_deref(), Some("AIzaSyTestKey123"));
        assert_eq!(config.model.name, "gemini-2.0-flash");
        assert_eq!(config.model.host, "http://127.0.0.1:9999");
        assert_eq!(config.model.timeout, Duration::from_secs(5));
        assert_eq!(config.max_image_size_mb, 4);
    }

    #[test]
    fn test_unknown_backend() {
        let err = "ollama".parse::<BackendKind>().unwrap_err();
        assert!(err.to_string().contains("ollama"));
    }

    #[test]
    fn test_bad_env_timeout() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(|k| (k == "API_TIMEOUT_SECONDS").then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_validate_api_key() {
        let mut config = AppConfig::default();
        assert!(config.validate_api_key().is_err());

        config.api_key = Some("short".to_string());
        assert!(config
            .validate_api_key()
            .unwrap_err()
            .to_string()
            .contains("too short"));

        config.api_key = Some("AIzaSyLongEnoughKey".to_string());
        assert_eq!(config.validate_api_key().unwrap(), "AIzaSyLongEnoughKey");
    }

    #[test]
    fn test_load_explicit_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[limits]\nmax_image_size_mb = 2").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.config_path.as_deref(), Some(file.path()));
        assert!(config.rates.validate().is_ok());
    }

    #[test]
    fn test_load_missing_override_file() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/blueprint.toml"))).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
