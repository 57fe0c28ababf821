//! Analyze and interpret commands

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use blueprint_core::{
    extract_structured, AIClient, AnalysisError, AnalysisResult, Analyzer, AppConfig,
    ConversionRates,
};
use serde::Serialize;
use tracing::{info, warn};

use super::report::{print_analysis_error, print_insights, print_result};
use super::{print_json, OutputOptions};
use crate::session::{Session, SessionInsights};

/// Per-input outcome in `--json` output
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum ItemReport {
    Ok {
        source: String,
        result: AnalysisResult,
    },
    Failed {
        source: String,
        error: AnalysisError,
    },
    Skipped {
        source: String,
        reason: String,
    },
}

#[derive(Debug, Serialize)]
struct SessionReport {
    items: Vec<ItemReport>,
    insights: SessionInsights,
}

/// Collects outcomes and prints them as they arrive (text) or at the end (JSON)
struct Reporter<'a> {
    opts: OutputOptions,
    rates: &'a ConversionRates,
    session: Session,
    items: Vec<ItemReport>,
}

impl<'a> Reporter<'a> {
    fn new(opts: OutputOptions, rates: &'a ConversionRates) -> Self {
        Self {
            opts,
            rates,
            session: Session::new(),
            items: Vec::new(),
        }
    }

    fn outcome(
        &mut self,
        source: &str,
        outcome: std::result::Result<AnalysisResult, AnalysisError>,
    ) {
        match outcome {
            Ok(result) => {
                if !self.opts.json {
                    print_result(source, &result, self.rates);
                }
                self.session.record(source, result.clone());
                self.items.push(ItemReport::Ok {
                    source: source.to_string(),
                    result,
                });
            }
            Err(error) => {
                if !self.opts.json {
                    print_analysis_error(source, &error, self.opts.verbose);
                }
                self.session.record_failure();
                self.items.push(ItemReport::Failed {
                    source: source.to_string(),
                    error,
                });
            }
        }
    }

    fn skipped(&mut self, source: &str, reason: String) {
        warn!(source, reason = %reason, "Skipping input");
        if !self.opts.json {
            println!();
            println!("❌ {}: {}", source, reason);
        }
        self.session.record_failure();
        self.items.push(ItemReport::Skipped {
            source: source.to_string(),
            reason,
        });
    }

    fn finish(self) -> Result<Session> {
        let insights = self.session.insights();
        if self.opts.json {
            print_json(&SessionReport {
                items: self.items,
                insights,
            })?;
        } else {
            print_insights(&insights);
        }

        if self.session.history().is_empty() {
            bail!(
                "No input could be analyzed ({} failed)",
                self.session.failures()
            );
        }
        Ok(self.session)
    }
}

fn source_name(path: &Path) -> String {
    path.display().to_string()
}

/// Analyze product photos in one session
pub async fn cmd_analyze(
    config: &AppConfig,
    images: &[PathBuf],
    opts: OutputOptions,
) -> Result<Session> {
    let client = AIClient::from_config(config)?;
    info!(model = %client.model(), host = %client.host(), "Using vision backend");
    let analyzer = Analyzer::new(client).with_size_limit(config.max_image_size_mb);
    cmd_analyze_with(&analyzer, &config.rates, images, opts).await
}

/// Analyze with an already constructed analyzer
pub async fn cmd_analyze_with(
    analyzer: &Analyzer,
    rates: &ConversionRates,
    images: &[PathBuf],
    opts: OutputOptions,
) -> Result<Session> {
    let mut reporter = Reporter::new(opts, rates);

    for path in images {
        let source = source_name(path);
        match analyzer.analyze_file(path).await {
            Ok(outcome) => reporter.outcome(&source, outcome),
            Err(e) => reporter.skipped(&source, e.to_string()),
        }
    }

    reporter.finish()
}

/// Interpret saved raw model responses offline
pub fn cmd_interpret(
    config: &AppConfig,
    files: &[PathBuf],
    opts: OutputOptions,
) -> Result<Session> {
    let mut reporter = Reporter::new(opts, &config.rates);

    for path in files {
        let source = source_name(path);
        match read_response(path) {
            Ok(text) => reporter.outcome(&source, extract_structured(&text)),
            Err(e) => reporter.skipped(&source, format!("{:#}", e)),
        }
    }

    reporter.finish()
}

fn read_response(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
