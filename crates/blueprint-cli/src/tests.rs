//! CLI command tests

use std::fs;
use std::path::PathBuf;

use blueprint_core::test_utils::{MockGeminiServer, MockReply};
use blueprint_core::{AIClient, AppConfig, Analyzer, BackendKind, MockBackend};
use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::{self, OutputOptions};
use crate::session::Session;

const SHIRT_RESPONSE: &str = r#"Here is the analysis:
```json
{
  "product_name": "Cotton T-shirt",
  "product_category": "Textiles",
  "total_liters": 2700,
  "carbon_kg": 7.0,
  "breakdown": {"green_water_pct": 54, "blue_water_pct": 33, "grey_water_pct": 13},
  "sustainable_swap": {
    "product_name": "Secondhand T-shirt",
    "water_liters": 500,
    "carbon_kg": 1.0,
    "savings_liters": 2200,
    "savings_percentage": 81.5,
    "reasoning": "No new cotton"
  },
  "confidence_score": 0.9
}
```"#;

const QUIET: OutputOptions = OutputOptions {
    json: false,
    verbose: false,
};

fn mock_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.model.backend = BackendKind::Mock;
    config
}

fn gemini_config(url: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.api_key = Some("AIzaSyTestKey123".to_string());
    config.model.host = url.to_string();
    config
}

fn write_file(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

// ========== Argument Parsing ==========

#[test]
fn test_parse_analyze_with_global_flags() {
    let cli =
        Cli::try_parse_from(["blueprint", "analyze", "a.jpg", "b.png", "--json", "-v"]).unwrap();
    assert!(cli.json);
    assert!(cli.verbose);
    match cli.command {
        Commands::Analyze { images } => assert_eq!(images.len(), 2),
        _ => panic!("expected analyze"),
    }
}

#[test]
fn test_parse_analyze_requires_images() {
    assert!(Cli::try_parse_from(["blueprint", "analyze"]).is_err());
}

#[test]
fn test_parse_compare() {
    let cli = Cli::try_parse_from([
        "blueprint",
        "--config",
        "x.toml",
        "compare",
        "--liters",
        "2700",
    ])
    .unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    assert!(matches!(cli.command, Commands::Compare { liters } if liters == 2700.0));
}

// ========== Interpret Command ==========

#[test]
fn test_cmd_interpret_builds_session() {
    let dir = tempfile::tempdir().unwrap();
    let files = vec![
        write_file(&dir, "one.txt", SHIRT_RESPONSE.as_bytes()),
        write_file(&dir, "two.txt", SHIRT_RESPONSE.as_bytes()),
    ];

    let session = commands::cmd_interpret(&mock_config(), &files, QUIET).unwrap();
    let insights = session.insights();
    assert_eq!(insights.items, 2);
    assert_eq!(insights.total_water, 5_400.0);
    assert_eq!(insights.total_carbon, 14.0);
    assert_eq!(insights.failures, 0);
}

#[test]
fn test_cmd_interpret_counts_failures() {
    let dir = tempfile::tempdir().unwrap();
    let files = vec![
        write_file(&dir, "good.txt", SHIRT_RESPONSE.as_bytes()),
        write_file(&dir, "prose.txt", b"I cannot tell what this is."),
        dir.path().join("missing.txt"),
    ];

    let json = OutputOptions {
        json: true,
        verbose: false,
    };
    let session = commands::cmd_interpret(&mock_config(), &files, json).unwrap();
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.failures(), 2);
}

#[test]
fn test_cmd_interpret_all_failed_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let files = vec![write_file(&dir, "empty.txt", b"   ")];
    assert!(commands::cmd_interpret(&mock_config(), &files, QUIET).is_err());
}

// ========== Analyze Command ==========

#[tokio::test]
async fn test_cmd_analyze_with_mock_backend() {
    let dir = tempfile::tempdir().unwrap();
    let images = vec![
        write_file(&dir, "a.jpg", b"\xFF\xD8\xFFjpeg"),
        write_file(&dir, "b.png", b"\x89PNG\r\n\x1a\npng"),
    ];

    let session = commands::cmd_analyze(&mock_config(), &images, QUIET)
        .await
        .unwrap();
    let insights = session.insights();
    assert_eq!(insights.entries.len(), 2);
    assert_eq!(insights.entries[1].source, images[1].display().to_string());
    assert!(insights.entries[0].analyzed_at >= insights.started_at);
}

#[tokio::test]
async fn test_session_json_lists_entry_sources_and_times() {
    let dir = tempfile::tempdir().unwrap();
    let images = vec![write_file(&dir, "a.jpg", b"\xFF\xD8\xFFjpeg")];

    let session = commands::cmd_analyze(&mock_config(), &images, QUIET)
        .await
        .unwrap();
    let json = serde_json::to_value(session.insights()).unwrap();
    let entry = &json["entries"][0];
    assert_eq!(entry["source"], images[0].display().to_string());
    assert!(entry["analyzed_at"].is_string());
    assert!(entry.get("result").is_none());
}

#[tokio::test]
async fn test_cmd_analyze_against_gemini_server() {
    let server = MockGeminiServer::start(MockReply::Text(SHIRT_RESPONSE.to_string())).await;
    let dir = tempfile::tempdir().unwrap();
    let images = vec![write_file(&dir, "shirt.jpg", b"\xFF\xD8\xFFjpeg")];

    let session = commands::cmd_analyze(&gemini_config(&server.url()), &images, QUIET)
        .await
        .unwrap();
    assert_eq!(session.history()[0].product_name, "Cotton T-shirt");
    assert_eq!(server.last_api_key().as_deref(), Some("AIzaSyTestKey123"));
}

#[tokio::test]
async fn test_cmd_analyze_auth_failure_is_error() {
    let server = MockGeminiServer::start(MockReply::Status(
        401,
        r#"{"error":{"code":401,"status":"UNAUTHENTICATED"}}"#.to_string(),
    ))
    .await;
    let dir = tempfile::tempdir().unwrap();
    let images = vec![write_file(&dir, "shirt.jpg", b"\xFF\xD8\xFFjpeg")];

    let verbose = OutputOptions {
        json: false,
        verbose: true,
    };
    let result = commands::cmd_analyze(&gemini_config(&server.url()), &images, verbose).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_cmd_analyze_without_api_key_fails_early() {
    let dir = tempfile::tempdir().unwrap();
    let images = vec![write_file(&dir, "shirt.jpg", b"\xFF\xD8\xFFjpeg")];
    let err = commands::cmd_analyze(&AppConfig::default(), &images, QUIET)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("GEMINI_API_KEY"));
}

#[tokio::test]
async fn test_cmd_analyze_skips_oversized_image() {
    let dir = tempfile::tempdir().unwrap();
    let images = vec![
        write_file(&dir, "big.jpg", &vec![0u8; 1024 * 1024 + 1]),
        write_file(&dir, "ok.jpg", b"\xFF\xD8\xFF"),
    ];
    let analyzer = Analyzer::new(AIClient::Mock(MockBackend::new())).with_size_limit(1);

    let session = commands::cmd_analyze_with(&analyzer, &mock_config().rates, &images, QUIET)
        .await
        .unwrap();
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.failures(), 1);
}

// ========== Compare Command ==========

#[test]
fn test_compare_report() {
    let report = commands::compare_report(&mock_config(), 2_700.0).unwrap();
    assert_eq!(report.metrics.daily_drinking_equivalent, 900.0);
    assert_eq!(report.relatable, "2.5 years of drinking water");
    assert_eq!(report.impact_level, "Moderate");
}

#[test]
fn test_compare_rejects_negative() {
    assert!(commands::compare_report(&mock_config(), -1.0).is_err());
    assert!(commands::compare_report(&mock_config(), f64::NAN).is_err());
    assert!(commands::cmd_compare(&mock_config(), 0.0, QUIET).is_ok());
}

// ========== Check Command ==========

#[test]
fn test_mask_key() {
    assert_eq!(commands::mask_key("AIzaSyTestKey123"), "AIza...y123");
    assert_eq!(commands::mask_key("short"), "*****");
}

#[tokio::test]
async fn test_cmd_check_mock_backend() {
    assert!(commands::cmd_check(&mock_config(), QUIET).await.is_ok());
}

#[tokio::test]
async fn test_cmd_check_unhealthy_gemini() {
    let server = MockGeminiServer::start(MockReply::Status(404, "not found".into())).await;
    assert!(commands::cmd_check(&gemini_config(&server.url()), QUIET)
        .await
        .is_err());
}

// ========== Session ==========

#[test]
fn test_session_milestone_needs_three_items() {
    let dir = tempfile::tempdir().unwrap();
    let files = vec![write_file(&dir, "a.txt", SHIRT_RESPONSE.as_bytes())];
    let mut session: Session = commands::cmd_interpret(&mock_config(), &files, QUIET).unwrap();
    assert!(session.insights().milestone.is_none());

    let result = session.history()[0].clone();
    session.record("b", result.clone());
    session.record("c", result);

    let insights = session.insights();
    assert_eq!(insights.items, 3);
    let milestone = insights.milestone.unwrap();
    assert_eq!(milestone.current, "Starter");
    assert_eq!(milestone.next.unwrap().remaining, 10_000.0 - 8_100.0);
    assert_eq!(insights.challenge.title, "Secondhand Hero");
}
