//! Tests for loading game configuration from disk.

use std::io::Write;
use std::time::Duration;
use strictly_four::{FirstOpenColumn, GameConfig, LlmProvider, TurnController};

#[test]
fn test_load_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
rows = 7
cols = 8
think_delay_ms = 0
proposer_timeout_ms = 1500
llm_provider = "openai"
llm_model = "gpt-4o-mini"
llm_max_tokens = 64
"#
    )
    .unwrap();

    let config = GameConfig::from_file(file.path()).unwrap();
    assert_eq!(*config.rows(), 7);
    assert_eq!(*config.cols(), 8);
    assert_eq!(config.think_delay(), Duration::ZERO);
    assert_eq!(config.proposer_timeout(), Duration::from_millis(1500));
    assert_eq!(*config.llm_provider(), LlmProvider::OpenAI);
    assert_eq!(config.llm_model(), "gpt-4o-mini");
    assert_eq!(*config.llm_max_tokens(), 64);
    assert_eq!(*config.llm_temperature(), 0.9);
}

#[test]
fn test_loaded_dimensions_build_a_controller() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "rows = 5\ncols = 5").unwrap();

    let config = GameConfig::from_file(file.path()).unwrap();
    let controller =
        TurnController::new(*config.rows(), *config.cols(), FirstOpenColumn::default()).unwrap();
    assert_eq!(controller.state().board().rows(), 5);
    assert_eq!(controller.state().board().cols(), 5);
}

#[test]
fn test_undersized_board_is_rejected_by_controller() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "rows = 3").unwrap();

    let config = GameConfig::from_file(file.path()).unwrap();
    let controller =
        TurnController::new(*config.rows(), *config.cols(), FirstOpenColumn::default());
    assert!(controller.is_err());
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = GameConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(err.message.contains("Failed to read config file"));
}

#[test]
fn test_malformed_file_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "llm_provider = \"mistral\"").unwrap();

    let err = GameConfig::from_file(file.path()).unwrap_err();
    assert!(err.message.contains("Failed to parse config"));
}
