//! Game configuration loaded from TOML.

use crate::llm_client::{LlmConfig, LlmProvider};
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use strictly_four_rules::{DEFAULT_COLS, DEFAULT_ROWS};
use tracing::{debug, info, instrument};

/// Configuration for a game against the model.
///
/// Every field has a default, so an empty file is a valid config.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_", into)]
pub struct GameConfig {
    /// Board rows.
    #[serde(default = "default_rows")]
    rows: usize,

    /// Board columns.
    #[serde(default = "default_cols")]
    cols: usize,

    /// Pause before each model turn, in milliseconds.
    #[serde(default = "default_think_delay_ms")]
    think_delay_ms: u64,

    /// Longest wait for the model's answer, in milliseconds.
    #[serde(default = "default_proposer_timeout_ms")]
    proposer_timeout_ms: u64,

    /// LLM provider (gemini, openai or anthropic).
    #[serde(default = "default_provider")]
    llm_provider: LlmProvider,

    /// LLM model name (e.g., "gemini-2.5-flash", "gpt-4o-mini").
    #[serde(default = "default_model")]
    llm_model: String,

    /// Maximum tokens for LLM responses.
    #[serde(default = "default_max_tokens")]
    llm_max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    llm_temperature: f32,
}

fn default_rows() -> usize {
    DEFAULT_ROWS
}

fn default_cols() -> usize {
    DEFAULT_COLS
}

fn default_think_delay_ms() -> u64 {
    750
}

fn default_proposer_timeout_ms() -> u64 {
    30_000
}

fn default_provider() -> LlmProvider {
    LlmProvider::Gemini
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.9
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
            think_delay_ms: default_think_delay_ms(),
            proposer_timeout_ms: default_proposer_timeout_ms(),
            llm_provider: default_provider(),
            llm_model: default_model(),
            llm_max_tokens: default_max_tokens(),
            llm_temperature: default_temperature(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(
            rows = config.rows,
            cols = config.cols,
            provider = %config.llm_provider,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Pause before each model turn.
    pub fn think_delay(&self) -> Duration {
        Duration::from_millis(self.think_delay_ms)
    }

    /// Longest wait for the model's answer.
    pub fn proposer_timeout(&self) -> Duration {
        Duration::from_millis(self.proposer_timeout_ms)
    }

    /// Environment variables consulted for the provider's API key, in order.
    pub fn api_key_vars(&self) -> &'static [&'static str] {
        match self.llm_provider {
            LlmProvider::Gemini => &["GEMINI_API_KEY", "API_KEY"],
            LlmProvider::OpenAI => &["OPENAI_API_KEY"],
            LlmProvider::Anthropic => &["ANTHROPIC_API_KEY"],
        }
    }

    /// Creates LLM configuration from this config and the process environment.
    #[instrument(skip(self), fields(provider = ?self.llm_provider, model = %self.llm_model))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        self.create_llm_config_with(|var| std::env::var(var).ok())
    }

    /// Creates LLM configuration, looking API keys up through `lookup`.
    #[instrument(skip(self, lookup), fields(provider = ?self.llm_provider))]
    pub fn create_llm_config_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<LlmConfig, ConfigError> {
        debug!("Creating LLM config");

        let vars = self.api_key_vars();
        let api_key = vars
            .iter()
            .find_map(|var| lookup(var).filter(|value| !value.trim().is_empty()))
            .ok_or_else(|| {
                ConfigError::new(format!(
                    "No API key for {}: set {}",
                    self.llm_provider,
                    vars.join(" or ")
                ))
            })?;

        Ok(LlmConfig::new(
            self.llm_provider,
            api_key,
            self.llm_model.clone(),
            self.llm_max_tokens,
            self.llm_temperature,
        )
        .with_timeout(self.proposer_timeout()))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: GameConfig = toml::from_str("").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(*config.rows(), 6);
        assert_eq!(*config.cols(), 7);
        assert_eq!(config.think_delay(), Duration::from_millis(750));
        assert_eq!(config.proposer_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: GameConfig = toml::from_str(
            r#"
            cols = 9
            llm_provider = "anthropic"
            llm_model = "claude-3-5-haiku-20241022"
            "#,
        )
        .unwrap();
        assert_eq!(*config.cols(), 9);
        assert_eq!(*config.rows(), 6);
        assert_eq!(*config.llm_provider(), LlmProvider::Anthropic);
        assert_eq!(config.llm_model(), "claude-3-5-haiku-20241022");
    }

    #[test]
    fn test_setters_chain() {
        let config = GameConfig::default()
            .with_think_delay_ms(0u64)
            .with_llm_model("gpt-4o-mini");
        assert_eq!(config.think_delay(), Duration::ZERO);
        assert_eq!(config.llm_model(), "gpt-4o-mini");
    }

    #[test]
    fn test_gemini_key_falls_back_to_api_key() {
        let config = GameConfig::default();
        let llm = config
            .create_llm_config_with(|var| (var == "API_KEY").then(|| "secret".to_string()))
            .unwrap();
        assert_eq!(llm.api_key(), "secret");
        assert_eq!(llm.provider(), LlmProvider::Gemini);
        assert_eq!(llm.model(), "gemini-2.5-flash");
        assert_eq!(llm.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let config = GameConfig::default().with_llm_provider(LlmProvider::OpenAI);
        let err = config.create_llm_config_with(|_| None).unwrap_err();
        assert!(err.message.contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_blank_key_is_ignored() {
        let config = GameConfig::default();
        let result = config.create_llm_config_with(|var| {
            (var == "GEMINI_API_KEY").then(|| "  ".to_string())
        });
        assert!(result.is_err());
    }
}
