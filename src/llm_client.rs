//! LLM API client abstraction for Gemini, OpenAI and Anthropic.

use async_openai::{
    Client as OpenAIClient,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
    },
};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, instrument};

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const ANTHROPIC_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Per-request HTTP timeout used unless the config says otherwise.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// LLM provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Google Gemini.
    Gemini,
    /// OpenAI (GPT models).
    OpenAI,
    /// Anthropic (Claude models).
    Anthropic,
}

/// Configuration for LLM client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    provider: LlmProvider,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    timeout: Duration,
}

impl LlmConfig {
    /// Creates a new LLM configuration with the default request timeout.
    #[instrument(skip(api_key), fields(provider = ?provider, model = %model))]
    pub fn new(
        provider: LlmProvider,
        api_key: String,
        model: String,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        debug!("Creating LLM config");
        Self {
            provider,
            api_key,
            model,
            max_tokens,
            temperature,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Sets the per-request HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Gets the provider.
    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    /// Gets the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Gets the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Gets the max tokens.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Gets the sampling temperature.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Gets the per-request HTTP timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Wraps a lower-level failure with what was being attempted.
#[track_caller]
fn failure(context: &str, cause: impl std::fmt::Display) -> LlmError {
    LlmError::new(format!("{}: {}", context, cause))
}

/// Pulls the completion text out of a provider's JSON reply.
fn text_at(
    reply: &serde_json::Value,
    pointer: &str,
    provider: LlmProvider,
) -> Result<String, LlmError> {
    match reply.pointer(pointer).and_then(serde_json::Value::as_str) {
        Some(text) => Ok(text.to_string()),
        None => {
            error!(%provider, response = %reply, "Reply has no text content");
            Err(LlmError::new(format!("No text content in {} response", provider)))
        }
    }
}

/// LLM client that abstracts over multiple providers.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl LlmClient {
    /// Creates a client whose requests give up after the configured timeout.
    #[instrument(
        skip(config),
        fields(provider = ?config.provider(), timeout_ms = config.timeout().as_millis() as u64)
    )]
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| failure("Failed to build HTTP client", e))?;
        info!("Creating LLM client");
        Ok(Self { config, http })
    }

    /// Returns the configuration this client was built with.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Generates a completion from a system prompt and user message.
    #[instrument(
        skip(self, system_prompt, user_message),
        fields(provider = ?self.config.provider, model = %self.config.model)
    )]
    pub async fn generate(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        let text = match self.config.provider {
            LlmProvider::Gemini => self.generate_gemini(system_prompt, user_message).await,
            LlmProvider::OpenAI => self.generate_openai(system_prompt, user_message).await,
            LlmProvider::Anthropic => self.generate_anthropic(system_prompt, user_message).await,
        }?;
        info!(content_length = text.len(), "Generated completion");
        Ok(text)
    }

    /// Posts a JSON body and returns the parsed JSON reply.
    async fn post_json(
        &self,
        request: reqwest::RequestBuilder,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, LlmError> {
        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| failure("API request failed", e))?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| failure("Failed to read response", e))?;

        if !status.is_success() {
            return Err(failure(&format!("API error {}", status), raw));
        }

        debug!(response_length = raw.len(), "Parsing response");
        serde_json::from_str(&raw).map_err(|e| failure("Failed to parse response", e))
    }

    /// Gemini `generateContent`, constrained to a `{"column": int}` object.
    #[instrument(skip_all)]
    async fn generate_gemini(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        let body = serde_json::json!({
            "systemInstruction": { "parts": [{ "text": system_prompt }] },
            "contents": [{ "role": "user", "parts": [{ "text": user_message }] }],
            "generationConfig": {
                "temperature": self.config.temperature,
                "maxOutputTokens": self.config.max_tokens,
                "responseMimeType": "application/json",
                "responseSchema": column_schema()
            }
        });

        let url = format!("{}/{}:generateContent", GEMINI_ENDPOINT, self.config.model);
        let request = self.http.post(url).header("x-goog-api-key", &self.config.api_key);
        let reply = self.post_json(request, &body).await?;
        text_at(&reply, "/candidates/0/content/parts/0/text", LlmProvider::Gemini)
    }

    /// Anthropic Messages API.
    #[instrument(skip_all)]
    async fn generate_anthropic(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        let body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": system_prompt,
            "messages": [{ "role": "user", "content": user_message }]
        });

        let request = self
            .http
            .post(ANTHROPIC_ENDPOINT)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION);
        let reply = self.post_json(request, &body).await?;
        text_at(&reply, "/content/0/text", LlmProvider::Anthropic)
    }

    /// OpenAI chat completions in JSON mode, over this client's HTTP stack.
    #[instrument(skip_all)]
    async fn generate_openai(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        let client = OpenAIClient::with_config(
            OpenAIConfig::new().with_api_key(self.config.api_key.clone()),
        )
        .with_http_client(self.http.clone());

        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(system_prompt)
            .build()
            .map_err(|e| failure("Failed to build system message", e))?;
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(|e| failure("Failed to build user message", e))?;
        let messages = vec![
            ChatCompletionRequestMessage::System(system),
            ChatCompletionRequestMessage::User(user),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .messages(messages)
            .max_completion_tokens(self.config.max_tokens)
            .temperature(self.config.temperature)
            .response_format(ResponseFormat::JsonObject)
            .build()
            .map_err(|e| failure("Failed to build request", e))?;

        let response = client
            .chat()
            .create(request)
            .await
            .map_err(|e| failure("OpenAI API error", e))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                LlmError::new(format!("No text content in {} response", LlmProvider::OpenAI))
            })
    }
}

/// Response schema asking Gemini for exactly one integer column.
fn column_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": { "column": { "type": "INTEGER" } },
        "required": ["column"]
    })
}

/// LLM client error.
#[derive(Debug, Clone, Display, Error)]
#[display("LLM error: {} at {}:{}", message, file, line)]
pub struct LlmError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LlmError {
    /// Creates a new LLM error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        error!(error_message = %message, "LLM error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
