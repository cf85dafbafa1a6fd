//! Ollama HTTP client for text generation.
//!
//! Generation goes through `/api/generate` with streaming disabled, and
//! capability queries through `/api/tags`. Every call is a single attempt
//! bounded by a timeout; recovery is left to the caller.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{BackendError, ConfigError};

/// Default Ollama API URL.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default generation model.
pub const DEFAULT_MODEL: &str = "gemma3:4b";

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);
const LIST_TIMEOUT: Duration = Duration::from_secs(10);

/// Generation backend settings. Every field is forwarded to Ollama as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub host: String,
    pub model: String,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub repeat_penalty: f64,
    /// Maximum output length in tokens.
    pub num_predict: Option<u32>,
    /// Context window in tokens.
    pub num_ctx: u32,
    pub seed: Option<u64>,
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            top_p: 0.9,
            top_k: 40,
            repeat_penalty: 1.1,
            num_predict: Some(2000),
            num_ctx: 4096,
            seed: None,
            timeout_secs: 120,
        }
    }
}

impl OllamaConfig {
    /// Apply `OLLAMA_URL` and `OLLAMA_MODEL` when set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("OLLAMA_URL") {
            if !url.trim().is_empty() {
                self.host = url;
            }
        }
        if let Ok(model) = std::env::var("OLLAMA_MODEL") {
            if !model.trim().is_empty() {
                self.model = model;
            }
        }
        self
    }

    /// Check each field against its own range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.host.starts_with("http://") || self.host.starts_with("https://")) {
            return Err(ConfigError::new(
                "host",
                format!("must be an http(s) URL, got '{}'", self.host),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::new("model", "cannot be empty"));
        }
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(ConfigError::new("temperature", "must be >= 0"));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(ConfigError::new("top_p", "must be between 0 and 1"));
        }
        if self.top_k == 0 {
            return Err(ConfigError::new("top_k", "must be positive"));
        }
        if !self.repeat_penalty.is_finite() || self.repeat_penalty <= 0.0 {
            return Err(ConfigError::new("repeat_penalty", "must be positive"));
        }
        if self.num_predict == Some(0) {
            return Err(ConfigError::new("num_predict", "must be positive"));
        }
        if self.num_ctx == 0 {
            return Err(ConfigError::new("num_ctx", "must be positive"));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::new("timeout_secs", "must be positive"));
        }
        Ok(())
    }

    fn options(&self) -> GenerateOptions {
        GenerateOptions {
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
            repeat_penalty: self.repeat_penalty,
            num_ctx: self.num_ctx,
            num_predict: self.num_predict,
            seed: self.seed,
        }
    }
}

/// What the backend can currently do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendStatus {
    pub reachable: bool,
    pub model: String,
    pub model_available: bool,
    pub models: Vec<String>,
}

impl BackendStatus {
    /// Status of a backend that could not be queried.
    pub fn unreachable(model: &str) -> Self {
        Self {
            reachable: false,
            model: model.to_string(),
            model_available: false,
            models: Vec::new(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.reachable && self.model_available
    }
}

/// A backend able to turn a prompt into free-form text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Single non-streaming completion.
    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, BackendError>;

    /// Capability report; never fails.
    async fn status(&self) -> BackendStatus;
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f64,
    top_p: f64,
    top_k: u32,
    repeat_penalty: f64,
    num_ctx: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Deserialize)]
struct TagModel {
    name: String,
}

/// Ollama generation client.
#[derive(Clone)]
pub struct OllamaClient {
    config: OllamaConfig,
    base_url: String,
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Self {
        let client = reqwest::Client::builder().build().unwrap_or_default();
        info!(model = %config.model, host = %config.host, "Ollama client initialized");

        Self {
            base_url: config.host.trim_end_matches('/').to_string(),
            config,
            client,
        }
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    /// Whether `/api/tags` answers with a success status.
    pub async fn check_connection(&self) -> bool {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(CONNECTION_TIMEOUT)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!(status = %resp.status(), "Ollama answered with an error status");
                false
            }
            Err(e) => {
                warn!(error = %e, "Cannot connect to Ollama");
                false
            }
        }
    }

    /// Installed model names, empty when the backend cannot be queried.
    pub async fn list_models(&self) -> Vec<String> {
        match self.fetch_models().await {
            Ok(models) => models,
            Err(e) => {
                warn!(error = %e, "Cannot list Ollama models");
                Vec::new()
            }
        }
    }

    /// Whether the configured model is installed.
    pub async fn check_model_exists(&self) -> bool {
        let models = self.list_models().await;
        has_model(&models, &self.config.model)
    }

    async fn fetch_models(&self) -> Result<Vec<String>, BackendError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(LIST_TIMEOUT)
            .send()
            .await
            .map_err(|e| BackendError::from_reqwest(e, &url, LIST_TIMEOUT.as_secs()))?;

        if !response.status().is_success() {
            let code = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { code, body });
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

/// Ollama reports untagged models with an implicit `:latest` suffix.
fn has_model(models: &[String], model: &str) -> bool {
    models
        .iter()
        .any(|m| m == model || m.strip_suffix(":latest") == Some(model))
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, BackendError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            system,
            stream: false,
            options: self.config.options(),
        };

        debug!(
            model = %self.config.model,
            prompt_chars = prompt.len(),
            "Sending generation request"
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .send()
            .await
            .map_err(|e| BackendError::from_reqwest(e, &url, self.config.timeout_secs))?;

        if !response.status().is_success() {
            let code = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { code, body });
        }

        let result: GenerateResponse = response
            .json()
            .await
            .map_err(|e| BackendError::from_reqwest(e, &url, self.config.timeout_secs))?;

        debug!(response_chars = result.response.len(), "Generation complete");

        Ok(result.response)
    }

    async fn status(&self) -> BackendStatus {
        match self.fetch_models().await {
            Ok(models) => BackendStatus {
                reachable: true,
                model: self.config.model.clone(),
                model_available: has_model(&models, &self.config.model),
                models,
            },
            Err(e) => {
                debug!(error = %e, "Ollama status query failed");
                BackendStatus::unreachable(&self.config.model)
            }
        }
    }
}
