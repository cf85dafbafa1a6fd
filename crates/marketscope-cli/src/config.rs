//! Application configuration.
//!
//! Read from an optional TOML file, then `OLLAMA_URL` / `OLLAMA_MODEL`, then
//! command-line flags, each layer overriding the previous one.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use marketscope_llm::{OllamaConfig, SynthesisMode};

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "marketscope.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub reports_dir: PathBuf,
    pub mode: SynthesisMode,
    pub server: ServerConfig,
    pub ollama: OllamaConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from("reports"),
            mode: SynthesisMode::default(),
            server: ServerConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, or from `marketscope.toml` when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)?
                } else {
                    debug!("No configuration file, using defaults");
                    Self::default()
                }
            }
        };

        let config = Self {
            ollama: config.ollama.with_env_overrides(),
            ..config
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.ollama.validate().context("Invalid [ollama] configuration")?;
        if self.server.host.trim().is_empty() {
            anyhow::bail!("server.host cannot be empty");
        }
        Ok(())
    }

    /// Apply command-line overrides.
    pub fn with_reports_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.reports_dir = dir;
        }
        self
    }
}
