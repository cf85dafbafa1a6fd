//! # Marketscope LLM
//!
//! Ollama generation backend and the adapter that turns its free-form output
//! into market analyses, falling back to the deterministic simulation
//! whenever the backend cannot deliver.

pub mod adapter;
pub mod error;
pub mod ollama;
pub mod prompt;
pub mod response;
pub mod synthesizer;

pub use adapter::LlmAnalyzer;
pub use error::{BackendError, ConfigError, ResponseError};
pub use ollama::{BackendStatus, OllamaClient, OllamaConfig, TextGenerator};
pub use synthesizer::{SynthesisMode, Synthesizer};
