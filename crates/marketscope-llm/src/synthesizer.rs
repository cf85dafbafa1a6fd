//! Choice between simulation-only and backend-driven synthesis.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use marketscope_core::{AnalysisRequest, MarketAnalysisResult, SimulationGenerator};

use crate::adapter::LlmAnalyzer;
use crate::ollama::{OllamaClient, OllamaConfig};

/// Which synthesis path a request takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisMode {
    #[default]
    Simulation,
    Backend,
}

impl SynthesisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simulation => "simulation",
            Self::Backend => "backend",
        }
    }
}

impl fmt::Display for SynthesisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SynthesisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simulation" | "sim" => Ok(Self::Simulation),
            "backend" | "ollama" | "llm" => Ok(Self::Backend),
            other => Err(format!(
                "unknown synthesis mode '{}' (expected simulation or backend)",
                other
            )),
        }
    }
}

/// Produces one complete `MarketAnalysisResult` per request.
#[derive(Clone)]
pub enum Synthesizer {
    SimulationOnly(SimulationGenerator),
    BackendDriven(LlmAnalyzer),
}

impl Synthesizer {
    /// Backend-driven synthesizer over Ollama, checked once for readiness.
    pub async fn ollama(config: OllamaConfig, fallback: SimulationGenerator) -> Self {
        let analyzer = LlmAnalyzer::new(Arc::new(OllamaClient::new(config)), fallback);
        analyzer.check_readiness().await;
        Self::BackendDriven(analyzer)
    }

    pub fn mode(&self) -> SynthesisMode {
        match self {
            Self::SimulationOnly(_) => SynthesisMode::Simulation,
            Self::BackendDriven(_) => SynthesisMode::Backend,
        }
    }

    /// Analyse every product in request order, then summarize.
    pub async fn synthesize(&self, request: &AnalysisRequest) -> MarketAnalysisResult {
        info!(
            mode = %self.mode(),
            products = request.products().len(),
            sector = %request.sector(),
            "Synthesizing market analysis"
        );
        let today = chrono::Local::now().date_naive();

        match self {
            Self::SimulationOnly(generator) => generator.generate_result_on(request, today),
            Self::BackendDriven(analyzer) => analyzer.analyze(request, today).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::tests::ScriptedBackend;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("backend".parse::<SynthesisMode>(), Ok(SynthesisMode::Backend));
        assert_eq!(" Simulation ".parse::<SynthesisMode>(), Ok(SynthesisMode::Simulation));
        assert!("magic".parse::<SynthesisMode>().is_err());
        assert_eq!(SynthesisMode::default(), SynthesisMode::Simulation);
        assert_eq!(serde_json::to_string(&SynthesisMode::Backend).unwrap(), "\"backend\"");
    }

    #[tokio::test]
    async fn test_simulation_scenario() {
        let synthesizer = Synthesizer::SimulationOnly(SimulationGenerator::default());
        let request = AnalysisRequest::new(["Alpha", "Beta"], "Test").unwrap();
        let result = synthesizer.synthesize(&request).await;

        let names: Vec<_> = result.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Beta"]);
        assert_eq!(result.validate(), Ok(()));
        assert!(result.date().is_ok());
    }

    #[tokio::test]
    async fn test_backend_driven_with_dead_backend_matches_simulation() {
        let backend = Arc::new(ScriptedBackend::failing());
        let analyzer = LlmAnalyzer::new(backend, SimulationGenerator::default());
        let synthesizer = Synthesizer::BackendDriven(analyzer);
        assert_eq!(synthesizer.mode(), SynthesisMode::Backend);

        let request = AnalysisRequest::new(["Alpha", "Beta", "Gamma"], "Test").unwrap();
        let result = synthesizer.synthesize(&request).await;
        let expected = Synthesizer::SimulationOnly(SimulationGenerator::default())
            .synthesize(&request)
            .await;

        assert_eq!(result.products, expected.products);
        assert_eq!(result.summary, expected.summary);
        assert_eq!(result.recommendations, expected.recommendations);
        assert_eq!(result.validate(), Ok(()));
    }

    #[tokio::test]
    async fn test_ollama_synthesizer_survives_unreachable_host() {
        let config = OllamaConfig {
            host: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..OllamaConfig::default()
        };
        let synthesizer = Synthesizer::ollama(config, SimulationGenerator::default()).await;
        let request = AnalysisRequest::new(["Alpha", "Beta"], "Test").unwrap();
        let result = synthesizer.synthesize(&request).await;
        assert_eq!(result.products[0], SimulationGenerator::default().generate("Alpha", "Test"));
        assert_eq!(result.validate(), Ok(()));
    }
}
