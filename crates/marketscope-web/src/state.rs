//! Application state.

use std::sync::Arc;

use marketscope_core::SimulationGenerator;
use marketscope_llm::{LlmAnalyzer, SynthesisMode, Synthesizer};
use marketscope_report::ReportGenerator;

use crate::error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub reports: Arc<ReportGenerator>,
    pub simulation: SimulationGenerator,
    pub backend: Option<LlmAnalyzer>,
    pub default_mode: SynthesisMode,
}

impl AppState {
    pub fn new(reports: ReportGenerator, simulation: SimulationGenerator) -> Self {
        Self {
            reports: Arc::new(reports),
            simulation,
            backend: None,
            default_mode: SynthesisMode::default(),
        }
    }

    pub fn with_backend(mut self, analyzer: LlmAnalyzer) -> Self {
        self.backend = Some(analyzer);
        self
    }

    pub fn with_default_mode(mut self, mode: SynthesisMode) -> Self {
        self.default_mode = mode;
        self
    }

    /// Synthesizer for one request; `None` uses the server default.
    pub fn synthesizer(&self, mode: Option<SynthesisMode>) -> Result<Synthesizer, ApiError> {
        match mode.unwrap_or(self.default_mode) {
            SynthesisMode::Simulation => Ok(Synthesizer::SimulationOnly(self.simulation.clone())),
            SynthesisMode::Backend => self
                .backend
                .clone()
                .map(Synthesizer::BackendDriven)
                .ok_or_else(|| {
                    ApiError::bad_request(
                        "Backend mode unavailable",
                        "No generation backend is configured on this server",
                    )
                }),
        }
    }
}
