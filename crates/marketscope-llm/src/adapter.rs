//! Backend-driven analysis with per-call fallback to the simulation.
//!
//! Each call makes exactly one backend attempt. When the attempt fails or its
//! output cannot be used, the simulation generator answers instead and the
//! reason is logged; callers never see a backend failure.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use marketscope_core::analysis::model::ANALYSIS_DATE_FORMAT;
use marketscope_core::{AnalysisRequest, MarketAnalysisResult, ProductAnalysis, SimulationGenerator};

use crate::ollama::{BackendStatus, TextGenerator};
use crate::prompt::{self, SYSTEM_PROMPT};
use crate::response;

/// Prompt/response adapter over a [`TextGenerator`].
#[derive(Clone)]
pub struct LlmAnalyzer {
    backend: Arc<dyn TextGenerator>,
    fallback: SimulationGenerator,
}

impl LlmAnalyzer {
    pub fn new(backend: Arc<dyn TextGenerator>, fallback: SimulationGenerator) -> Self {
        Self { backend, fallback }
    }

    /// Current capabilities of the backend.
    pub async fn status(&self) -> BackendStatus {
        self.backend.status().await
    }

    /// Check the backend once and warn when it cannot serve requests.
    pub async fn check_readiness(&self) -> BackendStatus {
        let status = self.status().await;
        if !status.reachable {
            warn!(
                model = %status.model,
                "Generation backend unreachable, every call will use the simulation"
            );
        } else if !status.model_available {
            warn!(
                model = %status.model,
                installed = ?status.models,
                "Model not installed on the generation backend, calls use the simulation"
            );
        } else {
            info!(model = %status.model, "Generation backend ready");
        }
        status
    }

    /// Analysis of one product, falling back to the simulation on any failure.
    pub async fn analyze_product(&self, product: &str, sector: &str) -> ProductAnalysis {
        let prompt = prompt::product_prompt(product, sector);

        let raw = match self.backend.generate(&prompt, Some(SYSTEM_PROMPT)).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(product, error = %e, "Backend call failed, using simulation");
                return self.fallback.generate(product, sector);
            }
        };

        match response::coerce_product(&raw, product, sector) {
            Ok(analysis) => match analysis.validate_lenient() {
                Ok(()) => {
                    info!(product, "Product analysed by backend");
                    analysis
                }
                Err(e) => {
                    warn!(product, error = %e, "Backend analysis out of schema, using simulation");
                    self.fallback.generate(product, sector)
                }
            },
            Err(e) => {
                warn!(product, error = %e, "Unusable backend response, using simulation");
                self.fallback.generate(product, sector)
            }
        }
    }

    /// Executive summary for the analysed products.
    pub async fn build_summary(&self, results: &[ProductAnalysis], sector: &str) -> String {
        let prompt = prompt::summary_prompt(results, sector);

        match self.backend.generate(&prompt, Some(SYSTEM_PROMPT)).await {
            Ok(raw) => {
                let summary = response::clean_summary(&raw);
                if summary.is_empty() {
                    warn!(sector, "Empty backend summary, using simulation");
                    self.fallback.summary(results, sector)
                } else {
                    summary
                }
            }
            Err(e) => {
                warn!(sector, error = %e, "Summary generation failed, using simulation");
                self.fallback.summary(results, sector)
            }
        }
    }

    /// Exactly six distinct recommendations.
    pub async fn build_recommendations(
        &self,
        results: &[ProductAnalysis],
        sector: &str,
    ) -> Vec<String> {
        let prompt = prompt::recommendations_prompt(results, sector);

        let parsed = match self.backend.generate(&prompt, Some(SYSTEM_PROMPT)).await {
            Ok(raw) => response::parse_recommendations(&raw).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match parsed {
            Ok(recommendations) => recommendations,
            Err(reason) => {
                warn!(
                    sector,
                    error = %reason,
                    "Recommendations unavailable from backend, using simulation"
                );
                self.fallback.recommendations(sector)
            }
        }
    }

    /// Full result for a validated request, products analysed in order.
    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
        date: NaiveDate,
    ) -> MarketAnalysisResult {
        let sector = request.sector();
        let total = request.products().len();

        let mut products = Vec::with_capacity(total);
        for (i, name) in request.products().iter().enumerate() {
            info!(product = %name, index = i + 1, total, "Analysing product");
            products.push(self.analyze_product(name, sector).await);
        }

        let summary = self.build_summary(&products, sector).await;
        let recommendations = self.build_recommendations(&products, sector).await;

        MarketAnalysisResult {
            sector: sector.to_string(),
            analysis_date: date.format(ANALYSIS_DATE_FORMAT).to_string(),
            products,
            summary,
            recommendations,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::{HashSet, VecDeque};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::BackendError;

    /// Backend answering from a script, then failing once the script runs out.
    #[derive(Default)]
    pub(crate) struct ScriptedBackend {
        responses: Mutex<VecDeque<Result<String, BackendError>>>,
        pub(crate) calls: Mutex<usize>,
    }

    impl ScriptedBackend {
        pub(crate) fn new(responses: Vec<Result<String, BackendError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(0),
            }
        }

        pub(crate) fn failing() -> Self {
            Self::default()
        }

        pub(crate) fn call_count(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedBackend {
        async fn generate(
            &self,
            _prompt: &str,
            _system: Option<&str>,
        ) -> Result<String, BackendError> {
            *self.calls.lock().unwrap() += 1;
            self.responses.lock().unwrap().pop_front().unwrap_or(Err(BackendError::Unreachable {
                url: "http://127.0.0.1:9".into(),
                reason: "connection refused".into(),
            }))
        }

        async fn status(&self) -> BackendStatus {
            BackendStatus::unreachable("scripted")
        }
    }

    const PRODUCT_JSON: &str = r#"{
        "market_share": 18.5, "price": 799, "satisfaction": 4.4, "growth": 9.5,
        "strengths": ["Brand", "Quality", "Support"], "weaknesses": ["Price", "Reach"],
        "opportunities": ["Export", "Online", "Partners"], "threats": ["Rivals", "Rules"],
        "positioning": "Premium challenger for professionals",
        "target_audience": "Demanding professionals in large firms"}"#;

    fn analyzer(backend: Arc<ScriptedBackend>) -> LlmAnalyzer {
        LlmAnalyzer::new(backend, SimulationGenerator::default())
    }

    #[tokio::test]
    async fn test_backend_product_used() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok(PRODUCT_JSON.to_string())]));
        let p = analyzer(backend).analyze_product("Alpha", "Test").await;
        assert_eq!(p.market_share, 18.5);
        assert_eq!(p.price, 799.0);
        assert_eq!(p.positioning, "Premium challenger for professionals");
    }

    #[tokio::test]
    async fn test_failing_backend_falls_back_per_product() {
        let backend = Arc::new(ScriptedBackend::failing());
        let p = analyzer(backend.clone()).analyze_product("Alpha", "Test").await;
        assert_eq!(p, SimulationGenerator::default().generate("Alpha", "Test"));
        assert_eq!(p.validate(), Ok(()));
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unparsable_and_empty_responses_fall_back() {
        let simulated = SimulationGenerator::default().generate("Alpha", "Test");
        for raw in ["", "Sorry, I cannot do that.", r#"{"market_share": "n/a"}"#] {
            let backend = Arc::new(ScriptedBackend::new(vec![Ok(raw.to_string())]));
            assert_eq!(analyzer(backend).analyze_product("Alpha", "Test").await, simulated);
        }
    }

    #[tokio::test]
    async fn test_summary_cleaned_or_simulated() {
        let generator = SimulationGenerator::default();
        let products = vec![
            generator.generate("Alpha", "Test"),
            generator.generate("Beta", "Test"),
        ];

        let raw = "**The Test sector** grows.\n\nFast.";
        let backend = Arc::new(ScriptedBackend::new(vec![Ok(raw.into())]));
        assert_eq!(
            analyzer(backend).build_summary(&products, "Test").await,
            "The Test sector grows. Fast."
        );

        let backend = Arc::new(ScriptedBackend::new(vec![Ok("```\n```".into())]));
        assert_eq!(
            analyzer(backend).build_summary(&products, "Test").await,
            generator.summary(&products, "Test")
        );
    }

    #[tokio::test]
    async fn test_recommendations_always_six_distinct() {
        let generator = SimulationGenerator::default();
        let five = r#"{"recommendations": ["A", "B", "C", "D", "E"]}"#;
        let seven = r#"{"recommendations": ["A", "B", "C", "D", "E", "F", "G"]}"#;

        let backend = Arc::new(ScriptedBackend::new(vec![Ok(seven.into())]));
        assert_eq!(
            analyzer(backend).build_recommendations(&[], "Test").await,
            vec!["A", "B", "C", "D", "E", "F"]
        );

        for script in [vec![Ok(five.to_string())], vec![]] {
            let backend = Arc::new(ScriptedBackend::new(script));
            let recs = analyzer(backend).build_recommendations(&[], "Test").await;
            assert_eq!(recs, generator.recommendations("Test"));
            assert_eq!(recs.iter().collect::<HashSet<_>>().len(), 6);
        }
    }

    #[tokio::test]
    async fn test_analyze_mixes_backend_and_fallback() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            Ok(PRODUCT_JSON.to_string()),
            Err(BackendError::Timeout { secs: 120 }),
        ]));
        let request = AnalysisRequest::new(["Alpha", "Beta"], "Test").unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 11, 5).unwrap();
        let result = analyzer(backend.clone()).analyze(&request, date).await;

        assert_eq!(result.products[0].market_share, 18.5);
        assert_eq!(result.products[1], SimulationGenerator::default().generate("Beta", "Test"));
        assert_eq!(result.recommendations.len(), 6);
        assert_eq!(result.validate_lenient(), Ok(()));
        assert_eq!(backend.call_count(), 4);
    }

    #[tokio::test]
    async fn test_check_readiness_reports_backend_status() {
        let backend = Arc::new(ScriptedBackend::failing());
        let status = analyzer(backend.clone()).check_readiness().await;
        assert!(!status.reachable);
        assert!(!status.is_ready());
        assert_eq!(status.model, "scripted");
        assert_eq!(backend.call_count(), 0);
    }
}
