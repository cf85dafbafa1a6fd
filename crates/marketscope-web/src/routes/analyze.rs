//! Analysis requests: synthesize, then write the report.

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use marketscope_core::{AnalysisOverview, AnalysisRequest};
use marketscope_llm::SynthesisMode;
use marketscope_report::store::download_url;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub products: Vec<String>,
    pub sector: String,
    #[serde(default)]
    pub mode: Option<SynthesisMode>,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub report_filename: String,
    pub report_url: String,
    pub charts_rendered: usize,
    pub mode: SynthesisMode,
    pub analysis: AnalysisOverview,
}

pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(body) = payload?;
    let request = AnalysisRequest::new(&body.products, &body.sector)?;
    let synthesizer = state.synthesizer(body.mode)?;

    let result = synthesizer.synthesize(&request).await;
    let analysis = AnalysisOverview::from(&result);

    let reports = Arc::clone(&state.reports);
    let report = tokio::task::spawn_blocking(move || reports.generate(&result)).await??;

    info!(
        file = %report.filename,
        sector = %analysis.sector,
        products = analysis.products_count,
        "Analysis completed"
    );

    Ok(Json(AnalyzeResponse {
        success: true,
        report_url: download_url(&report.filename),
        report_filename: report.filename,
        charts_rendered: report.charts_rendered,
        mode: synthesizer.mode(),
        analysis,
    }))
}
