//! Report listing and download.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::info;

use marketscope_report::{ReportDocument, ReportInfo};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ReportList {
    pub total: usize,
    pub reports: Vec<ReportInfo>,
}

pub async fn list_reports(State(state): State<AppState>) -> Result<Json<ReportList>, ApiError> {
    let reports = state.reports.store().list()?;
    Ok(Json(ReportList {
        total: reports.len(),
        reports,
    }))
}

pub async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let store = state.reports.store().clone();
    let name = filename.clone();
    let bytes = tokio::task::spawn_blocking(move || store.read(&name)).await??;

    info!(file = %filename, bytes = bytes.len(), "Report downloaded");

    let headers = [
        (header::CONTENT_TYPE, ReportDocument::CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];
    Ok((headers, bytes).into_response())
}
