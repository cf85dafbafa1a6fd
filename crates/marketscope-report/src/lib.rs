//! # Marketscope Report
//!
//! Turns a market analysis into a stored report: charts are rendered in
//! memory, assembled into a paginated HTML document and written atomically
//! into the report store.

pub mod charts;
pub mod document;
pub mod error;
pub mod store;

use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use marketscope_core::MarketAnalysisResult;

pub use charts::{ChartImage, ChartKind, ChartOutcome, ChartSet};
pub use document::{DocumentAssembler, ReportDocument};
pub use error::{ChartError, ReportError, ReportResult};
pub use store::{ReportInfo, ReportStore};

/// A report written to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedReport {
    pub filename: String,
    pub path: PathBuf,
    pub size: u64,
    pub charts_rendered: usize,
}

/// Render, assemble and save reports.
pub struct ReportGenerator {
    assembler: DocumentAssembler,
    store: ReportStore,
}

impl ReportGenerator {
    pub fn new(store: ReportStore) -> ReportResult<Self> {
        Ok(Self {
            assembler: DocumentAssembler::new()?,
            store,
        })
    }

    pub fn store(&self) -> &ReportStore {
        &self.store
    }

    /// Produce and store the report for one result.
    pub fn generate(&self, result: &MarketAnalysisResult) -> ReportResult<GeneratedReport> {
        let charts = charts::render(result);
        let charts_rendered = charts.rendered_count();

        let document = self.assembler.assemble(result, &charts)?;
        let path = self.store.save(&document)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        info!(
            file = %filename,
            sector = %result.sector,
            charts = charts_rendered,
            "Report generated"
        );

        Ok(GeneratedReport {
            filename,
            size: document.len() as u64,
            path,
            charts_rendered,
        })
    }
}
