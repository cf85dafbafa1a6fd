//! Report listing command.

use anyhow::{Context, Result};

use marketscope_report::ReportStore;

use crate::config::AppConfig;
use crate::output;

pub fn execute(config: &AppConfig) -> Result<()> {
    let store = ReportStore::new(&config.reports_dir);
    let reports = store
        .list()
        .with_context(|| format!("Failed to list reports in {}", config.reports_dir.display()))?;

    output::print_reports_table(&reports);
    Ok(())
}
