//! Analysis command.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use marketscope_core::{AnalysisOverview, AnalysisRequest};
use marketscope_llm::SynthesisMode;
use marketscope_report::{ReportGenerator, ReportStore};

use crate::config::AppConfig;
use crate::output;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Industry sector of the products
    #[arg(short, long)]
    pub sector: String,

    /// Product to analyse (repeat 2 to 10 times)
    #[arg(short = 'p', long = "product", required = true)]
    pub products: Vec<String>,

    /// Synthesis mode: simulation or backend (defaults to the configured mode)
    #[arg(short, long)]
    pub mode: Option<SynthesisMode>,

    /// Print the analysis overview as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: AnalyzeArgs, config: &AppConfig) -> Result<()> {
    let request = AnalysisRequest::new(&args.products, &args.sector)?;
    let mode = args.mode.unwrap_or(config.mode);

    let synthesizer = super::synthesizer(config, mode).await;
    let reports = ReportGenerator::new(ReportStore::new(&config.reports_dir))
        .context("Failed to load the report template")?;

    let pb = (!args.json).then(|| {
        output::spinner(&format!(
            "Analysing {} products ({} mode)...",
            request.products().len(),
            mode
        ))
    });

    let result = synthesizer.synthesize(&request).await;
    if let Some(pb) = &pb {
        pb.set_message("Writing report...");
    }
    let report = reports.generate(&result);
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let report = report.context("Failed to generate the report")?;

    if args.json {
        let value = json!({
            "report": report,
            "mode": mode,
            "analysis": AnalysisOverview::from(&result),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        output::print_comparison(&result);
        output::print_generated(&report);
    }

    Ok(())
}
