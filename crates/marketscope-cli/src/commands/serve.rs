//! Web server command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use marketscope_core::SimulationGenerator;
use marketscope_llm::{LlmAnalyzer, OllamaClient, SynthesisMode};
use marketscope_report::{ReportGenerator, ReportStore};
use marketscope_web::AppState;

use crate::config::AppConfig;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on (defaults to the configured port)
    #[arg(long)]
    pub port: Option<u16>,

    /// Host to bind to (defaults to the configured host)
    #[arg(long)]
    pub host: Option<String>,

    /// Also write logs to a daily-rolling file
    #[arg(long)]
    pub log: bool,

    /// Directory for log files when --log is set
    #[arg(long, default_value = "logs")]
    pub log_dir: PathBuf,
}

pub async fn execute(args: ServeArgs, config: &AppConfig) -> Result<()> {
    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);

    let simulation = SimulationGenerator::default();
    let reports = ReportGenerator::new(ReportStore::new(&config.reports_dir))
        .context("Failed to load the report template")?;
    let analyzer = LlmAnalyzer::new(
        Arc::new(OllamaClient::new(config.ollama.clone())),
        simulation.clone(),
    );
    if config.mode == SynthesisMode::Backend {
        analyzer.check_readiness().await;
    }

    let state = AppState::new(reports, simulation)
        .with_backend(analyzer)
        .with_default_mode(config.mode);

    println!();
    println!("  {} {}", "Marketscope".cyan().bold(), "Web Server".bold());
    println!();
    println!("  {}       http://{}:{}/api", "API".green(), host, port);
    println!("  {}    http://{}:{}/health", "Health".green(), host, port);
    println!("  {}   {}", "Reports".green(), config.reports_dir.display());
    println!("  {}      {}", "Mode".green(), config.mode);
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    marketscope_web::run_server(state, &host, port).await?;

    Ok(())
}
