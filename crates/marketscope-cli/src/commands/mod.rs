//! CLI command definitions and handlers.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use marketscope_core::SimulationGenerator;
use marketscope_llm::{SynthesisMode, Synthesizer};

use crate::config::AppConfig;

pub mod analyze;
pub mod backend;
pub mod reports;
pub mod serve;

/// Marketscope - comparative market studies
#[derive(Parser)]
#[command(name = "marketscope")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to ./marketscope.toml when present)
    #[arg(short, long, global = true, env = "MARKETSCOPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory where reports are written
    #[arg(long, global = true)]
    pub reports_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyse products of a sector and write a report
    Analyze(analyze::AnalyzeArgs),

    /// List generated reports, newest first
    Reports,

    /// Generation backend commands
    #[command(subcommand)]
    Backend(backend::BackendCommands),

    /// Start the web server
    Serve(serve::ServeArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = AppConfig::load(self.config.as_deref())?.with_reports_dir(self.reports_dir);

        match self.command {
            Commands::Analyze(args) => analyze::execute(args, &config).await,
            Commands::Reports => reports::execute(&config),
            Commands::Backend(cmd) => backend::execute(cmd, &config).await,
            Commands::Serve(args) => serve::execute(args, &config).await,
        }
    }
}

/// Synthesizer for the requested mode.
pub async fn synthesizer(config: &AppConfig, mode: SynthesisMode) -> Synthesizer {
    let simulation = SimulationGenerator::default();
    match mode {
        SynthesisMode::Simulation => Synthesizer::SimulationOnly(simulation),
        SynthesisMode::Backend => Synthesizer::ollama(config.ollama.clone(), simulation).await,
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "marketscope",
            "analyze",
            "--sector",
            "Smartphones",
            "-p",
            "Alpha",
            "-p",
            "Beta",
            "--mode",
            "ollama",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.sector, "Smartphones");
                assert_eq!(args.products, ["Alpha", "Beta"]);
                assert_eq!(args.mode, Some(SynthesisMode::Backend));
                assert!(args.json);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let args = ["marketscope", "reports", "--reports-dir", "out", "-v"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.reports_dir, Some(PathBuf::from("out")));
        assert!(matches!(cli.command, Commands::Reports));
    }

    #[test]
    fn test_analyze_requires_sector() {
        assert!(Cli::try_parse_from(["marketscope", "analyze", "-p", "A", "-p", "B"]).is_err());
    }
}
