//! Marketscope CLI
//!
//! Comparative market studies from the command line, plus the HTTP server.

use anyhow::Result;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

use commands::{Cli, Commands};

const DEFAULT_FILTER: &str =
    "marketscope=info,marketscope_llm=info,marketscope_report=info,marketscope_web=debug";
const VERBOSE_FILTER: &str = "marketscope=debug,marketscope_core=debug,marketscope_llm=debug,\
                              marketscope_report=debug,marketscope_web=debug";

/// Initialize tracing, optionally adding a daily-rolling log file.
///
/// The returned guard flushes the file writer and must live until exit.
fn init_tracing(log_dir: Option<&std::path::Path>, verbose: bool) -> Option<WorkerGuard> {
    let default = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default.into());

    if let Some(dir) = log_dir {
        let appender = tracing_appender::rolling::daily(dir, "marketscope.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false),
            )
            .init();
        Some(guard)
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
        None
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_dir = match &cli.command {
        Commands::Serve(args) if args.log => Some(args.log_dir.clone()),
        _ => None,
    };
    let _guard = init_tracing(log_dir.as_deref(), cli.verbose);

    cli.execute().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_parse_and_cover_every_crate() {
        for filter in [DEFAULT_FILTER, VERBOSE_FILTER] {
            assert!(tracing_subscriber::EnvFilter::try_new(filter).is_ok());
            assert!(!filter.contains(char::is_whitespace));
        }
        for target in ["marketscope_core", "marketscope_llm", "marketscope_report"] {
            assert!(VERBOSE_FILTER.contains(&format!("{}=debug", target)));
        }
    }
}
