//! Generation backend commands.

use anyhow::Result;
use clap::Subcommand;

use marketscope_llm::OllamaClient;

use crate::config::AppConfig;
use crate::output;

#[derive(Subcommand)]
pub enum BackendCommands {
    /// Show reachability and whether the configured model is installed
    Status,

    /// List the models installed on the backend
    Models,
}

pub async fn execute(cmd: BackendCommands, config: &AppConfig) -> Result<()> {
    let client = OllamaClient::new(config.ollama.clone());

    match cmd {
        BackendCommands::Status => {
            let status = marketscope_llm::TextGenerator::status(&client).await;
            output::print_backend_status(&status, &config.ollama.host);
        }
        BackendCommands::Models => {
            let models = client.list_models().await;
            output::print_models(&models, &config.ollama.model);
        }
    }

    Ok(())
}
