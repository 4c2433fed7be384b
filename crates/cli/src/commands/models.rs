//! Models command handler.
//!
//! Shows which model id each search depth resolves to.

use clap::Args;
use localfind_core::{config::AppConfig, AppResult};
use localfind_llm::SearchDepth;

/// Show the configured model catalog
#[derive(Args, Debug)]
pub struct ModelsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ModelsCommand {
    /// Execute the models command.
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        if self.json {
            let value = serde_json::json!({
                "provider": config.provider,
                "models": {
                    "fast": config.models.fast,
                    "deep": config.models.deep,
                },
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
            return Ok(());
        }

        println!("Provider: {}", config.provider);
        for depth in [SearchDepth::Fast, SearchDepth::Deep] {
            println!(
                "  {:<4} -> {}  ({})",
                depth.as_str(),
                config.model_for(depth.as_str())?,
                depth.label()
            );
        }

        Ok(())
    }
}
