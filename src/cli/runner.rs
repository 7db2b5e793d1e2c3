//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::extractor::Extractor;
use std::path::Path;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run { output } => self.run_extraction(output).await,
            Commands::Validate => self.validate(),
        }
    }

    fn load_config(&self) -> Result<Config> {
        let path = self
            .cli
            .config
            .as_ref()
            .ok_or_else(|| Error::missing_field("--config"))?;
        Config::from_file(path)
    }

    async fn run_extraction(&self, output: &Path) -> Result<()> {
        let config = self.load_config()?;
        let extractor = Extractor::new(config, output)?;
        let stats = extractor.run().await?;

        println!(
            "Extracted {} records into {} tables ({} pages, {} child requests) in {}ms",
            stats.records_extracted,
            stats.tables_finalized,
            stats.pages_fetched,
            stats.child_requests,
            stats.duration_ms
        );
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let config = self.load_config()?;
        config.validate()?;
        println!(
            "Configuration OK: {} endpoint(s) selected",
            config.endpoints.len()
        );
        Ok(())
    }
}
