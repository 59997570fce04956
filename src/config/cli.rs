use crate::config::toml_config::DashboardConfig;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "climate-dash")]
#[command(about = "Client for the Rwanda climate-risk dashboard API")]
pub struct CliConfig {
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Dashboard server, overrides [api] base_url")]
    pub api_base_url: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the page's initial load: layers, then plot, then monthly stats
    Load,
    /// Request map layers
    Layers {
        #[arg(long = "layer", value_delimiter = ',', help = "Layers to tick; defaults to [page] checked_layers")]
        layers: Vec<String>,
    },
    /// Request a time-series plot
    Plot {
        #[arg(long)]
        district: Option<String>,
        #[arg(long)]
        dataset: Option<String>,
        #[arg(long, help = "Write the decoded image to this file")]
        output: Option<PathBuf>,
    },
    /// Request monthly statistics
    Stats {
        #[arg(long)]
        district: Option<String>,
    },
}

impl CliConfig {
    /// Loads the config file (or the built-in defaults) and applies flag overrides.
    pub fn resolve(&self) -> Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::from_file(path)?,
            None => DashboardConfig::default(),
        };

        if let Some(url) = &self.api_base_url {
            config.api.base_url = url.clone();
        }
        config.logging.verbose |= self.verbose;
        config.logging.json |= self.json_logs;

        self.validate()?;
        config.validate()?;
        Ok(config)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Command::Plot {
            output: Some(output),
            ..
        } = &self.command
        {
            validate_path("--output", &output.to_string_lossy())?;
        }
        Ok(())
    }
}
