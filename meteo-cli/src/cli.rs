use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use meteo_core::{Config, WeatherDataService, WeatherStationOrchestrator};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::{fs::File, path::PathBuf};

use crate::console::ConsoleUi;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "Browse weather stations and their latest readings")]
pub struct Cli {
    /// Path to the configuration file (defaults to the platform config dir).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// File receiving the application log.
    #[arg(long, global = true, default_value = "meteo.log")]
    pub log_file: PathBuf,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Pick a city and a station, then browse its readings (default).
    Browse,

    /// Write the default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Print where the configuration file is looked up.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        self.init_logging();

        match self.command.unwrap_or(Command::Browse) {
            Command::Browse => {
                let config = Config::load(self.config.as_deref())?;
                log::info!("Configuration loaded, catalog at {}", config.api.catalog_url);

                let data = WeatherDataService::from_config(&config);
                let ui = ConsoleUi::new();

                WeatherStationOrchestrator::new(&data, &ui, config.display.max_rows)
                    .run()
                    .await;
            }
            Command::Init { force } => {
                let path = match self.config {
                    Some(path) => path,
                    None => Config::config_file_path()?,
                };

                if path.exists() && !force {
                    bail!(
                        "Config file already exists: {}\n\
                         Hint: pass --force to overwrite it.",
                        path.display()
                    );
                }

                let written = Config::default()
                    .save(Some(path.as_path()))
                    .context("Failed to write the default configuration")?;
                println!("Configuration written to {}", written.display());
            }
            Command::ConfigPath => {
                let path = match self.config {
                    Some(path) => path,
                    None => Config::config_file_path()?,
                };
                println!("{}", path.display());
            }
        }

        Ok(())
    }

    /// Log to a file so the interactive prompts stay readable.
    fn init_logging(&self) {
        let level = if self.verbose { LevelFilter::Debug } else { LevelFilter::Info };
        let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

        if let Ok(log_file) = File::create(&self.log_file) {
            let _ = WriteLogger::init(level, log_config, log_file);
        }
    }
}
